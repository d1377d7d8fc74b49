//! SELECT execution.
//!
//! A single-relation query scans the relation directly. A multi-relation
//! query first materializes the cross product as a temporary relation
//! (see [`super::join`]) and then scans that, so filtering, projection,
//! DISTINCT, and ORDER BY are one code path over one schema.

use std::collections::HashSet;

use crate::catalog::{RelationId, Schema};
use crate::datum::Field;
use crate::db::Database;
use crate::sql::ast::{ColumnRef, SelectColumns, SelectQuery};
use crate::storage::Tuple;

use super::error::ExecutorError;
use super::eval;
use super::join;

/// The materialized result of a SELECT.
///
/// `rows` are the projected output; `origin` keeps the full scanned
/// tuple behind each row (reordered and deduplicated in lockstep), which
/// INSERT ... SELECT copies from by column name via `origin_schema`.
pub(crate) struct SelectOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Field>>,
    pub origin: Vec<Tuple>,
    pub origin_schema: Schema,
}

pub(crate) fn run_select(
    db: &mut Database,
    query: &SelectQuery,
) -> Result<SelectOutput, ExecutorError> {
    // every FROM relation must exist before any temp is built
    for name in &query.from {
        db.catalog.relation_id(name)?;
    }

    let single = query.from.len() == 1;
    let scan_id = if single {
        db.catalog.relation_id(&query.from[0])?
    } else {
        join::join_relations(db, &query.from)?
    };
    let schema = db.schema(scan_id)?.clone();

    // projection offsets and output column names
    let (offsets, columns) = match &query.columns {
        SelectColumns::All => {
            let offsets: Vec<usize> = (0..schema.num_fields()).collect();
            let columns = offsets
                .iter()
                .filter_map(|&i| schema.field_name(i))
                .map(str::to_string)
                .collect();
            (offsets, columns)
        }
        SelectColumns::Columns(refs) => {
            let mut offsets = Vec::with_capacity(refs.len());
            let mut columns = Vec::with_capacity(refs.len());
            for column in refs {
                let offset = resolve_output_column(&schema, query, single, column)?;
                offsets.push(offset);
                columns.push(match schema.field_name(offset) {
                    Some(name) => name.to_string(),
                    None => column.to_string(),
                });
            }
            (offsets, columns)
        }
    };

    let (mut rows, mut origin) = scan(db, scan_id, &schema, query, &offsets)?;

    if query.distinct {
        let mut seen: HashSet<Vec<Field>> = HashSet::new();
        let mut kept_rows = Vec::with_capacity(rows.len());
        let mut kept_origin = Vec::with_capacity(origin.len());
        for (row, source) in rows.into_iter().zip(origin) {
            if seen.insert(row.clone()) {
                kept_rows.push(row);
                kept_origin.push(source);
            }
        }
        rows = kept_rows;
        origin = kept_origin;
    }

    if let Some(order_by) = &query.order_by {
        let offset = resolve_output_column(&schema, query, single, order_by)?;
        let mut paired: Vec<(Vec<Field>, Tuple)> = rows.into_iter().zip(origin).collect();
        // stable, ascending on the single sort column
        paired.sort_by(|(_, a), (_, b)| compare_fields(a.field(offset), b.field(offset)));
        (rows, origin) = paired.into_iter().unzip();
    }

    Ok(SelectOutput {
        columns,
        rows,
        origin,
        origin_schema: schema,
    })
}

/// Resolves a projection or ORDER BY column against the scanned schema.
///
/// Over a single relation the qualifier, if present, must name that
/// relation. Over a join the qualifier must be one of the FROM
/// relations, and resolution goes through the temp relation's qualified
/// field names.
fn resolve_output_column(
    schema: &Schema,
    query: &SelectQuery,
    single: bool,
    column: &ColumnRef,
) -> Result<usize, ExecutorError> {
    if let Some(qualifier) = &column.qualifier {
        if single {
            if qualifier != &query.from[0] {
                return Err(ExecutorError::QualifierMismatch {
                    qualifier: qualifier.clone(),
                    relation: query.from[0].clone(),
                });
            }
            return schema.field_offset(&column.name).ok_or_else(|| {
                ExecutorError::NoSuchColumn {
                    column: column.name.clone(),
                    relation: query.from[0].clone(),
                }
            });
        }
        if !query.from.contains(qualifier) {
            return Err(ExecutorError::QualifierNotInFrom {
                qualifier: qualifier.clone(),
            });
        }
    }
    eval::resolve_column(schema, column)
}

/// Scans the relation through memory slot 0, applying the WHERE filter
/// and projecting each surviving tuple.
fn scan(
    db: &mut Database,
    id: RelationId,
    schema: &Schema,
    query: &SelectQuery,
    offsets: &[usize],
) -> Result<(Vec<Vec<Field>>, Vec<Tuple>), ExecutorError> {
    let mut rows = Vec::new();
    let mut origin = Vec::new();
    for i in 0..db.num_blocks(id)? {
        if !db.read_block(id, i, 0)? {
            continue;
        }
        let block = db.memory.block(0)?.clone();
        for tuple in block.tuples().iter().filter(|t| t.is_valid()) {
            if let Some(filter) = &query.filter {
                if !eval::evaluate_predicate(filter, schema, tuple)? {
                    continue;
                }
            }
            let row = offsets
                .iter()
                .filter_map(|&offset| tuple.field(offset).cloned())
                .collect();
            rows.push(row);
            origin.push(tuple.clone());
        }
    }
    Ok((rows, origin))
}

fn compare_fields(a: Option<&Field>, b: Option<&Field>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(Field::Int(x)), Some(Field::Int(y))) => x.cmp(y),
        (Some(Field::Str(x)), Some(Field::Str(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::FieldType;
    use crate::executor::insert::append_tuple;
    use crate::sql;
    use crate::sql::ast::Statement;

    fn select_query(input: &str) -> SelectQuery {
        match sql::parse(input).unwrap() {
            Statement::Select(query) => query,
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    fn course_db() -> Database {
        let mut db = Database::new();
        let schema = Schema::new(vec![
            ("sid".into(), FieldType::Int),
            ("grade".into(), FieldType::Str20),
        ])
        .unwrap();
        let id = db.create_relation("course", schema).unwrap();
        for (sid, grade) in [(3, "A"), (1, "B"), (2, "A"), (1, "B")] {
            append_tuple(
                &mut db,
                id,
                Tuple::new(vec![Field::Int(sid), Field::Str(grade.into())]),
            )
            .unwrap();
        }
        db
    }

    #[test]
    fn test_select_star() {
        let mut db = course_db();
        let out = run_select(&mut db, &select_query("SELECT * FROM course")).unwrap();
        assert_eq!(out.columns, vec!["sid", "grade"]);
        assert_eq!(out.rows.len(), 4);
        assert_eq!(out.rows[0], vec![Field::Int(3), Field::Str("A".into())]);
    }

    #[test]
    fn test_projection_and_filter() {
        let mut db = course_db();
        let out = run_select(
            &mut db,
            &select_query("SELECT sid FROM course WHERE grade = \"A\""),
        )
        .unwrap();
        assert_eq!(out.columns, vec!["sid"]);
        assert_eq!(out.rows, vec![vec![Field::Int(3)], vec![Field::Int(2)]]);
    }

    #[test]
    fn test_distinct_keeps_first_occurrence() {
        let mut db = course_db();
        let out = run_select(&mut db, &select_query("SELECT DISTINCT * FROM course")).unwrap();
        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.origin.len(), 3);
    }

    #[test]
    fn test_distinct_on_projection() {
        let mut db = course_db();
        let out = run_select(&mut db, &select_query("SELECT DISTINCT grade FROM course")).unwrap();
        assert_eq!(
            out.rows,
            vec![vec![Field::Str("A".into())], vec![Field::Str("B".into())]]
        );
    }

    #[test]
    fn test_order_by_is_stable_ascending() {
        let mut db = course_db();
        let out = run_select(&mut db, &select_query("SELECT * FROM course ORDER BY sid")).unwrap();
        let sids: Vec<i32> = out
            .rows
            .iter()
            .map(|row| row[0].as_int().unwrap())
            .collect();
        assert_eq!(sids, vec![1, 1, 2, 3]);
        // origin tuples are reordered in lockstep with the rows
        assert_eq!(out.origin[0].field(0), Some(&Field::Int(1)));
        assert_eq!(out.origin[3].field(0), Some(&Field::Int(3)));
    }

    #[test]
    fn test_qualified_column_on_single_relation() {
        let mut db = course_db();
        let out = run_select(&mut db, &select_query("SELECT course.sid FROM course")).unwrap();
        assert_eq!(out.columns, vec!["sid"]);
        assert!(matches!(
            run_select(&mut db, &select_query("SELECT other.sid FROM course")),
            Err(ExecutorError::QualifierMismatch { .. })
        ));
    }

    #[test]
    fn test_join_projection_and_filter() {
        let mut db = course_db();
        let schema = Schema::new(vec![
            ("sid".into(), FieldType::Int),
            ("name".into(), FieldType::Str20),
        ])
        .unwrap();
        let id = db.create_relation("student", schema).unwrap();
        for (sid, name) in [(1, "ann"), (2, "bob")] {
            append_tuple(
                &mut db,
                id,
                Tuple::new(vec![Field::Int(sid), Field::Str(name.into())]),
            )
            .unwrap();
        }

        let out = run_select(
            &mut db,
            &select_query(
                "SELECT student.name, course.grade FROM course, student \
                 WHERE course.sid = student.sid",
            ),
        )
        .unwrap();
        assert_eq!(out.columns, vec!["student.name", "course.grade"]);
        let mut rows = out.rows.clone();
        rows.sort();
        assert_eq!(
            rows,
            vec![
                vec![Field::Str("ann".into()), Field::Str("B".into())],
                vec![Field::Str("ann".into()), Field::Str("B".into())],
                vec![Field::Str("bob".into()), Field::Str("A".into())],
            ]
        );
    }

    #[test]
    fn test_join_ambiguous_bare_column() {
        let mut db = course_db();
        let schema = Schema::new(vec![("sid".into(), FieldType::Int)]).unwrap();
        db.create_relation("student", schema).unwrap();
        assert!(matches!(
            run_select(&mut db, &select_query("SELECT sid FROM course, student")),
            Err(ExecutorError::AmbiguousColumn { .. })
        ));
    }

    #[test]
    fn test_join_qualifier_not_in_from() {
        let mut db = course_db();
        let schema = Schema::new(vec![("sid".into(), FieldType::Int)]).unwrap();
        db.create_relation("student", schema).unwrap();
        assert!(matches!(
            run_select(
                &mut db,
                &select_query("SELECT other.sid FROM course, student")
            ),
            Err(ExecutorError::QualifierNotInFrom { .. })
        ));
    }

    #[test]
    fn test_missing_relation() {
        let mut db = Database::new();
        assert!(matches!(
            run_select(&mut db, &select_query("SELECT * FROM ghost")),
            Err(ExecutorError::Catalog(_))
        ));
    }
}
