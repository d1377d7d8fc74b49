//! Cross joins.
//!
//! A multi-relation FROM list is materialized as a temporary relation
//! holding the cross product, with a concatenated schema whose fields
//! are qualified `relation.field`. Two relations pick between two
//! strategies by block count:
//!
//! - one-pass: the smaller relation fits in the pool minus one slot, so
//!   it is loaded whole and the larger relation streams through the last
//!   slot;
//! - block-nested-loop: the smaller relation is the outer loop in slot 0
//!   and the larger one streams through slot 1.
//!
//! Three or more relations nest recursively, holding relation `n`'s
//! current block in memory slot `n`.

use tracing::debug;

use crate::catalog::{RelationId, Schema};
use crate::db::Database;
use crate::storage::Tuple;

use super::error::ExecutorError;
use super::insert::append_tuple;

/// Joins the FROM relations into a temporary relation and returns its id.
/// The caller owns filtering and projection over the result.
pub(crate) fn join_relations(
    db: &mut Database,
    names: &[String],
) -> Result<RelationId, ExecutorError> {
    if names.len() == 2 {
        cross_join(db, &names[0], &names[1])
    } else {
        multiple_join(db, names)
    }
}

fn cross_join(db: &mut Database, a: &str, b: &str) -> Result<RelationId, ExecutorError> {
    let a_id = db.catalog.relation_id(a)?;
    let b_id = db.catalog.relation_id(b)?;

    // smaller relation by block count, ties to the first
    let (small, small_id, large, large_id) = if db.num_blocks(a_id)? <= db.num_blocks(b_id)? {
        (a, a_id, b, b_id)
    } else {
        (b, b_id, a, a_id)
    };

    let temp_name = format!("temp_{small}_cross_{large}");
    let temp_id = temp_relation(
        db,
        &temp_name,
        &[(small, small_id), (large, large_id)],
    )?;

    let one_pass = db.num_blocks(small_id)? < db.memory.pool_size() - 1;
    debug!(
        smaller = small,
        larger = large,
        strategy = if one_pass { "one-pass" } else { "nested" },
        "cross join"
    );
    let merged = if one_pass {
        one_pass_join(db, small_id, large_id)?
    } else {
        nested_join(db, small_id, large_id)?
    };
    for tuple in merged {
        append_tuple(db, temp_id, tuple)?;
    }
    Ok(temp_id)
}

/// Loads the smaller relation into slots `0..n` and streams the larger
/// one through the pool's last slot.
fn one_pass_join(
    db: &mut Database,
    small_id: RelationId,
    large_id: RelationId,
) -> Result<Vec<Tuple>, ExecutorError> {
    let small_blocks = db.num_blocks(small_id)?;
    let mut merged = Vec::new();
    if small_blocks == 0 {
        return Ok(merged);
    }
    db.read_blocks(small_id, 0, 0, small_blocks)?;
    let small_tuples = db.memory.tuples(0, small_blocks)?;

    let last_slot = db.memory.pool_size() - 1;
    for i in 0..db.num_blocks(large_id)? {
        if !db.read_block(large_id, i, last_slot)? {
            continue;
        }
        let large_block = db.memory.block(last_slot)?.clone();
        for small in small_tuples.iter().filter(|t| t.is_valid()) {
            for large in large_block.tuples().iter().filter(|t| t.is_valid()) {
                merged.push(merge_tuples(small, large));
            }
        }
    }
    Ok(merged)
}

/// Block-nested-loop join: the smaller relation is the outer loop.
fn nested_join(
    db: &mut Database,
    small_id: RelationId,
    large_id: RelationId,
) -> Result<Vec<Tuple>, ExecutorError> {
    let mut merged = Vec::new();
    for i in 0..db.num_blocks(small_id)? {
        if !db.read_block(small_id, i, 0)? {
            continue;
        }
        let outer = db.memory.block(0)?.clone();
        for j in 0..db.num_blocks(large_id)? {
            if !db.read_block(large_id, j, 1)? {
                continue;
            }
            let inner = db.memory.block(1)?.clone();
            for small in outer.tuples().iter().filter(|t| t.is_valid()) {
                for large in inner.tuples().iter().filter(|t| t.is_valid()) {
                    merged.push(merge_tuples(small, large));
                }
            }
        }
    }
    Ok(merged)
}

/// N-way cross product, one memory slot per relation.
fn multiple_join(db: &mut Database, names: &[String]) -> Result<RelationId, ExecutorError> {
    if names.len() > db.memory.pool_size() {
        return Err(ExecutorError::TooManyRelations {
            count: names.len(),
            max: db.memory.pool_size(),
        });
    }
    let mut parts = Vec::with_capacity(names.len());
    for name in names {
        parts.push((name.as_str(), db.catalog.relation_id(name)?));
    }
    let temp_id = temp_relation(db, "temp_multiple_join", &parts)?;

    let ids: Vec<RelationId> = parts.iter().map(|&(_, id)| id).collect();
    let mut partial = Vec::with_capacity(ids.len());
    let mut merged = Vec::new();
    join_level(db, &ids, 0, &mut partial, &mut merged)?;
    for tuple in merged {
        append_tuple(db, temp_id, tuple)?;
    }
    Ok(temp_id)
}

fn join_level(
    db: &mut Database,
    ids: &[RelationId],
    level: usize,
    partial: &mut Vec<Tuple>,
    out: &mut Vec<Tuple>,
) -> Result<(), ExecutorError> {
    let id = ids[level];
    for i in 0..db.num_blocks(id)? {
        if !db.read_block(id, i, level)? {
            continue;
        }
        let block = db.memory.block(level)?.clone();
        for tuple in block.tuples().iter().filter(|t| t.is_valid()) {
            partial.push(tuple.clone());
            if level + 1 == ids.len() {
                out.push(concat_tuples(partial));
            } else {
                join_level(db, ids, level + 1, partial, out)?;
            }
            partial.pop();
        }
    }
    Ok(())
}

/// Creates (or recreates) the temporary output relation with the
/// concatenated, qualified schema of its inputs.
fn temp_relation(
    db: &mut Database,
    name: &str,
    parts: &[(&str, RelationId)],
) -> Result<RelationId, ExecutorError> {
    if db.catalog.exists(name) {
        let old = db.catalog.relation_id(name)?;
        db.truncate(old, 0)?;
        db.catalog.remove(old)?;
    }
    let mut fields = Vec::new();
    for &(relation, id) in parts {
        for (field, ty) in db.schema(id)?.iter() {
            fields.push((format!("{relation}.{field}"), ty));
        }
    }
    let schema = Schema::new(fields)?;
    Ok(db.create_relation(name, schema)?)
}

fn merge_tuples(a: &Tuple, b: &Tuple) -> Tuple {
    let mut fields = a.fields().to_vec();
    fields.extend_from_slice(b.fields());
    Tuple::new(fields)
}

fn concat_tuples(parts: &[Tuple]) -> Tuple {
    let mut fields = Vec::new();
    for part in parts {
        fields.extend_from_slice(part.fields());
    }
    Tuple::new(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::{Field, FieldType};
    use crate::storage::NUM_BLOCKS_IN_MEMORY;

    fn create(db: &mut Database, name: &str, field: &str, values: &[i32]) -> RelationId {
        let schema = Schema::new(vec![(field.into(), FieldType::Int)]).unwrap();
        let id = db.create_relation(name, schema).unwrap();
        for &n in values {
            append_tuple(db, id, Tuple::new(vec![Field::Int(n)])).unwrap();
        }
        id
    }

    fn rows_of(db: &mut Database, id: RelationId) -> Vec<Vec<Field>> {
        let mut rows = Vec::new();
        for i in 0..db.num_blocks(id).unwrap() {
            if !db.read_block(id, i, 0).unwrap() {
                continue;
            }
            for t in db.memory.block(0).unwrap().tuples() {
                if t.is_valid() {
                    rows.push(t.fields().to_vec());
                }
            }
        }
        rows
    }

    #[test]
    fn test_two_way_cross_product_cardinality() {
        let mut db = Database::new();
        create(&mut db, "a", "x", &[1, 2, 3]);
        create(&mut db, "b", "y", &[10, 20]);
        let temp = join_relations(&mut db, &["a".into(), "b".into()]).unwrap();
        assert_eq!(db.num_tuples(temp).unwrap(), 6);
        assert_eq!(db.catalog.name(temp).unwrap(), "temp_a_cross_b");
    }

    #[test]
    fn test_joined_schema_is_qualified() {
        let mut db = Database::new();
        create(&mut db, "a", "x", &[1]);
        create(&mut db, "b", "x", &[2]);
        let temp = join_relations(&mut db, &["a".into(), "b".into()]).unwrap();
        let schema = db.schema(temp).unwrap();
        assert_eq!(schema.field_offset("a.x"), Some(0));
        assert_eq!(schema.field_offset("b.x"), Some(1));
    }

    #[test]
    fn test_strategies_agree() {
        // same data joined with a big pool (one-pass) and a 3-slot pool
        // (block-nested-loop) must produce the same multiset of rows
        let values: Vec<i32> = (0..9).collect();
        let mut one_pass_db = Database::new();
        create(&mut one_pass_db, "a", "x", &values);
        create(&mut one_pass_db, "b", "y", &values);
        let t1 = join_relations(&mut one_pass_db, &["a".into(), "b".into()]).unwrap();
        let mut r1 = rows_of(&mut one_pass_db, t1);

        // 9 single-field tuples span 2 blocks; a 3-slot pool fails the
        // "smaller fits in pool minus one" test and falls back to nested
        let mut nested_db = Database::with_pool_size(3);
        create(&mut nested_db, "a", "x", &values);
        create(&mut nested_db, "b", "y", &values);
        let t2 = join_relations(&mut nested_db, &["a".into(), "b".into()]).unwrap();
        let mut r2 = rows_of(&mut nested_db, t2);

        assert_eq!(r1.len(), 81);
        r1.sort();
        r2.sort();
        assert_eq!(r1, r2);
    }

    #[test]
    fn test_smaller_relation_drives_the_temp_name() {
        let mut db = Database::new();
        create(&mut db, "big", "x", &(0..20).collect::<Vec<_>>());
        create(&mut db, "tiny", "y", &[1]);
        let temp = join_relations(&mut db, &["big".into(), "tiny".into()]).unwrap();
        assert_eq!(db.catalog.name(temp).unwrap(), "temp_tiny_cross_big");
    }

    #[test]
    fn test_three_way_join() {
        let mut db = Database::new();
        create(&mut db, "a", "x", &[1, 2]);
        create(&mut db, "b", "y", &[3, 4]);
        create(&mut db, "c", "z", &[5]);
        let temp = join_relations(&mut db, &["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(db.num_tuples(temp).unwrap(), 4);
        assert_eq!(db.catalog.name(temp).unwrap(), "temp_multiple_join");
        let schema = db.schema(temp).unwrap();
        assert_eq!(schema.field_offset("c.z"), Some(2));
    }

    #[test]
    fn test_empty_input_gives_empty_product() {
        let mut db = Database::new();
        create(&mut db, "a", "x", &[1, 2]);
        create(&mut db, "b", "y", &[]);
        let temp = join_relations(&mut db, &["a".into(), "b".into()]).unwrap();
        assert_eq!(db.num_tuples(temp).unwrap(), 0);
    }

    #[test]
    fn test_temp_relation_is_recreated() {
        let mut db = Database::new();
        create(&mut db, "a", "x", &[1]);
        create(&mut db, "b", "y", &[2, 3]);
        let first = join_relations(&mut db, &["a".into(), "b".into()]).unwrap();
        assert_eq!(db.num_tuples(first).unwrap(), 2);
        let second = join_relations(&mut db, &["a".into(), "b".into()]).unwrap();
        assert_eq!(db.num_tuples(second).unwrap(), 2);
    }

    #[test]
    fn test_too_many_relations() {
        let mut db = Database::new();
        let names: Vec<String> = (0..NUM_BLOCKS_IN_MEMORY + 1)
            .map(|i| format!("r{i}"))
            .collect();
        for name in &names {
            create(&mut db, name, "x", &[1]);
        }
        assert!(matches!(
            join_relations(&mut db, &names),
            Err(ExecutorError::TooManyRelations { .. })
        ));
    }
}
