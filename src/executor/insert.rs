//! INSERT execution.
//!
//! Appending goes through the buffer pool like any other access: the
//! relation's last block is staged in memory slot 0, the new tuple is
//! placed, and the block is written back. A relation therefore grows one
//! block at a time and only the last block is ever partially filled
//! (before deletions).

use crate::catalog::RelationId;
use crate::datum::{Field, FieldType, MAX_STR_LEN};
use crate::db::Database;
use crate::sql::ast::{InsertSource, InsertStmt, Literal};
use crate::storage::Tuple;

use super::error::ExecutorError;
use super::select;

/// Appends one tuple to the relation via memory slot 0.
pub(crate) fn append_tuple(
    db: &mut Database,
    id: RelationId,
    tuple: Tuple,
) -> Result<(), ExecutorError> {
    let num_blocks = db.num_blocks(id)?;
    if num_blocks == 0 {
        let mut block = db.new_block(id)?;
        block.push_tuple(tuple)?;
        db.memory.set_block(0, block)?;
        db.write_block(id, 0, 0)?;
        return Ok(());
    }

    let last = num_blocks - 1;
    if !db.read_block(id, last, 0)? {
        // the track ends in an unwritten placeholder; start it fresh
        let mut block = db.new_block(id)?;
        block.push_tuple(tuple)?;
        db.memory.set_block(0, block)?;
        db.write_block(id, last, 0)?;
        return Ok(());
    }

    let block = db.memory.block_mut(0)?;
    let target = if block.num_tuples() == 0 {
        // fully tombstoned last block is overwritten in place
        block.clear();
        block.push_tuple(tuple)?;
        last
    } else if block.num_tuples() == block.capacity() {
        let mut fresh = db.new_block(id)?;
        fresh.push_tuple(tuple)?;
        db.memory.set_block(0, fresh)?;
        num_blocks
    } else {
        block.push_tuple(tuple)?;
        last
    };
    db.write_block(id, target, 0)?;
    Ok(())
}

/// Executes an INSERT statement, returning the number of rows inserted.
pub fn run_insert(db: &mut Database, stmt: &InsertStmt) -> Result<usize, ExecutorError> {
    let id = db.catalog.relation_id(&stmt.relation)?;
    match &stmt.source {
        InsertSource::Values(values) => {
            let tuple = build_tuple(db, id, stmt, values)?;
            append_tuple(db, id, tuple)?;
            Ok(1)
        }
        InsertSource::Select(query) => {
            let output = select::run_select(db, query)?;
            // map destination columns to source offsets once, by name
            let schema = db.schema(id)?.clone();
            let mut offsets = Vec::with_capacity(stmt.columns.len());
            for column in &stmt.columns {
                let (dest_offset, dest_type) =
                    schema
                        .lookup(column)
                        .ok_or_else(|| ExecutorError::NoSuchColumn {
                            column: column.clone(),
                            relation: stmt.relation.clone(),
                        })?;
                let (src_offset, src_type) = output
                    .origin_schema
                    .lookup(column)
                    .ok_or_else(|| ExecutorError::NoSuchColumn {
                        column: column.clone(),
                        relation: query.from.join(", "),
                    })?;
                if src_type != dest_type {
                    return Err(ExecutorError::CopyTypeMismatch {
                        column: column.clone(),
                        expected: dest_type,
                        found: src_type,
                    });
                }
                offsets.push((dest_offset, src_offset));
            }

            let rows = output.origin.len();
            for source in output.origin {
                let mut tuple = schema.default_tuple();
                for &(dest_offset, src_offset) in &offsets {
                    if let Some(field) = source.field(src_offset) {
                        tuple.set_field(dest_offset, field.clone());
                    }
                }
                append_tuple(db, id, tuple)?;
            }
            Ok(rows)
        }
    }
}

fn build_tuple(
    db: &Database,
    id: RelationId,
    stmt: &InsertStmt,
    values: &[Literal],
) -> Result<Tuple, ExecutorError> {
    if stmt.columns.len() != values.len() {
        return Err(ExecutorError::ValueCountMismatch {
            columns: stmt.columns.len(),
            values: values.len(),
        });
    }
    let schema = db.schema(id)?;
    let mut tuple = schema.default_tuple();
    for (column, literal) in stmt.columns.iter().zip(values) {
        let (offset, field_type) =
            schema
                .lookup(column)
                .ok_or_else(|| ExecutorError::NoSuchColumn {
                    column: column.clone(),
                    relation: stmt.relation.clone(),
                })?;
        let field = convert_literal(column, literal, field_type)?;
        tuple.set_field(offset, field);
    }
    Ok(tuple)
}

/// Converts a VALUES literal for its destination column.
///
/// `NULL` has no first-class representation in storage: on an INT column
/// it becomes 0, on a STR20 column it becomes the literal string "NULL".
fn convert_literal(
    column: &str,
    literal: &Literal,
    field_type: FieldType,
) -> Result<Field, ExecutorError> {
    match (field_type, literal) {
        (FieldType::Int, Literal::Integer(n)) => Ok(Field::Int(*n)),
        (FieldType::Int, Literal::Null) => Ok(Field::Int(0)),
        (FieldType::Str20, Literal::String(s)) => {
            if s.chars().count() > MAX_STR_LEN {
                return Err(ExecutorError::StringTooLong {
                    value: s.clone(),
                    max: MAX_STR_LEN,
                });
            }
            Ok(Field::Str(s.clone()))
        }
        (FieldType::Str20, Literal::Null) => Ok(Field::Str("NULL".to_string())),
        (FieldType::Int, Literal::String(_)) | (FieldType::Str20, Literal::Integer(_)) => {
            Err(ExecutorError::LiteralTypeMismatch {
                column: column.to_string(),
                expected: field_type,
            })
        }
    }
}
