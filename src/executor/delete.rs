//! DELETE execution and hole compaction.
//!
//! Deletion is two-phase. The tombstone pass scans the relation block by
//! block through memory slot 0, invalidating every matching tuple and
//! writing back only the blocks it changed. Compaction then repacks the
//! relation with two cursors: a forward hole cursor (its block staged in
//! slot 0) and a backward fill cursor over live tuples (slot 1). Each
//! live tuple found from the back is moved into the frontmost hole until
//! the cursors meet, after which a front-to-back scan truncates the track
//! at the first fully empty block.

use crate::catalog::RelationId;
use crate::db::Database;
use crate::sql::ast::DeleteStmt;

use super::error::ExecutorError;
use super::eval;

pub fn run_delete(db: &mut Database, stmt: &DeleteStmt) -> Result<(), ExecutorError> {
    let id = db.catalog.relation_id(&stmt.relation)?;
    let schema = db.schema(id)?.clone();
    let num_blocks = db.num_blocks(id)?;

    for i in 0..num_blocks {
        if !db.read_block(id, i, 0)? {
            continue;
        }
        let mut doomed = Vec::new();
        let block = db.memory.block(0)?;
        for (slot, tuple) in block.tuples().iter().enumerate() {
            if !tuple.is_valid() {
                continue;
            }
            let hit = match &stmt.filter {
                Some(expr) => eval::evaluate_predicate(expr, &schema, tuple)?,
                None => true,
            };
            if hit {
                doomed.push(slot);
            }
        }
        if doomed.is_empty() {
            continue;
        }
        let block = db.memory.block_mut(0)?;
        for slot in doomed {
            block.invalidate_tuple(slot)?;
        }
        db.write_block(id, i, 0)?;
    }

    eliminate_holes(db, id)
}

/// Stages a disk block into a pool slot, substituting an empty block of
/// the relation's capacity when the disk block was never written.
fn stage(
    db: &mut Database,
    id: RelationId,
    block_index: usize,
    mem_slot: usize,
) -> Result<(), ExecutorError> {
    if !db.read_block(id, block_index, mem_slot)? {
        let fresh = db.new_block(id)?;
        db.memory.set_block(mem_slot, fresh)?;
    }
    Ok(())
}

/// Repacks the relation so that live tuples are contiguous from the
/// front, then truncates trailing empty blocks.
pub(crate) fn eliminate_holes(db: &mut Database, id: RelationId) -> Result<(), ExecutorError> {
    let num_blocks = db.num_blocks(id)?;
    if num_blocks == 0 {
        return Ok(());
    }
    let capacity = db.schema(id)?.tuples_per_block();

    let mut hole_block = 0usize;
    let mut hole_slot = 0usize;
    let mut fill_block = num_blocks - 1;
    // exclusive bound, decremented before each probe
    let mut fill_slot = capacity;

    stage(db, id, hole_block, 0)?;
    stage(db, id, fill_block, 1)?;

    loop {
        // advance the hole cursor to the next non-live slot
        let found_hole = loop {
            if hole_block > fill_block || hole_block >= num_blocks {
                break false;
            }
            if hole_slot >= capacity {
                hole_block += 1;
                hole_slot = 0;
                if hole_block >= num_blocks || hole_block > fill_block {
                    break false;
                }
                stage(db, id, hole_block, 0)?;
                continue;
            }
            let is_hole = match db.memory.block(0)?.tuple(hole_slot) {
                Some(t) => !t.is_valid(),
                None => true,
            };
            if is_hole {
                break true;
            }
            hole_slot += 1;
        };
        if !found_hole {
            break;
        }

        // walk the fill cursor backward to the last live tuple
        let found_fill = loop {
            if fill_slot == 0 {
                if fill_block <= hole_block {
                    break false;
                }
                fill_block -= 1;
                fill_slot = capacity;
                stage(db, id, fill_block, 1)?;
                continue;
            }
            fill_slot -= 1;
            if fill_block == hole_block && fill_slot < hole_slot {
                break false;
            }
            let live = db
                .memory
                .block(1)?
                .tuple(fill_slot)
                .is_some_and(|t| t.is_valid());
            if live {
                break true;
            }
        };
        if !found_fill {
            // the hole sits at or after the last live tuple; scrub the
            // tail of its block and finish
            let block = db.memory.block_mut(0)?;
            for slot in hole_slot..capacity {
                block.invalidate_tuple(slot)?;
            }
            db.write_block(id, hole_block, 0)?;
            break;
        }

        if fill_block == hole_block {
            // both cursors in one block; operate on the slot 0 copy so the
            // two staged views cannot diverge
            let Some(tuple) = db.memory.block(0)?.tuple(fill_slot).cloned() else {
                break;
            };
            let block = db.memory.block_mut(0)?;
            block.set_tuple(hole_slot, tuple)?;
            block.invalidate_tuple(fill_slot)?;
            db.write_block(id, hole_block, 0)?;
            stage(db, id, fill_block, 1)?;
        } else {
            let Some(tuple) = db.memory.block(1)?.tuple(fill_slot).cloned() else {
                break;
            };
            db.memory.block_mut(0)?.set_tuple(hole_slot, tuple)?;
            db.write_block(id, hole_block, 0)?;
            db.memory.block_mut(1)?.invalidate_tuple(fill_slot)?;
            db.write_block(id, fill_block, 1)?;
        }
        hole_slot += 1;
    }

    // truncate at the first fully empty block
    let num_blocks = db.num_blocks(id)?;
    for i in 0..num_blocks {
        let present = db.read_block(id, i, 0)?;
        let empty = !present || db.memory.block(0)?.num_tuples() == 0;
        if empty {
            db.truncate(id, i)?;
            return Ok(());
        }
    }
    Ok(())
}
