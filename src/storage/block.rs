//! Tuples and fixed-capacity blocks.
//!
//! A [`Block`] is the unit of disk transfer: an ordered sequence of tuple
//! slots with a fixed capacity derived from the owning relation's schema.
//! A deleted tuple is not removed from its slot; it is *invalidated* and
//! left in place as a "hole" (tombstone) until DELETE compaction repacks
//! the relation. A block's tuple count is the number of live tuples, which
//! can be smaller than both its capacity and its highest occupied slot.

use crate::datum::{Field, FieldType};

use super::error::StorageError;

/// A single record: ordered field values plus a validity flag.
///
/// An invalid tuple ("hole") still occupies its slot, distinct from a
/// slot that was never written. Field values are copied out, never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    fields: Vec<Field>,
    valid: bool,
}

impl Tuple {
    /// Creates a valid tuple from the given field values.
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            valid: true,
        }
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the field at `index`, or `None` if out of bounds.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Replaces the field at `index`. Returns `false` if out of bounds.
    pub fn set_field(&mut self, index: usize, value: Field) -> bool {
        match self.fields.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Marks this tuple as a hole. The field values stay in place but the
    /// tuple no longer counts as live data.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Returns true if this tuple's arity and field types match `types`.
    ///
    /// Holes are checked too: a hole keeps the schema it was created with.
    pub fn matches(&self, types: &[FieldType]) -> bool {
        self.fields.len() == types.len()
            && self
                .fields
                .iter()
                .zip(types)
                .all(|(f, ty)| f.field_type() == *ty)
    }

    fn hole_like(&self) -> Tuple {
        let mut t = self.clone();
        t.invalidate();
        t
    }
}

/// A fixed-capacity ordered sequence of tuple slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    capacity: usize,
    slots: Vec<Tuple>,
}

impl Block {
    /// Creates an empty block able to hold `capacity` tuples.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Creates a zero-capacity placeholder block, used by the disk to pad
    /// a track up to a written index. Reading a placeholder back fails as
    /// "no such block yet".
    pub fn placeholder() -> Self {
        Self {
            capacity: 0,
            slots: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live (non-hole) tuples. Holes count toward capacity but
    /// not toward this.
    pub fn num_tuples(&self) -> usize {
        self.slots.iter().filter(|t| t.is_valid()).count()
    }

    /// Number of occupied slots, holes included.
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// True if no slot has ever been written.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All occupied slots in order, holes included. Callers scanning for
    /// live data must check [`Tuple::is_valid`].
    pub fn tuples(&self) -> &[Tuple] {
        &self.slots
    }

    /// Returns the tuple at `slot`, or `None` for a never-written slot.
    pub fn tuple(&self, slot: usize) -> Option<&Tuple> {
        self.slots.get(slot)
    }

    /// Appends a tuple.
    ///
    /// Fullness is judged by the live-tuple count: if it already equals
    /// capacity the append fails. When every slot is occupied but a hole
    /// exists, the first hole slot is reclaimed. After DELETE compaction
    /// holes are only trailing, so in practice an append lands right after
    /// the last live tuple.
    pub fn push_tuple(&mut self, tuple: Tuple) -> Result<(), StorageError> {
        if self.num_tuples() >= self.capacity {
            return Err(StorageError::BlockFull {
                capacity: self.capacity,
            });
        }
        if self.slots.len() < self.capacity {
            self.slots.push(tuple);
            return Ok(());
        }
        for slot in self.slots.iter_mut() {
            if !slot.is_valid() {
                *slot = tuple;
                return Ok(());
            }
        }
        // unreachable: live < capacity and all slots occupied implies a hole
        Err(StorageError::BlockFull {
            capacity: self.capacity,
        })
    }

    /// Writes `tuple` into `slot`, padding any gap below it with holes.
    pub fn set_tuple(&mut self, slot: usize, tuple: Tuple) -> Result<(), StorageError> {
        if slot >= self.capacity {
            return Err(StorageError::TupleSlotOutOfBounds {
                slot,
                capacity: self.capacity,
            });
        }
        while self.slots.len() <= slot {
            self.slots.push(tuple.hole_like());
        }
        self.slots[slot] = tuple;
        Ok(())
    }

    /// Tombstones the tuple at `slot`. Invalidating a never-written slot
    /// within capacity is a no-op (it is already not live).
    pub fn invalidate_tuple(&mut self, slot: usize) -> Result<(), StorageError> {
        if slot >= self.capacity {
            return Err(StorageError::TupleSlotOutOfBounds {
                slot,
                capacity: self.capacity,
            });
        }
        if let Some(t) = self.slots.get_mut(slot) {
            t.invalidate();
        }
        Ok(())
    }

    /// Discards every slot, holes included. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_tuple(n: i32) -> Tuple {
        Tuple::new(vec![Field::Int(n)])
    }

    #[test]
    fn test_tuple_invalidate() {
        let mut t = int_tuple(5);
        assert!(t.is_valid());
        t.invalidate();
        assert!(!t.is_valid());
        // field values survive tombstoning
        assert_eq!(t.field(0), Some(&Field::Int(5)));
    }

    #[test]
    fn test_tuple_matches() {
        let t = Tuple::new(vec![Field::Int(1), Field::Str("a".into())]);
        assert!(t.matches(&[FieldType::Int, FieldType::Str20]));
        assert!(!t.matches(&[FieldType::Str20, FieldType::Int]));
        assert!(!t.matches(&[FieldType::Int]));
    }

    #[test]
    fn test_push_until_full() {
        let mut block = Block::new(2);
        block.push_tuple(int_tuple(1)).unwrap();
        block.push_tuple(int_tuple(2)).unwrap();
        assert_eq!(block.num_tuples(), 2);
        assert_eq!(
            block.push_tuple(int_tuple(3)),
            Err(StorageError::BlockFull { capacity: 2 })
        );
    }

    #[test]
    fn test_holes_count_toward_capacity_not_tuples() {
        let mut block = Block::new(4);
        for n in 0..3 {
            block.push_tuple(int_tuple(n)).unwrap();
        }
        block.invalidate_tuple(1).unwrap();
        assert_eq!(block.num_tuples(), 2);
        assert_eq!(block.num_slots(), 3);
    }

    #[test]
    fn test_push_reclaims_first_hole_when_slots_full() {
        let mut block = Block::new(2);
        block.push_tuple(int_tuple(1)).unwrap();
        block.push_tuple(int_tuple(2)).unwrap();
        block.invalidate_tuple(0).unwrap();
        block.push_tuple(int_tuple(3)).unwrap();
        assert_eq!(block.tuple(0), Some(&int_tuple(3)));
        assert_eq!(block.num_tuples(), 2);
    }

    #[test]
    fn test_set_tuple_pads_gap_with_holes() {
        let mut block = Block::new(4);
        block.set_tuple(2, int_tuple(9)).unwrap();
        assert_eq!(block.num_slots(), 3);
        assert_eq!(block.num_tuples(), 1);
        assert!(!block.tuple(0).unwrap().is_valid());
        assert!(block.tuple(2).unwrap().is_valid());
    }

    #[test]
    fn test_set_tuple_out_of_bounds() {
        let mut block = Block::new(2);
        assert!(matches!(
            block.set_tuple(2, int_tuple(0)),
            Err(StorageError::TupleSlotOutOfBounds { slot: 2, .. })
        ));
    }

    #[test]
    fn test_invalidate_unwritten_slot_is_noop() {
        let mut block = Block::new(3);
        block.push_tuple(int_tuple(1)).unwrap();
        block.invalidate_tuple(2).unwrap();
        assert_eq!(block.num_tuples(), 1);
        assert!(block.invalidate_tuple(3).is_err());
    }

    #[test]
    fn test_clear() {
        let mut block = Block::new(2);
        block.push_tuple(int_tuple(1)).unwrap();
        block.clear();
        assert!(block.is_empty());
        assert_eq!(block.capacity(), 2);
    }
}
