//! The buffer pool.
//!
//! [`MainMemory`] is a fixed number of block-sized slots, the only path
//! through which disk content is read or written. Slots are owned
//! `Option<Block>` values behind bounds-checked accessors: reading a slot
//! nothing was staged into is an error, never a silent default.

use super::block::{Block, Tuple};
use super::error::StorageError;
use super::NUM_BLOCKS_IN_MEMORY;

/// Fixed-size staging buffer between the simulated disk and the executor.
#[derive(Debug)]
pub struct MainMemory {
    slots: Vec<Option<Block>>,
}

impl MainMemory {
    /// Creates a pool with the default [`NUM_BLOCKS_IN_MEMORY`] slots.
    pub fn new() -> Self {
        Self::with_pool_size(NUM_BLOCKS_IN_MEMORY)
    }

    /// Creates a pool with `pool_size` slots. Tests use small pools to
    /// force the block-nested-loop join path.
    pub fn with_pool_size(pool_size: usize) -> Self {
        Self {
            slots: (0..pool_size).map(|_| None).collect(),
        }
    }

    pub fn pool_size(&self) -> usize {
        self.slots.len()
    }

    /// Borrows the block staged in `slot`.
    pub fn block(&self, slot: usize) -> Result<&Block, StorageError> {
        self.check_slot(slot)?;
        self.slots[slot]
            .as_ref()
            .ok_or(StorageError::EmptySlot { slot })
    }

    /// Mutably borrows the block staged in `slot`.
    pub fn block_mut(&mut self, slot: usize) -> Result<&mut Block, StorageError> {
        self.check_slot(slot)?;
        self.slots[slot]
            .as_mut()
            .ok_or(StorageError::EmptySlot { slot })
    }

    /// Stages a block into `slot`, replacing any previous occupant.
    pub fn set_block(&mut self, slot: usize, block: Block) -> Result<(), StorageError> {
        self.check_slot(slot)?;
        self.slots[slot] = Some(block);
        Ok(())
    }

    /// Stages consecutive blocks starting at `start`.
    pub fn set_blocks(&mut self, start: usize, blocks: Vec<Block>) -> Result<(), StorageError> {
        let count = blocks.len();
        if count == 0 {
            return Err(StorageError::EmptyTransfer);
        }
        if start + count > self.slots.len() {
            return Err(StorageError::SlotRangeOutOfBounds {
                start,
                count,
                pool_size: self.slots.len(),
            });
        }
        for (i, block) in blocks.into_iter().enumerate() {
            self.slots[start + i] = Some(block);
        }
        Ok(())
    }

    /// Copies out every tuple (holes included) from `count` staged slots
    /// starting at `start`, in slot order.
    pub fn tuples(&self, start: usize, count: usize) -> Result<Vec<Tuple>, StorageError> {
        if start + count > self.slots.len() {
            return Err(StorageError::SlotRangeOutOfBounds {
                start,
                count,
                pool_size: self.slots.len(),
            });
        }
        let mut out = Vec::new();
        for slot in start..start + count {
            out.extend_from_slice(self.block(slot)?.tuples());
        }
        Ok(out)
    }

    fn check_slot(&self, slot: usize) -> Result<(), StorageError> {
        if slot >= self.slots.len() {
            return Err(StorageError::SlotOutOfBounds {
                slot,
                pool_size: self.slots.len(),
            });
        }
        Ok(())
    }
}

impl Default for MainMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::Field;

    fn block_with(n: i32) -> Block {
        let mut b = Block::new(2);
        b.push_tuple(Tuple::new(vec![Field::Int(n)])).unwrap();
        b
    }

    #[test]
    fn test_default_pool_size() {
        assert_eq!(MainMemory::new().pool_size(), NUM_BLOCKS_IN_MEMORY);
    }

    #[test]
    fn test_unstaged_slot_is_an_error() {
        let memory = MainMemory::new();
        assert_eq!(memory.block(0), Err(StorageError::EmptySlot { slot: 0 }));
    }

    #[test]
    fn test_slot_bounds() {
        let mut memory = MainMemory::with_pool_size(2);
        assert!(matches!(
            memory.block(2),
            Err(StorageError::SlotOutOfBounds {
                slot: 2,
                pool_size: 2
            })
        ));
        assert!(memory.set_block(2, block_with(0)).is_err());
    }

    #[test]
    fn test_stage_and_read_back() {
        let mut memory = MainMemory::new();
        memory.set_block(3, block_with(9)).unwrap();
        assert_eq!(memory.block(3).unwrap().tuples()[0].fields(), &[Field::Int(9)]);
    }

    #[test]
    fn test_set_blocks_range_check() {
        let mut memory = MainMemory::with_pool_size(3);
        assert!(matches!(
            memory.set_blocks(2, vec![block_with(1), block_with(2)]),
            Err(StorageError::SlotRangeOutOfBounds { .. })
        ));
        memory
            .set_blocks(1, vec![block_with(1), block_with(2)])
            .unwrap();
        assert!(memory.block(1).is_ok());
        assert!(memory.block(2).is_ok());
    }

    #[test]
    fn test_tuples_gathers_in_slot_order() {
        let mut memory = MainMemory::new();
        memory.set_block(0, block_with(1)).unwrap();
        memory.set_block(1, block_with(2)).unwrap();
        let tuples = memory.tuples(0, 2).unwrap();
        assert_eq!(tuples.len(), 2);
        assert_eq!(tuples[0].fields(), &[Field::Int(1)]);
        assert_eq!(tuples[1].fields(), &[Field::Int(2)]);
    }
}
