//! Storage-layer errors.

use std::fmt;

/// Errors from the simulated disk, the buffer pool, and block operations.
///
/// Bound violations are reported, not fatal: a failing call aborts the
/// current statement but never the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Buffer pool slot index past the configured pool size.
    SlotOutOfBounds { slot: usize, pool_size: usize },

    /// Buffer pool slot read before anything was staged into it.
    EmptySlot { slot: usize },

    /// A bulk transfer would run past the end of the buffer pool.
    SlotRangeOutOfBounds {
        start: usize,
        count: usize,
        pool_size: usize,
    },

    /// Disk track index past the number of allocated tracks.
    TrackOutOfBounds { track: usize, num_tracks: usize },

    /// Block index past the end of a track, where the operation cannot
    /// extend the track.
    BlockOutOfBounds { index: usize, num_blocks: usize },

    /// Bulk transfer with a zero block count.
    EmptyTransfer,

    /// Appending to a block whose live-tuple count equals its capacity.
    BlockFull { capacity: usize },

    /// Tuple slot index past a block's capacity.
    TupleSlotOutOfBounds { slot: usize, capacity: usize },

    /// A tuple staged for write-back does not match the target relation's
    /// schema. `offset` is the position of the offending tuple within the
    /// staged block, `slot` the memory block it was staged in.
    SchemaMismatch { offset: usize, slot: usize },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::SlotOutOfBounds { slot, pool_size } => {
                write!(
                    f,
                    "memory block index {} out of bounds (pool size {})",
                    slot, pool_size
                )
            }
            StorageError::EmptySlot { slot } => {
                write!(f, "memory block {} has not been staged", slot)
            }
            StorageError::SlotRangeOutOfBounds {
                start,
                count,
                pool_size,
            } => {
                write!(
                    f,
                    "memory block range {}..{} out of bounds (pool size {})",
                    start,
                    start + count,
                    pool_size
                )
            }
            StorageError::TrackOutOfBounds { track, num_tracks } => {
                write!(
                    f,
                    "disk track {} out of bounds ({} tracks allocated)",
                    track, num_tracks
                )
            }
            StorageError::BlockOutOfBounds { index, num_blocks } => {
                write!(
                    f,
                    "block index {} out of bounds (track holds {} blocks)",
                    index, num_blocks
                )
            }
            StorageError::EmptyTransfer => {
                write!(f, "bulk block transfer needs at least one block")
            }
            StorageError::BlockFull { capacity } => {
                write!(f, "block is full ({} tuples)", capacity)
            }
            StorageError::TupleSlotOutOfBounds { slot, capacity } => {
                write!(
                    f,
                    "tuple slot {} out of bounds (block capacity {})",
                    slot, capacity
                )
            }
            StorageError::SchemaMismatch { offset, slot } => {
                write!(
                    f,
                    "the tuple at offset {} of memory block {} has a different schema",
                    offset, slot
                )
            }
        }
    }
}

impl std::error::Error for StorageError {}
