//! Simulated disk.
//!
//! The disk is an in-memory simulation: a collection of per-relation
//! "tracks", each an ordered sequence of [`Block`]s. Block transfers cost
//! simulated time and increment an I/O counter; metadata reads and track
//! resizing are free. "Latency" here is bookkeeping for benchmark output,
//! not an actual delay.

use tracing::debug;

use super::block::Block;
use super::error::StorageError;

/// Simulated cost of moving one block between disk and memory, in
/// milliseconds. Charged once per block by the four transfer operations.
pub const BLOCK_IO_MILLIS: f64 = 5.6;

/// The simulated disk: per-relation block tracks plus benchmark counters.
#[derive(Debug, Default)]
pub struct Disk {
    tracks: Vec<Vec<Block>>,
    io_count: u64,
    elapsed_millis: f64,
}

impl Disk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total block I/O operations performed so far.
    pub fn io_count(&self) -> u64 {
        self.io_count
    }

    /// Total simulated disk time spent so far, in milliseconds.
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed_millis
    }

    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Grows the track table so `track` is a valid index. New tracks start
    /// empty. Free of simulated latency.
    pub fn ensure_track(&mut self, track: usize) {
        while self.tracks.len() <= track {
            self.tracks.push(Vec::new());
        }
    }

    /// Empties a track without charging latency. Used when a catalog slot
    /// is reused for a new relation.
    pub fn clear_track(&mut self, track: usize) -> Result<(), StorageError> {
        self.track_mut(track)?.clear();
        Ok(())
    }

    /// Number of blocks on a track. Free of simulated latency.
    pub fn num_blocks(&self, track: usize) -> Result<usize, StorageError> {
        Ok(self.track(track)?.len())
    }

    /// Borrow of a track's blocks for latency-free metadata scans
    /// (live-tuple accounting).
    pub fn track_blocks(&self, track: usize) -> Result<&[Block], StorageError> {
        Ok(self.track(track)?)
    }

    /// Reads one block, charging one I/O.
    ///
    /// Returns `Ok(None)` if the block does not exist yet or has never
    /// been written (a placeholder), the benign "no such block" case.
    pub fn read_block(&mut self, track: usize, index: usize) -> Result<Option<Block>, StorageError> {
        let blocks = self.track(track)?;
        let block = match blocks.get(index) {
            Some(b) if !b.is_empty() => b.clone(),
            _ => return Ok(None),
        };
        self.charge(1);
        Ok(Some(block))
    }

    /// Reads `count` consecutive blocks starting at `start`, charging one
    /// I/O per block. Every block in the range must exist.
    pub fn read_blocks(
        &mut self,
        track: usize,
        start: usize,
        count: usize,
    ) -> Result<Vec<Block>, StorageError> {
        if count == 0 {
            return Err(StorageError::EmptyTransfer);
        }
        let blocks = self.track(track)?;
        if start + count > blocks.len() {
            return Err(StorageError::BlockOutOfBounds {
                index: start + count - 1,
                num_blocks: blocks.len(),
            });
        }
        let copied: Vec<Block> = blocks[start..start + count].to_vec();
        self.charge(count);
        Ok(copied)
    }

    /// Writes one block at `index`, charging one I/O. The track is first
    /// extended with placeholder blocks up to `index` if needed.
    pub fn write_block(
        &mut self,
        track: usize,
        index: usize,
        block: Block,
    ) -> Result<(), StorageError> {
        let blocks = self.track_mut(track)?;
        while blocks.len() <= index {
            blocks.push(Block::placeholder());
        }
        blocks[index] = block;
        self.charge(1);
        Ok(())
    }

    /// Bulk counterpart of [`write_block`](Disk::write_block).
    pub fn write_blocks(
        &mut self,
        track: usize,
        start: usize,
        blocks: Vec<Block>,
    ) -> Result<(), StorageError> {
        if blocks.is_empty() {
            return Err(StorageError::EmptyTransfer);
        }
        let count = blocks.len();
        let dest = self.track_mut(track)?;
        while dest.len() < start + count {
            dest.push(Block::placeholder());
        }
        for (i, block) in blocks.into_iter().enumerate() {
            dest[start + i] = block;
        }
        self.charge(count);
        Ok(())
    }

    /// Truncates a track at `from`, discarding all later blocks. Free of
    /// simulated latency.
    pub fn shrink_track(&mut self, track: usize, from: usize) -> Result<(), StorageError> {
        let blocks = self.track_mut(track)?;
        if from > blocks.len() {
            return Err(StorageError::BlockOutOfBounds {
                index: from,
                num_blocks: blocks.len(),
            });
        }
        blocks.truncate(from);
        Ok(())
    }

    fn track(&self, track: usize) -> Result<&Vec<Block>, StorageError> {
        self.tracks.get(track).ok_or(StorageError::TrackOutOfBounds {
            track,
            num_tracks: self.tracks.len(),
        })
    }

    fn track_mut(&mut self, track: usize) -> Result<&mut Vec<Block>, StorageError> {
        let num_tracks = self.tracks.len();
        self.tracks
            .get_mut(track)
            .ok_or(StorageError::TrackOutOfBounds { track, num_tracks })
    }

    fn charge(&mut self, blocks: usize) {
        self.io_count += blocks as u64;
        self.elapsed_millis += BLOCK_IO_MILLIS * blocks as f64;
        debug!(blocks, total_ios = self.io_count, "disk transfer");
    }
}
