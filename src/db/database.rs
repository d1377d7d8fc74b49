//! The execution context.

use tracing::debug;

use crate::catalog::{CatalogError, RelationId, Schema, SchemaManager};
use crate::storage::{Block, Disk, MainMemory, StorageError, Tuple};

use super::error::DbError;

/// Everything a statement execution needs: the catalog, the simulated
/// disk, and the buffer pool. One is built per process (and per test);
/// there is no process-global state.
///
/// `Database` also carries the relation-level block I/O: moving a block
/// between a relation's track and a buffer pool slot, with schema
/// validation on the write-back path. All four transfer operations charge
/// simulated latency through [`Disk`]; the metadata reads
/// ([`num_blocks`](Database::num_blocks), [`num_tuples`](Database::num_tuples))
/// are free.
#[derive(Debug)]
pub struct Database {
    pub catalog: SchemaManager,
    pub disk: Disk,
    pub memory: MainMemory,
}

impl Database {
    pub fn new() -> Self {
        Self {
            catalog: SchemaManager::new(),
            disk: Disk::new(),
            memory: MainMemory::new(),
        }
    }

    /// A context with a non-default buffer pool size.
    pub fn with_pool_size(pool_size: usize) -> Self {
        Self {
            catalog: SchemaManager::new(),
            disk: Disk::new(),
            memory: MainMemory::with_pool_size(pool_size),
        }
    }

    /// Registers a relation and allocates (or recycles) its disk track.
    pub fn create_relation(
        &mut self,
        name: &str,
        schema: Schema,
    ) -> Result<RelationId, CatalogError> {
        let id = self.catalog.create_relation(name, schema)?;
        self.disk.ensure_track(id.index());
        // a recycled catalog slot maps to a previously used track
        let _ = self.disk.clear_track(id.index());
        debug!(relation = name, track = id.index(), "created relation");
        Ok(id)
    }

    pub fn schema(&self, id: RelationId) -> Result<&Schema, CatalogError> {
        self.catalog.schema(id)
    }

    /// Number of blocks on the relation's track. Latency-free.
    pub fn num_blocks(&self, id: RelationId) -> Result<usize, DbError> {
        self.catalog.schema(id)?;
        Ok(self.disk.num_blocks(id.index())?)
    }

    /// Number of live tuples across the relation's blocks. Latency-free.
    pub fn num_tuples(&self, id: RelationId) -> Result<usize, DbError> {
        self.catalog.schema(id)?;
        let blocks = self.disk.track_blocks(id.index())?;
        Ok(blocks.iter().map(|b| b.num_tuples()).sum())
    }

    /// Copies one disk block of the relation into a buffer pool slot.
    ///
    /// Returns `Ok(false)`, leaving the slot untouched, if the disk
    /// block is absent or was never written, the benign "no such block
    /// yet" case. Bound violations are hard errors.
    pub fn read_block(
        &mut self,
        id: RelationId,
        block_index: usize,
        mem_slot: usize,
    ) -> Result<bool, DbError> {
        self.catalog.schema(id)?;
        if mem_slot >= self.memory.pool_size() {
            return Err(StorageError::SlotOutOfBounds {
                slot: mem_slot,
                pool_size: self.memory.pool_size(),
            }
            .into());
        }
        match self.disk.read_block(id.index(), block_index)? {
            Some(block) => {
                self.memory.set_block(mem_slot, block)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Bulk variant of [`read_block`](Database::read_block). Every block
    /// in the range must exist, and the destination slots must fit in the
    /// pool.
    pub fn read_blocks(
        &mut self,
        id: RelationId,
        start: usize,
        mem_slot: usize,
        count: usize,
    ) -> Result<(), DbError> {
        self.catalog.schema(id)?;
        if mem_slot + count > self.memory.pool_size() {
            return Err(StorageError::SlotRangeOutOfBounds {
                start: mem_slot,
                count,
                pool_size: self.memory.pool_size(),
            }
            .into());
        }
        let blocks = self.disk.read_blocks(id.index(), start, count)?;
        self.memory.set_blocks(mem_slot, blocks)?;
        Ok(())
    }

    /// Writes a staged block back to the relation's track.
    ///
    /// Every tuple in the staged block (holes included) is validated
    /// against the relation's schema first; a mismatch fails the write
    /// and reports the offending tuple's offset. The track is extended
    /// with placeholder blocks up to `block_index` if needed.
    pub fn write_block(
        &mut self,
        id: RelationId,
        block_index: usize,
        mem_slot: usize,
    ) -> Result<(), DbError> {
        let types = self.catalog.schema(id)?.field_types();
        let block = self.memory.block(mem_slot)?;
        for (offset, tuple) in block.tuples().iter().enumerate() {
            if !tuple.matches(&types) {
                return Err(StorageError::SchemaMismatch {
                    offset,
                    slot: mem_slot,
                }
                .into());
            }
        }
        let block = block.clone();
        self.disk.write_block(id.index(), block_index, block)?;
        Ok(())
    }

    /// Bulk counterpart of [`write_block`](Database::write_block), with
    /// the same per-tuple validation.
    pub fn write_blocks(
        &mut self,
        id: RelationId,
        start: usize,
        mem_slot: usize,
        count: usize,
    ) -> Result<(), DbError> {
        let types = self.catalog.schema(id)?.field_types();
        if count == 0 {
            return Err(StorageError::EmptyTransfer.into());
        }
        let mut staged = Vec::with_capacity(count);
        for slot in mem_slot..mem_slot + count {
            let block = self.memory.block(slot)?;
            for (offset, tuple) in block.tuples().iter().enumerate() {
                if !tuple.matches(&types) {
                    return Err(StorageError::SchemaMismatch { offset, slot }.into());
                }
            }
            staged.push(block.clone());
        }
        self.disk.write_blocks(id.index(), start, staged)?;
        Ok(())
    }

    /// Truncates the relation's track at `from`, discarding later blocks.
    pub fn truncate(&mut self, id: RelationId, from: usize) -> Result<(), DbError> {
        self.catalog.schema(id)?;
        self.disk.shrink_track(id.index(), from)?;
        Ok(())
    }

    /// An empty tuple of the relation's schema, every field defaulted.
    pub fn create_tuple(&self, id: RelationId) -> Result<Tuple, CatalogError> {
        Ok(self.catalog.schema(id)?.default_tuple())
    }

    /// An empty block sized for the relation's schema.
    pub fn new_block(&self, id: RelationId) -> Result<Block, CatalogError> {
        Ok(Block::new(self.catalog.schema(id)?.tuples_per_block()))
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
