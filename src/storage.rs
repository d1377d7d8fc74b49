//! Simulated block storage.
//!
//! The storage manager is organized in three layers:
//!
//! ```text
//!   executor
//!      |
//!      v
//!  +-------------+   stage/unstage   +------------------+
//!  | MainMemory  | <---------------> |       Disk       |
//!  | (pool of    |   (block copies,  | (per-relation    |
//!  |  Block      |    I/O counted)   |  tracks of       |
//!  |  slots)     |                   |  Blocks)         |
//!  +-------------+                   +------------------+
//! ```
//!
//! All disk content moves through the buffer pool; the executor never
//! touches a track directly. Blocks hold [`Tuple`]s, whose deleted state
//! is a tombstone ("hole") rather than removal.

pub mod block;
pub mod disk;
pub mod error;
pub mod memory;

pub use block::{Block, Tuple};
pub use disk::{Disk, BLOCK_IO_MILLIS};
pub use error::StorageError;
pub use memory::MainMemory;

/// Field capacity of one block. A block holds `FIELDS_PER_BLOCK /
/// schema.num_fields()` tuples.
pub const FIELDS_PER_BLOCK: usize = 8;

/// Default number of block slots in the buffer pool.
pub const NUM_BLOCKS_IN_MEMORY: usize = 10;
