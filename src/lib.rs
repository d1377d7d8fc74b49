//! A miniature relational database engine over a simulated block disk.
//!
//! The engine executes a small SQL dialect (CREATE, DROP, INSERT,
//! DELETE, SELECT with joins) against relations stored as fixed-capacity
//! blocks on a latency-charging simulated disk, staged through a
//! ten-slot buffer pool. The crate layers bottom-up:
//!
//! ```text
//! +-----------------------------------------+
//! | executor   statement handlers, joins    |
//! +-----------------------------------------+
//! | sql        lexer, parser, AST           |
//! +-----------------------------------------+
//! | db         execution context            |
//! +--------------------+--------------------+
//! | catalog   schemas  | storage   blocks,  |
//! |           + names  |   disk, buffer pool|
//! +--------------------+--------------------+
//! ```

pub mod catalog;
pub mod datum;
pub mod db;
pub mod executor;
pub mod sql;
pub mod storage;
