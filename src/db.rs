//! The execution context tying catalog, disk, and buffer pool together.

pub mod database;
pub mod error;

pub use database::Database;
pub use error::DbError;
