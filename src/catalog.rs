//! Relation metadata: schemas and the catalog.
//!
//! Relations are created and dropped only through [`SchemaManager`];
//! query code holds a [`RelationId`] and resolves everything else through
//! the catalog at use time.

pub mod error;
pub mod manager;
pub mod schema;

pub use error::CatalogError;
pub use manager::{RelationId, SchemaManager};
pub use schema::Schema;
