//! Catalog-specific errors.

use std::fmt;

use crate::storage::FIELDS_PER_BLOCK;

/// Errors from schema construction and catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A relation with this name is already registered.
    RelationAlreadyExists { name: String },

    /// No relation with this name is registered.
    NoSuchRelation { name: String },

    /// A relation id whose catalog entry has been dropped.
    DeadRelation { index: usize },

    /// Schema with no fields.
    EmptySchema,

    /// Two schema fields share a name.
    DuplicateField { name: String },

    /// Schema too wide for a tuple to fit in one block.
    TooManyFields { count: usize },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::RelationAlreadyExists { name } => {
                write!(f, "relation \"{}\" already exists", name)
            }
            CatalogError::NoSuchRelation { name } => {
                write!(f, "no such relation \"{}\"", name)
            }
            CatalogError::DeadRelation { index } => {
                write!(f, "relation handle {} refers to a dropped relation", index)
            }
            CatalogError::EmptySchema => {
                write!(f, "a schema needs at least one field")
            }
            CatalogError::DuplicateField { name } => {
                write!(f, "duplicate field name \"{}\"", name)
            }
            CatalogError::TooManyFields { count } => {
                write!(
                    f,
                    "schema has {} fields but a block holds only {}",
                    count, FIELDS_PER_BLOCK
                )
            }
        }
    }
}

impl std::error::Error for CatalogError {}
