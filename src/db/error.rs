//! Database-level errors.

use std::fmt;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Errors from [`Database`](super::Database) operations, which touch both
/// the catalog and the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    Catalog(CatalogError),
    Storage(StorageError),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::Catalog(e) => write!(f, "{}", e),
            DbError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DbError::Catalog(e) => Some(e),
            DbError::Storage(e) => Some(e),
        }
    }
}

impl From<CatalogError> for DbError {
    fn from(e: CatalogError) -> Self {
        DbError::Catalog(e)
    }
}

impl From<StorageError> for DbError {
    fn from(e: StorageError) -> Self {
        DbError::Storage(e)
    }
}
