//! Execution errors.

use std::error::Error;
use std::fmt;

use crate::catalog::CatalogError;
use crate::datum::FieldType;
use crate::db::DbError;
use crate::storage::StorageError;

/// Which statement form was being executed. Used to prefix errors the
/// way the shell reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Create,
    Drop,
    Insert,
    Select,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Create => "CREATE",
            StatementKind::Drop => "DROP",
            StatementKind::Insert => "INSERT",
            StatementKind::Select => "SELECT",
            StatementKind::Delete => "DELETE",
        }
    }
}

/// What went wrong while executing a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    Catalog(CatalogError),
    Storage(StorageError),
    /// A column name was not found in the named relation.
    NoSuchColumn { column: String, relation: String },
    /// An unqualified column name matched no relation in scope.
    UnknownColumn { column: String },
    /// An unqualified column name matched more than one relation.
    AmbiguousColumn { column: String },
    /// A qualifier named a relation other than the one being scanned.
    QualifierMismatch { qualifier: String, relation: String },
    /// A qualifier named a relation absent from the FROM list.
    QualifierNotInFrom { qualifier: String },
    /// An arithmetic or comparison operand was not an integer.
    IntegerExpected { found: String },
    /// INSERT column list and VALUES list differ in length.
    ValueCountMismatch { columns: usize, values: usize },
    /// A string literal exceeds the STR20 bound.
    StringTooLong { value: String, max: usize },
    /// A join names more relations than the buffer pool can hold.
    TooManyRelations { count: usize, max: usize },
    /// A VALUES literal does not fit the destination column's type.
    LiteralTypeMismatch { column: String, expected: FieldType },
    /// An INSERT ... SELECT source field does not fit the destination.
    CopyTypeMismatch {
        column: String,
        expected: FieldType,
        found: FieldType,
    },
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorError::Catalog(e) => write!(f, "{e}"),
            ExecutorError::Storage(e) => write!(f, "{e}"),
            ExecutorError::NoSuchColumn { column, relation } => {
                write!(f, "no column \"{column}\" in relation \"{relation}\"")
            }
            ExecutorError::UnknownColumn { column } => {
                write!(f, "column \"{column}\" not found in any relation")
            }
            ExecutorError::AmbiguousColumn { column } => {
                write!(f, "column \"{column}\" is ambiguous")
            }
            ExecutorError::QualifierMismatch { qualifier, relation } => {
                write!(
                    f,
                    "qualifier \"{qualifier}\" does not name relation \"{relation}\""
                )
            }
            ExecutorError::QualifierNotInFrom { qualifier } => {
                write!(f, "relation \"{qualifier}\" is not in the FROM list")
            }
            ExecutorError::IntegerExpected { found } => {
                write!(f, "expected an integer operand, found {found}")
            }
            ExecutorError::ValueCountMismatch { columns, values } => {
                write!(f, "{columns} columns but {values} values")
            }
            ExecutorError::StringTooLong { value, max } => {
                write!(f, "string \"{value}\" exceeds {max} characters")
            }
            ExecutorError::TooManyRelations { count, max } => {
                write!(f, "cannot join {count} relations with {max} memory blocks")
            }
            ExecutorError::LiteralTypeMismatch { column, expected } => {
                write!(
                    f,
                    "value for column \"{column}\" is not of type {}",
                    expected.display_name()
                )
            }
            ExecutorError::CopyTypeMismatch {
                column,
                expected,
                found,
            } => {
                write!(
                    f,
                    "column \"{column}\" expects {} but the source provides {}",
                    expected.display_name(),
                    found.display_name()
                )
            }
        }
    }
}

impl Error for ExecutorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExecutorError::Catalog(e) => Some(e),
            ExecutorError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CatalogError> for ExecutorError {
    fn from(e: CatalogError) -> Self {
        ExecutorError::Catalog(e)
    }
}

impl From<StorageError> for ExecutorError {
    fn from(e: StorageError) -> Self {
        ExecutorError::Storage(e)
    }
}

impl From<DbError> for ExecutorError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Catalog(e) => ExecutorError::Catalog(e),
            DbError::Storage(e) => ExecutorError::Storage(e),
        }
    }
}

/// An [`ExecutorError`] tagged with the statement form it arose in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementError {
    pub kind: StatementKind,
    pub source: ExecutorError,
}

impl StatementError {
    pub fn new(kind: StatementKind, source: ExecutorError) -> Self {
        Self { kind, source }
    }
}

impl fmt::Display for StatementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error in a {} statement: {}", self.kind.as_str(), self.source)
    }
}

impl Error for StatementError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}
