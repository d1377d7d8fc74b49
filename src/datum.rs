//! Column types and values.
//!
//! This module defines the engine's two-type column model. [`FieldType`]
//! identifies a column's type and [`Field`] holds a single typed value.
//! Fields have value semantics: reading one out of a tuple yields a copy,
//! never a shared reference into storage.

use std::fmt;

/// Maximum number of characters in a [`FieldType::Str20`] value.
pub const MAX_STR_LEN: usize = 20;

/// Column type identifier.
///
/// Schemas are immutable once a relation is created, so a field's type
/// never changes over the lifetime of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 32-bit signed integer.
    Int,
    /// Fixed-width text of at most [`MAX_STR_LEN`] characters.
    Str20,
}

impl FieldType {
    /// Returns the SQL display name for this type (e.g. `"INT"`).
    pub const fn display_name(self) -> &'static str {
        match self {
            FieldType::Int => "INT",
            FieldType::Str20 => "STR20",
        }
    }

    /// Returns the default value for this type.
    ///
    /// New tuples start with every field defaulted; INSERT assigns the
    /// literal `NULL` on an INT column the same default.
    pub fn default_value(self) -> Field {
        match self {
            FieldType::Int => Field::Int(0),
            FieldType::Str20 => Field::Str(String::new()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single typed column value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Integer value.
    Int(i32),
    /// Bounded string value.
    Str(String),
}

impl Field {
    /// Returns the type of this value.
    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Int(_) => FieldType::Int,
            Field::Str(_) => FieldType::Str20,
        }
    }

    /// Returns the integer payload, or `None` for a string field.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Field::Int(n) => Some(*n),
            Field::Str(_) => None,
        }
    }

    /// Returns the string payload, or `None` for an integer field.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Int(_) => None,
            Field::Str(s) => Some(s),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Int(n) => write!(f, "{}", n),
            Field::Str(s) => f.write_str(s),
        }
    }
}
