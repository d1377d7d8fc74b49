//! Relation schemas.

use crate::datum::FieldType;
use crate::storage::{Tuple, FIELDS_PER_BLOCK};

use super::error::CatalogError;

/// An ordered sequence of uniquely named, typed fields.
///
/// Immutable once a relation has been created with it. A schema also
/// fixes the relation's block geometry: `tuples_per_block` is how many
/// tuples of this schema fit into one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(String, FieldType)>,
}

impl Schema {
    /// Builds a schema from `(name, type)` pairs.
    ///
    /// Fails on an empty field list, a duplicate name, or more fields
    /// than a block can carry.
    pub fn new(fields: Vec<(String, FieldType)>) -> Result<Self, CatalogError> {
        if fields.is_empty() {
            return Err(CatalogError::EmptySchema);
        }
        if fields.len() > FIELDS_PER_BLOCK {
            return Err(CatalogError::TooManyFields {
                count: fields.len(),
            });
        }
        for (i, (name, _)) in fields.iter().enumerate() {
            if fields[..i].iter().any(|(other, _)| other == name) {
                return Err(CatalogError::DuplicateField { name: name.clone() });
            }
        }
        Ok(Self { fields })
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// How many tuples of this schema fit in one block. At least 1, since
    /// a schema never exceeds [`FIELDS_PER_BLOCK`] fields.
    pub fn tuples_per_block(&self) -> usize {
        FIELDS_PER_BLOCK / self.fields.len()
    }

    pub fn field_name(&self, offset: usize) -> Option<&str> {
        self.fields.get(offset).map(|(name, _)| name.as_str())
    }

    pub fn field_type(&self, offset: usize) -> Option<FieldType> {
        self.fields.get(offset).map(|(_, ty)| *ty)
    }

    /// Positional offset of a field by exact name, or `None`. Offset 0 is
    /// a valid answer, distinct from "not found".
    pub fn field_offset(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    /// Offset and type of a field by exact name.
    pub fn lookup(&self, name: &str) -> Option<(usize, FieldType)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, (n, _))| n == name)
            .map(|(i, (_, ty))| (i, *ty))
    }

    /// Iterates `(name, type)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(n, ty)| (n.as_str(), *ty))
    }

    /// Field types in field order.
    pub fn field_types(&self) -> Vec<FieldType> {
        self.fields.iter().map(|(_, ty)| *ty).collect()
    }

    /// A valid tuple of this schema with every field defaulted.
    pub fn default_tuple(&self) -> Tuple {
        Tuple::new(self.fields.iter().map(|(_, ty)| ty.default_value()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::Field;

    fn two_fields() -> Schema {
        Schema::new(vec![
            ("id".into(), FieldType::Int),
            ("name".into(), FieldType::Str20),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_schema() {
        assert_eq!(Schema::new(vec![]), Err(CatalogError::EmptySchema));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = Schema::new(vec![
            ("x".into(), FieldType::Int),
            ("x".into(), FieldType::Str20),
        ]);
        assert_eq!(result, Err(CatalogError::DuplicateField { name: "x".into() }));
    }

    #[test]
    fn test_rejects_too_many_fields() {
        let fields = (0..9)
            .map(|i| (format!("f{}", i), FieldType::Int))
            .collect();
        assert_eq!(
            Schema::new(fields),
            Err(CatalogError::TooManyFields { count: 9 })
        );
    }

    #[test]
    fn test_tuples_per_block() {
        assert_eq!(two_fields().tuples_per_block(), 4);
        let one = Schema::new(vec![("x".into(), FieldType::Int)]).unwrap();
        assert_eq!(one.tuples_per_block(), 8);
        let three = Schema::new(vec![
            ("a".into(), FieldType::Int),
            ("b".into(), FieldType::Int),
            ("c".into(), FieldType::Int),
        ])
        .unwrap();
        assert_eq!(three.tuples_per_block(), 2);
    }

    #[test]
    fn test_offset_lookup() {
        let schema = two_fields();
        assert_eq!(schema.field_offset("id"), Some(0));
        assert_eq!(schema.field_offset("name"), Some(1));
        assert_eq!(schema.field_offset("missing"), None);
        assert_eq!(schema.lookup("name"), Some((1, FieldType::Str20)));
    }

    #[test]
    fn test_default_tuple() {
        let tuple = two_fields().default_tuple();
        assert!(tuple.is_valid());
        assert_eq!(tuple.fields(), &[Field::Int(0), Field::Str(String::new())]);
    }
}
