//! The relation catalog.
//!
//! [`SchemaManager`] owns every relation's metadata in a growable arena;
//! a [`RelationId`] is a plain index into it. Dropping a relation empties
//! its arena slot, so an outstanding id for it fails loudly instead of
//! aliasing stale data. Freed slots are reused by later creations: the
//! arena index doubles as the relation's disk track number, so reuse
//! keeps the track table compact.

use std::collections::HashMap;

use super::error::CatalogError;
use super::schema::Schema;

/// Handle to a catalog entry. Cheap to copy; valid until the relation is
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationId(usize);

impl RelationId {
    /// The arena index, which is also the relation's disk track number.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct RelationEntry {
    name: String,
    schema: Schema,
}

/// The catalog: relation name to schema and track index.
#[derive(Debug, Default)]
pub struct SchemaManager {
    entries: Vec<Option<RelationEntry>>,
    by_name: HashMap<String, usize>,
}

impl SchemaManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new relation. Fails if the name is taken.
    pub fn create_relation(
        &mut self,
        name: &str,
        schema: Schema,
    ) -> Result<RelationId, CatalogError> {
        if self.by_name.contains_key(name) {
            return Err(CatalogError::RelationAlreadyExists {
                name: name.to_string(),
            });
        }
        let entry = RelationEntry {
            name: name.to_string(),
            schema,
        };
        let index = match self.entries.iter().position(|e| e.is_none()) {
            Some(free) => {
                self.entries[free] = Some(entry);
                free
            }
            None => {
                self.entries.push(Some(entry));
                self.entries.len() - 1
            }
        };
        self.by_name.insert(name.to_string(), index);
        Ok(RelationId(index))
    }

    /// Removes a relation from the catalog, invalidating its id.
    pub fn remove(&mut self, id: RelationId) -> Result<(), CatalogError> {
        let entry = self
            .entries
            .get_mut(id.0)
            .and_then(|e| e.take())
            .ok_or(CatalogError::DeadRelation { index: id.0 })?;
        self.by_name.remove(&entry.name);
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Looks a relation up by name.
    pub fn relation_id(&self, name: &str) -> Result<RelationId, CatalogError> {
        self.by_name
            .get(name)
            .map(|&i| RelationId(i))
            .ok_or_else(|| CatalogError::NoSuchRelation {
                name: name.to_string(),
            })
    }

    pub fn schema(&self, id: RelationId) -> Result<&Schema, CatalogError> {
        self.entry(id).map(|e| &e.schema)
    }

    pub fn name(&self, id: RelationId) -> Result<&str, CatalogError> {
        self.entry(id).map(|e| e.name.as_str())
    }

    fn entry(&self, id: RelationId) -> Result<&RelationEntry, CatalogError> {
        self.entries
            .get(id.0)
            .and_then(|e| e.as_ref())
            .ok_or(CatalogError::DeadRelation { index: id.0 })
    }
}
