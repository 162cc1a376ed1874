//! Object Cache
//!
//! In-memory copies of record mappings keyed by identifier. Filled on
//! `set` and on the first `get` of a saved record; unbounded.

use std::collections::HashMap;

use crate::keys::Identifier;
use crate::record::Mapping;

/// Identifier → field mapping cache
#[derive(Debug, Default)]
pub struct ObjectCache {
    entries: HashMap<Identifier, Mapping>,
}

impl ObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &Identifier) -> Option<&Mapping> {
        self.entries.get(id)
    }

    /// Insert or replace the cached mapping for `id`
    pub fn insert(&mut self, id: Identifier, mapping: Mapping) {
        self.entries.insert(id, mapping);
    }

    /// Evict `id`, returning the cached mapping if any
    pub fn remove(&mut self, id: &Identifier) -> Option<Mapping> {
        self.entries.remove(id)
    }

    /// Iterate over every cached entry (used by save)
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &Mapping)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
