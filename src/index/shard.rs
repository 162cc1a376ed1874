//! ShardIndex implementation
//!
//! Ordered prefix list plus a prefix → identifiers map. Both levels use
//! `Vec` so iteration order survives a save/load cycle.

use std::collections::HashMap;

use crate::error::{Result, ShardError};
use crate::keys::{is_valid_prefix, HashAlgorithm, Identifier};

/// In-memory index of identifiers sharded by prefix
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShardIndex {
    /// Active prefixes, in the order they were first seen
    prefixes: Vec<String>,

    /// Identifiers stored under each active prefix
    references: HashMap<String, Vec<Identifier>>,
}

impl ShardIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an index from persisted parts.
    ///
    /// Prefixes with empty lists are dropped. Malformed prefixes, identifiers
    /// that are not `algorithm` digests, and identifiers filed under the
    /// wrong prefix are rejected as corruption.
    pub fn from_parts(
        prefixes: Vec<String>,
        mut references: HashMap<String, Vec<Identifier>>,
        algorithm: HashAlgorithm,
    ) -> Result<Self> {
        let mut index = Self::new();

        for prefix in prefixes {
            if !is_valid_prefix(&prefix) {
                return Err(ShardError::Corrupted(format!("invalid prefix {:?}", prefix)));
            }

            let ids = references.remove(&prefix).unwrap_or_default();
            if ids.is_empty() {
                tracing::warn!(prefix = %prefix, "skipping prefix with no references");
                continue;
            }

            if let Some(bad) = ids.iter().find(|id| !id.is_valid_for(algorithm)) {
                return Err(ShardError::Corrupted(format!(
                    "invalid {} identifier {:?} under prefix {}",
                    algorithm, bad.as_str(), prefix
                )));
            }

            if let Some(bad) = ids.iter().find(|id| id.prefix() != prefix) {
                return Err(ShardError::Corrupted(format!(
                    "identifier {} filed under prefix {}",
                    bad, prefix
                )));
            }

            for id in ids {
                index.add(id);
            }
        }

        Ok(index)
    }

    /// Check whether `id` is tracked
    pub fn contains(&self, id: &Identifier) -> bool {
        self.references
            .get(id.prefix())
            .map(|ids| ids.contains(id))
            .unwrap_or(false)
    }

    /// Track `id`. Adding twice is a no-op.
    pub fn add(&mut self, id: Identifier) {
        let prefix = id.prefix().to_string();

        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix.clone());
        }

        let ids = self.references.entry(prefix).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    /// Stop tracking `id`, dropping its prefix once the list is empty.
    ///
    /// Returns whether `id` was tracked.
    pub fn remove(&mut self, id: &Identifier) -> bool {
        let prefix = id.prefix();

        let Some(ids) = self.references.get_mut(prefix) else {
            return false;
        };

        let before = ids.len();
        ids.retain(|existing| existing != id);
        let removed = ids.len() != before;

        if ids.is_empty() {
            self.references.remove(prefix);
            self.prefixes.retain(|p| p != prefix);
        }

        removed
    }

    /// Lazily iterate identifiers: prefixes in order, then each list in order
    pub fn identifiers(&self) -> Identifiers<'_> {
        Identifiers {
            index: self,
            prefix_pos: 0,
            id_pos: 0,
        }
    }

    /// Total number of tracked identifiers
    pub fn count(&self) -> usize {
        self.prefixes
            .iter()
            .filter_map(|p| self.references.get(p))
            .map(Vec::len)
            .sum()
    }

    /// Active prefixes in order
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Identifiers under `prefix` (empty if the prefix is inactive)
    pub fn references(&self, prefix: &str) -> &[Identifier] {
        self.references
            .get(prefix)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Iterator over all identifiers of a [`ShardIndex`]
pub struct Identifiers<'a> {
    index: &'a ShardIndex,
    prefix_pos: usize,
    id_pos: usize,
}

impl<'a> Iterator for Identifiers<'a> {
    type Item = &'a Identifier;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        loop {
            let prefix = index.prefixes.get(self.prefix_pos)?;
            let ids = index.references(prefix);

            if let Some(id) = ids.get(self.id_pos) {
                self.id_pos += 1;
                return Some(id);
            }

            self.prefix_pos += 1;
            self.id_pos = 0;
        }
    }
}
