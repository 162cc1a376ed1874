//! Persistence Manager
//!
//! Moves store state between memory and the on-disk layout.
//!
//! ## Responsibilities
//! - Detect whether a directory already holds a layout
//! - Load `index.json` and every active prefix's reference file
//! - Verify the secret and hash algorithm against the persisted values
//! - Write metadata, reference files and cached objects back on save
//!
//! Save is not atomic and not incremental: every tracked prefix and every
//! cached object is rewritten, and nothing is ever deleted.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShardError};
use crate::index::ShardIndex;
use crate::keys::{key_mask, HashAlgorithm, Identifier};
use crate::storage::{ObjectCache, ObjectStore};

/// Contents of `index.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootMetadata {
    /// Active prefixes, in index order
    #[serde(default)]
    pub refs: Vec<String>,

    /// SHA-256 of the secret; written once
    #[serde(default)]
    pub key_mask: Option<String>,

    /// Hash algorithm name; written once
    #[serde(default)]
    pub hash_func: Option<String>,
}

/// Loads and saves a layout for one (secret, algorithm) configuration
#[derive(Debug, Clone)]
pub struct PersistenceManager {
    secret: Option<String>,
    algorithm: HashAlgorithm,
}

impl PersistenceManager {
    // =========================================================================
    // Layout Names
    // =========================================================================
    pub const INDEX_FILENAME: &'static str = "index.json";
    pub const OBJECTS_DIR: &'static str = "objects";
    pub const REFS_DIR: &'static str = "refs";

    pub fn new(secret: Option<&str>, algorithm: HashAlgorithm) -> Self {
        Self {
            secret: secret.map(str::to_string),
            algorithm,
        }
    }

    /// True iff `path` holds an index file plus the objects and refs
    /// directories
    pub fn is_layout_present(path: &Path) -> bool {
        path.join(Self::INDEX_FILENAME).is_file()
            && path.join(Self::OBJECTS_DIR).is_dir()
            && path.join(Self::REFS_DIR).is_dir()
    }

    /// Object store for the layout rooted at `path`
    pub fn object_store(&self, path: &Path) -> ObjectStore {
        ObjectStore::new(path.join(Self::OBJECTS_DIR), self.secret.as_deref())
    }

    /// Load metadata and index from `path`
    ///
    /// Steps:
    /// 1. Parse `index.json`
    /// 2. Check key mask (`Authentication`) then hash function (`ConfigMismatch`)
    /// 3. Read `refs/<prefix>.json` for every listed prefix
    pub fn load(&self, path: &Path) -> Result<(RootMetadata, ShardIndex)> {
        let metadata: RootMetadata = read_json(&path.join(Self::INDEX_FILENAME))?;

        if metadata.key_mask.as_deref() != Some(key_mask(self.secret.as_deref()).as_str()) {
            return Err(ShardError::Authentication);
        }

        if metadata.hash_func.as_deref() != Some(self.algorithm.name()) {
            return Err(ShardError::ConfigMismatch {
                expected: self.algorithm.name().to_string(),
                found: metadata.hash_func.clone().unwrap_or_default(),
            });
        }

        let refs_dir = path.join(Self::REFS_DIR);
        let mut references: HashMap<String, Vec<Identifier>> = HashMap::new();
        for prefix in &metadata.refs {
            let ids: Vec<Identifier> = read_json(&refs_dir.join(format!("{}.json", prefix)))?;
            references.insert(prefix.clone(), ids);
        }

        let index = ShardIndex::from_parts(metadata.refs.clone(), references, self.algorithm)?;

        tracing::debug!(
            path = %path.display(),
            prefixes = index.prefixes().len(),
            records = index.count(),
            "loaded layout"
        );

        Ok((metadata, index))
    }

    /// Write the layout to `path`
    ///
    /// `key_mask` and `hash_func` are filled in only when absent, so a
    /// layout keeps the values of its first save.
    pub fn save(
        &self,
        path: &Path,
        metadata: &mut RootMetadata,
        index: &ShardIndex,
        cache: &ObjectCache,
    ) -> Result<()> {
        fs::create_dir_all(path)?;

        metadata.refs = index.prefixes().to_vec();
        metadata
            .key_mask
            .get_or_insert_with(|| key_mask(self.secret.as_deref()));
        metadata
            .hash_func
            .get_or_insert_with(|| self.algorithm.name().to_string());

        fs::write(
            path.join(Self::INDEX_FILENAME),
            serde_json::to_vec(metadata)?,
        )?;

        let objects_dir = path.join(Self::OBJECTS_DIR);
        let refs_dir = path.join(Self::REFS_DIR);
        fs::create_dir_all(&objects_dir)?;
        fs::create_dir_all(&refs_dir)?;

        for prefix in index.prefixes() {
            let ids = index.references(prefix);
            fs::write(
                refs_dir.join(format!("{}.json", prefix)),
                serde_json::to_vec(ids)?,
            )?;
        }

        let objects = self.object_store(path);
        for (id, mapping) in cache.iter() {
            objects.write(id, mapping)?;
        }

        tracing::debug!(
            path = %path.display(),
            prefixes = index.prefixes().len(),
            objects = cache.len(),
            "saved layout"
        );

        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ShardError::Serialization(format!("{}: {}", path.display(), e)))
}
