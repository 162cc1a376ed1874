//! Store Module
//!
//! The façade that ties key derivation, the shard index, the object cache
//! and persistence together.
//!
//! ## Responsibilities
//! - Open an existing layout or initialize a fresh one
//! - Keep `set`/`remove` in memory until `save`
//! - Serve `get` from the cache, filling it from disk on a miss
//! - Iterate saved records straight from disk

use std::path::Path;

use crate::config::Config;
use crate::error::{Result, ShardError};
use crate::index::ShardIndex;
use crate::keys::{self, HashAlgorithm, Identifier};
use crate::record::Record;
use crate::storage::{ObjectCache, ObjectStore, PersistenceManager, RootMetadata};

/// An open key-value store
///
/// ## Visibility of writes
///
/// - `get`/`exists`/`count` see pending in-memory edits immediately
/// - `for_each`/`filter`/`list` read object files, so they only see what
///   the last `save` wrote. An identifier that was `set` but never saved
///   makes them fail with `ObjectNotFound`.
///
/// ## Concurrency
///
/// None. Mutations take `&mut self` and no file locks are taken, so two
/// processes saving the same path will clobber each other.
pub struct Store {
    /// Store configuration (secret normalized)
    config: Config,

    /// Validated hash algorithm
    algorithm: HashAlgorithm,

    /// Layout loader/writer
    persistence: PersistenceManager,

    /// Payload files under `{data_dir}/objects`
    objects: ObjectStore,

    /// Persisted root metadata
    metadata: RootMetadata,

    /// Which identifiers exist
    index: ShardIndex,

    /// Record mappings read or written during this session
    cache: ObjectCache,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Validate the hash algorithm
    /// 2. Load the layout if present (verifying secret and algorithm)
    /// 3. Otherwise write a fresh empty layout
    pub fn open(mut config: Config) -> Result<Self> {
        let algorithm: HashAlgorithm = config.hash_func.parse()?;
        config.secret = config.secret.filter(|s| !s.is_empty());

        let persistence = PersistenceManager::new(config.secret(), algorithm);
        let objects = persistence.object_store(&config.data_dir);

        let mut store = Self {
            config,
            algorithm,
            persistence,
            objects,
            metadata: RootMetadata::default(),
            index: ShardIndex::new(),
            cache: ObjectCache::new(),
        };

        if PersistenceManager::is_layout_present(&store.config.data_dir) {
            let (metadata, index) = store.persistence.load(&store.config.data_dir)?;
            store.metadata = metadata;
            store.index = index;

            tracing::info!(
                path = %store.config.data_dir.display(),
                records = store.index.count(),
                "opened existing store"
            );
        } else {
            store.save()?;

            tracing::info!(
                path = %store.config.data_dir.display(),
                hash_func = %algorithm,
                "initialized new store"
            );
        }

        Ok(store)
    }

    /// Open `path` with the default config
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Whether `path` already holds a store layout
    pub fn is_layout_present(path: &Path) -> bool {
        PersistenceManager::is_layout_present(path)
    }

    /// Get a record by key
    ///
    /// Returns:
    /// - `Ok(Some(record))`: key tracked and its payload readable
    /// - `Ok(None)`: key not tracked, or tracked but never saved to disk
    pub fn get(&mut self, key: &str) -> Result<Option<Record>> {
        let id = self.identify(key);

        if !self.index.contains(&id) {
            return Ok(None);
        }

        if let Some(mapping) = self.cache.get(&id) {
            return Ok(Some(Record::from_mapping(mapping.clone())));
        }

        let mapping = match self.objects.read(&id) {
            Ok(mapping) => mapping,
            Err(ShardError::ObjectNotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        tracing::debug!(id = %id, "cached object from disk");
        self.cache.insert(id, mapping.clone());

        Ok(Some(Record::from_mapping(mapping)))
    }

    /// Put a record under `key` (in memory until `save`)
    pub fn set(&mut self, key: &str, record: &Record) -> &mut Self {
        let id = self.identify(key);

        self.index.add(id.clone());
        self.cache.insert(id, record.to_mapping().clone());

        self
    }

    /// Remove a key (in memory until `save`)
    ///
    /// The object file stays on disk; only the index forgets it.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        let id = self.identify(key);

        self.cache.remove(&id);
        self.index.remove(&id);

        self
    }

    /// Check whether `key` is tracked
    pub fn exists(&self, key: &str) -> bool {
        self.index.contains(&self.identify(key))
    }

    /// Visit every tracked record, reading each from disk
    pub fn for_each<F>(&self, mut visitor: F) -> Result<&Self>
    where
        F: FnMut(Record),
    {
        for id in self.index.identifiers() {
            visitor(self.read_saved(id)?);
        }

        Ok(self)
    }

    /// Collect tracked records matching `predicate`, in index order,
    /// reading each from disk
    pub fn filter<P>(&self, mut predicate: P) -> Result<Vec<Record>>
    where
        P: FnMut(&Record) -> bool,
    {
        let mut records = Vec::new();

        for id in self.index.identifiers() {
            let record = self.read_saved(id)?;
            if predicate(&record) {
                records.push(record);
            }
        }

        Ok(records)
    }

    /// All tracked records, reading each from disk
    pub fn list(&self) -> Result<Vec<Record>> {
        self.filter(|_| true)
    }

    /// Number of tracked records
    pub fn count(&self) -> usize {
        self.index.count()
    }

    /// Write metadata, reference files and cached objects to the data
    /// directory
    pub fn save(&mut self) -> Result<&mut Self> {
        let path = self.config.data_dir.clone();
        self.save_to(&path)?;
        Ok(self)
    }

    /// Write the layout to another directory
    ///
    /// Only cached objects are written, so records never read this session
    /// are missing from the target unless it already held them.
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        self.persistence
            .save(path, &mut self.metadata, &self.index, &self.cache)?;

        tracing::info!(
            path = %path.display(),
            records = self.index.count(),
            "saved store"
        );

        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the validated hash algorithm
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Get the shard index
    pub fn index(&self) -> &ShardIndex {
        &self.index
    }

    /// Identifier that `key` maps to under this store's configuration
    pub fn identify(&self, key: &str) -> Identifier {
        keys::derive(key, self.config.secret(), self.algorithm)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn read_saved(&self, id: &Identifier) -> Result<Record> {
        self.objects.read(id).map(Record::from_mapping)
    }
}
