//! Configuration for ShardKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::keys::HashAlgorithm;

/// Main configuration for a ShardKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory of the layout
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── index.json         (prefixes, key mask, hash function)
    ///     ├── refs/<prefix>.json (identifiers per prefix)
    ///     └── objects/<prefix>/  (obfuscated record payloads)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Key Configuration
    // -------------------------------------------------------------------------
    /// Shared secret used both as HMAC key and obfuscation pad.
    /// `None` means identifiers use a placeholder key and payloads are
    /// written as plain JSON.
    pub secret: Option<String>,

    /// Name of the keyed-hash algorithm, validated when the store opens
    pub hash_func: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./.dbs"),
            secret: None,
            hash_func: HashAlgorithm::default().name().to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The secret as a borrowed str, if any
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root of the layout)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the shared secret. An empty string counts as no secret.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.config.secret = if secret.is_empty() { None } else { Some(secret) };
        self
    }

    /// Set the hash algorithm by name (validated on open)
    pub fn hash_func(mut self, name: impl Into<String>) -> Self {
        self.config.hash_func = name.into();
        self
    }

    /// Set the hash algorithm
    pub fn hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.config.hash_func = algorithm.name().to_string();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
