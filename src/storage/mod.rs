//! Storage Module
//!
//! Persistent storage layer: sharded object files plus JSON index files.
//!
//! ## Responsibilities
//! - Persist record payloads one file per identifier
//! - Obfuscate payloads with the shared secret
//! - Cache record mappings in memory between saves
//! - Load and save the index metadata and reference lists
//!
//! ## Layout
//! ```text
//! {data_dir}/
//! ├── index.json              { "refs": [...], "key_mask": hex, "hash_func": name }
//! ├── refs/
//! │   └── <prefix>.json       [ identifier, ... ]
//! └── objects/
//!     └── <prefix>/
//!         └── <identifier>    JSON payload XOR secret
//! ```

mod cache;
mod manager;
mod object;

pub use cache::ObjectCache;
pub use manager::{PersistenceManager, RootMetadata};
pub use object::{obfuscate, ObjectStore};
