//! # ShardKV
//!
//! A minimal embedded key-value store with:
//! - Pseudonymous, HMAC-derived identifiers instead of raw keys on disk
//! - Two-level index (prefix → identifiers) for sharded file layout
//! - Lazy per-record loading with an in-memory object cache
//! - Explicit `save`; mutations stay in memory until then
//!
//! Record payloads are XORed with the store secret. That hides them from a
//! casual `cat`, nothing more: it is not encryption.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                                │
//! │        get / set / remove / exists / filter / save           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────────┐
//!          │            │                     │
//!          ▼            ▼                     ▼
//!   ┌─────────────┐ ┌─────────────┐   ┌──────────────────┐
//!   │    Keys     │ │ ShardIndex  │   │   ObjectCache    │
//!   │   (HMAC)    │ │(prefix→ids) │   │  (id → fields)   │
//!   └─────────────┘ └──────┬──────┘   └────────┬─────────┘
//!                          │                   │
//!                          ▼                   ▼
//!                  ┌────────────────────────────────────┐
//!                  │ PersistenceManager / ObjectStore   │
//!                  │  index.json, refs/, objects/       │
//!                  └────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use shardkv::{Config, Record, Store};
//!
//! # fn main() -> shardkv::Result<()> {
//! let config = Config::builder()
//!     .data_dir("./data")
//!     .secret("s1")
//!     .hash_func("sha256")
//!     .build();
//!
//! let mut store = Store::open(config)?;
//! store.set("alpha", &Record::new().with("x", 1));
//! store.save()?;
//!
//! assert_eq!(store.count(), 1);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod keys;
pub mod index;
pub mod record;
pub mod storage;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, ShardError};
pub use config::Config;
pub use keys::{HashAlgorithm, Identifier};
pub use record::Record;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ShardKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
