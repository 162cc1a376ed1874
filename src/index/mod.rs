//! Index Module
//!
//! Two-level in-memory index of stored identifiers.
//!
//! ## Responsibilities
//! - Track which identifiers exist, grouped by shard prefix
//! - Keep the list of active prefixes in discovery order
//! - Deterministic iteration for `for_each`/`filter`/`list`
//!
//! ## Invariants
//! - A prefix is active iff its reference list is non-empty
//! - Every identifier in a reference list starts with that list's prefix

mod shard;

pub use shard::{Identifiers, ShardIndex};
