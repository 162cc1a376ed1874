//! Keys Module
//!
//! Turns logical key strings into pseudonymous identifiers.
//!
//! ## Responsibilities
//! - Keyed hashing (HMAC) of logical keys
//! - Validation of the configured hash algorithm
//! - Shard prefix selection
//! - Key mask computation for secret verification on reopen
//!
//! ## Derivation
//! ```text
//!   logical key ──HMAC(alg, secret | "`")──▶ hex identifier
//!                                              │
//!                                              └─ first 2 chars = prefix
//! ```

mod algorithm;
mod deriver;

pub use algorithm::HashAlgorithm;
pub use deriver::{
    derive, is_valid_prefix, key_mask, Identifier, PLACEHOLDER_SECRET, PREFIX_LEN,
};
