//! Identifier derivation
//!
//! Pure functions: the same (key, secret, algorithm) triple always yields
//! the same identifier.

use std::fmt;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use super::HashAlgorithm;

/// HMAC key (and key-mask input) used when no secret is configured.
/// Hashing an empty key would make every secret-less store share a
/// degenerate mask.
pub const PLACEHOLDER_SECRET: &str = "`";

/// Number of hex characters forming the shard prefix
pub const PREFIX_LEN: usize = 2;

/// Hex-encoded keyed hash standing in for a logical key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap an existing hex string (e.g. read back from a reference file)
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase hex, longer than a prefix. Anything else could escape the
    /// objects directory when used as a path component.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() > PREFIX_LEN && is_lower_hex(&self.0)
    }

    /// Well-formed and exactly as long as a digest of `algorithm`
    pub fn is_valid_for(&self, algorithm: HashAlgorithm) -> bool {
        self.0.len() == algorithm.hex_len() && is_lower_hex(&self.0)
    }

    /// Shard prefix: the leading two hex characters.
    /// Shorter strings are their own prefix.
    pub fn prefix(&self) -> &str {
        self.0.get(..PREFIX_LEN).unwrap_or(&self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the identifier for `logical_key`
pub fn derive(logical_key: &str, secret: Option<&str>, algorithm: HashAlgorithm) -> Identifier {
    let key = secret.unwrap_or(PLACEHOLDER_SECRET).as_bytes();
    let message = logical_key.as_bytes();

    let hex = match algorithm {
        HashAlgorithm::Sha1 => keyed_hex::<Hmac<Sha1>>(key, message),
        HashAlgorithm::Sha224 => keyed_hex::<Hmac<Sha224>>(key, message),
        HashAlgorithm::Sha256 => keyed_hex::<Hmac<Sha256>>(key, message),
        HashAlgorithm::Sha384 => keyed_hex::<Hmac<Sha384>>(key, message),
        HashAlgorithm::Sha512 => keyed_hex::<Hmac<Sha512>>(key, message),
    };

    Identifier(hex)
}

/// SHA-256 of the secret (or placeholder), persisted as `key_mask`
pub fn key_mask(secret: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.unwrap_or(PLACEHOLDER_SECRET).as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `prefix` is two lowercase hex characters
pub fn is_valid_prefix(prefix: &str) -> bool {
    prefix.len() == PREFIX_LEN && is_lower_hex(prefix)
}

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn keyed_hex<M: Mac + hmac::digest::KeyInit>(key: &[u8], message: &[u8]) -> String {
    let mut mac = <M as hmac::digest::KeyInit>::new_from_slice(key)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}
