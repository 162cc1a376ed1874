//! Object Store
//!
//! One file per record under `objects/<prefix>/<identifier>`.
//!
//! Payloads are JSON XORed against the secret. This is obfuscation only:
//! anyone who knows the format can recover the secret from a single file,
//! and nothing detects tampering.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{Result, ShardError};
use crate::keys::Identifier;
use crate::record::Mapping;

/// Reads and writes individual record payloads
#[derive(Debug, Clone)]
pub struct ObjectStore {
    /// `{data_dir}/objects`
    objects_dir: PathBuf,

    /// Obfuscation pad (None = identity transform)
    secret: Option<Vec<u8>>,
}

impl ObjectStore {
    /// Create an object store rooted at `objects_dir`
    pub fn new(objects_dir: impl Into<PathBuf>, secret: Option<&str>) -> Self {
        Self {
            objects_dir: objects_dir.into(),
            secret: secret.map(|s| s.as_bytes().to_vec()),
        }
    }

    /// Serialize, obfuscate and write a payload, creating the prefix
    /// directory if needed
    pub fn write(&self, id: &Identifier, payload: &Mapping) -> Result<()> {
        let path = self.checked_path(id)?;
        if let Some(shard_dir) = path.parent() {
            fs::create_dir_all(shard_dir)?;
        }

        let mut bytes = serde_json::to_vec(payload)?;
        obfuscate(&mut bytes, self.secret.as_deref());

        fs::write(&path, bytes)?;

        tracing::debug!(id = %id, path = %path.display(), "wrote object");
        Ok(())
    }

    /// Read, de-obfuscate and deserialize a payload
    ///
    /// Returns:
    /// - `Err(ObjectNotFound)`: no file for this identifier
    /// - `Err(Serialization)`: file exists but does not decode
    /// - `Err(Corrupted)`: identifier is not plain hex
    pub fn read(&self, id: &Identifier) -> Result<Mapping> {
        let path = self.checked_path(id)?;

        let mut bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ShardError::ObjectNotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        obfuscate(&mut bytes, self.secret.as_deref());

        serde_json::from_slice(&bytes).map_err(|e| {
            ShardError::Serialization(format!("object {}: {}", id, e))
        })
    }

    /// Whether a payload file exists for `id`
    pub fn exists(&self, id: &Identifier) -> bool {
        self.path_for(id).is_file()
    }

    /// File path for `id`
    pub fn path_for(&self, id: &Identifier) -> PathBuf {
        self.objects_dir.join(id.prefix()).join(id.as_str())
    }

    fn checked_path(&self, id: &Identifier) -> Result<PathBuf> {
        if !id.is_well_formed() {
            return Err(ShardError::Corrupted(format!(
                "refusing object path for identifier {:?}",
                id.as_str()
            )));
        }
        Ok(self.path_for(id))
    }
}

/// XOR `data` in place against `secret` repeated to its length.
///
/// Symmetric: applying it twice restores the input. No secret (or an empty
/// one) leaves the data untouched.
pub fn obfuscate(data: &mut [u8], secret: Option<&[u8]>) {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return;
    };

    for (byte, pad) in data.iter_mut().zip(secret.iter().cycle()) {
        *byte ^= pad;
    }
}
