//! Tests for PersistenceManager
//!
//! These tests verify:
//! - Layout detection
//! - Save writes index, reference files and cached objects
//! - Load verifies key mask and hash function
//! - Write-once metadata and append-only disk growth

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use shardkv::index::ShardIndex;
use shardkv::keys::{derive, key_mask};
use shardkv::record::Mapping;
use shardkv::storage::{ObjectCache, PersistenceManager, RootMetadata};
use shardkv::{HashAlgorithm, Identifier, ShardError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn manager(secret: Option<&str>) -> PersistenceManager {
    PersistenceManager::new(secret, HashAlgorithm::Sha256)
}

fn mapping(value: Value) -> Mapping {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn read_index(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path.join("index.json")).unwrap()).unwrap()
}

/// Save a layout holding the given keys, returning their identifiers
fn save_layout(path: &Path, secret: Option<&str>, keys: &[&str]) -> Vec<Identifier> {
    let mut index = ShardIndex::new();
    let mut cache = ObjectCache::new();
    let mut ids = Vec::new();

    for (i, key) in keys.iter().enumerate() {
        let id = derive(key, secret, HashAlgorithm::Sha256);
        index.add(id.clone());
        cache.insert(id.clone(), mapping(json!({ "n": i })));
        ids.push(id);
    }

    let mut metadata = RootMetadata::default();
    manager(secret)
        .save(path, &mut metadata, &index, &cache)
        .unwrap();
    ids
}

// =============================================================================
// Layout Detection Tests
// =============================================================================

#[test]
fn test_layout_absent_for_empty_directory() {
    let temp = TempDir::new().unwrap();
    assert!(!PersistenceManager::is_layout_present(temp.path()));
    assert!(!PersistenceManager::is_layout_present(&temp.path().join("missing")));
}

#[test]
fn test_layout_requires_all_three_artifacts() {
    let temp = TempDir::new().unwrap();
    let path = temp.path();

    fs::write(path.join("index.json"), "{}").unwrap();
    assert!(!PersistenceManager::is_layout_present(path));

    fs::create_dir(path.join("objects")).unwrap();
    assert!(!PersistenceManager::is_layout_present(path));

    fs::create_dir(path.join("refs")).unwrap();
    assert!(PersistenceManager::is_layout_present(path));
}

// =============================================================================
// Save Tests
// =============================================================================

#[test]
fn test_save_empty_layout() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db");

    save_layout(&path, Some("s1"), &[]);

    assert!(PersistenceManager::is_layout_present(&path));
    assert_eq!(
        read_index(&path),
        json!({
            "refs": [],
            "key_mask": key_mask(Some("s1")),
            "hash_func": "sha256"
        })
    );
}

#[test]
fn test_save_writes_reference_files_and_objects() {
    let temp = TempDir::new().unwrap();
    let path = temp.path();

    let ids = save_layout(path, Some("s1"), &["alpha", "beta", "gamma"]);

    let index = read_index(path);
    let refs = index["refs"].as_array().unwrap();

    for id in &ids {
        assert!(refs.contains(&json!(id.prefix())));

        let ref_file = path.join("refs").join(format!("{}.json", id.prefix()));
        let listed: Vec<Identifier> =
            serde_json::from_slice(&fs::read(ref_file).unwrap()).unwrap();
        assert!(listed.contains(id));

        assert!(path.join("objects").join(id.prefix()).join(id.as_str()).is_file());
    }
}

#[test]
fn test_save_keeps_existing_metadata() {
    let temp = TempDir::new().unwrap();
    let path = temp.path();

    let mut metadata = RootMetadata {
        refs: vec![],
        key_mask: Some("original-mask".to_string()),
        hash_func: Some("sha1".to_string()),
    };

    manager(Some("s1"))
        .save(path, &mut metadata, &ShardIndex::new(), &ObjectCache::new())
        .unwrap();

    assert_eq!(metadata.key_mask.as_deref(), Some("original-mask"));
    assert_eq!(read_index(path)["hash_func"], json!("sha1"));
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_round_trip() {
    let temp = TempDir::new().unwrap();
    let ids = save_layout(temp.path(), Some("s1"), &["alpha", "beta", "gamma"]);

    let (metadata, index) = manager(Some("s1")).load(temp.path()).unwrap();

    assert_eq!(metadata.key_mask, Some(key_mask(Some("s1"))));
    assert_eq!(metadata.hash_func.as_deref(), Some("sha256"));
    assert_eq!(index.count(), 3);
    for id in &ids {
        assert!(index.contains(id));
    }
}

#[test]
fn test_load_preserves_iteration_order() {
    let temp = TempDir::new().unwrap();
    let keys: Vec<String> = (0..40).map(|i| format!("key-{}", i)).collect();
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();

    save_layout(temp.path(), None, &key_refs);

    let mut expected = ShardIndex::new();
    for key in &key_refs {
        expected.add(derive(key, None, HashAlgorithm::Sha256));
    }

    let (_, index) = manager(None).load(temp.path()).unwrap();

    let loaded: Vec<&Identifier> = index.identifiers().collect();
    let original: Vec<&Identifier> = expected.identifiers().collect();
    assert_eq!(loaded, original);
}

#[test]
fn test_load_wrong_secret() {
    let temp = TempDir::new().unwrap();
    save_layout(temp.path(), Some("s1"), &["alpha"]);

    let result = manager(Some("s2")).load(temp.path());
    assert!(matches!(result, Err(ShardError::Authentication)));

    let result = manager(None).load(temp.path());
    assert!(matches!(result, Err(ShardError::Authentication)));
}

#[test]
fn test_load_wrong_algorithm() {
    let temp = TempDir::new().unwrap();
    save_layout(temp.path(), Some("s1"), &["alpha"]);

    let result = PersistenceManager::new(Some("s1"), HashAlgorithm::Sha1).load(temp.path());

    match result {
        Err(ShardError::ConfigMismatch { expected, found }) => {
            assert_eq!(expected, "sha1");
            assert_eq!(found, "sha256");
        }
        other => panic!("expected ConfigMismatch, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_load_missing_key_mask() {
    let temp = TempDir::new().unwrap();
    save_layout(temp.path(), None, &[]);
    fs::write(temp.path().join("index.json"), r#"{"refs":[],"hash_func":"sha256"}"#).unwrap();

    let result = manager(None).load(temp.path());
    assert!(matches!(result, Err(ShardError::Authentication)));
}

#[test]
fn test_load_corrupt_index_file() {
    let temp = TempDir::new().unwrap();
    save_layout(temp.path(), None, &[]);
    fs::write(temp.path().join("index.json"), "not json").unwrap();

    let result = manager(None).load(temp.path());
    assert!(matches!(result, Err(ShardError::Serialization(_))));
}

#[test]
fn test_load_missing_reference_file() {
    let temp = TempDir::new().unwrap();
    let ids = save_layout(temp.path(), None, &["alpha"]);
    fs::remove_file(temp.path().join("refs").join(format!("{}.json", ids[0].prefix()))).unwrap();

    let result = manager(None).load(temp.path());
    assert!(matches!(result, Err(ShardError::Io(_))));
}

#[test]
fn test_load_misfiled_reference() {
    let temp = TempDir::new().unwrap();
    let ids = save_layout(temp.path(), None, &["alpha"]);
    let prefix = ids[0].prefix();
    let other = if prefix == "00" { "ff" } else { "00" };
    let bogus = format!("{}{}", other, &ids[0].as_str()[2..]);

    fs::write(
        temp.path().join("refs").join(format!("{}.json", prefix)),
        serde_json::to_vec(&[bogus]).unwrap(),
    )
    .unwrap();

    let result = manager(None).load(temp.path());
    assert!(matches!(result, Err(ShardError::Corrupted(_))));
}

#[test]
fn test_load_skips_empty_reference_list() {
    let temp = TempDir::new().unwrap();
    let ids = save_layout(temp.path(), None, &["alpha"]);
    fs::write(
        temp.path().join("refs").join(format!("{}.json", ids[0].prefix())),
        "[]",
    )
    .unwrap();

    let (_, index) = manager(None).load(temp.path()).unwrap();

    assert!(index.is_empty());
}

#[test]
fn test_load_rejects_non_hex_identifier() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("db");
    save_layout(&path, None, &[]);

    // Layout pointing one identifier at a file outside objects/
    fs::write(temp.path().join("outside"), r#"{"leaked":true}"#).unwrap();
    fs::create_dir_all(path.join("objects").join("ab").join("ab")).unwrap();
    fs::write(
        path.join("index.json"),
        serde_json::to_vec(&json!({
            "refs": ["ab"],
            "key_mask": key_mask(None),
            "hash_func": "sha256"
        }))
        .unwrap(),
    )
    .unwrap();
    fs::write(path.join("refs").join("ab.json"), r#"["ab/../../../outside"]"#).unwrap();

    let result = manager(None).load(&path);

    assert!(matches!(result, Err(ShardError::Corrupted(_))));
}

#[test]
fn test_load_rejects_invalid_prefix() {
    let temp = TempDir::new().unwrap();
    save_layout(temp.path(), None, &[]);
    fs::write(
        temp.path().join("index.json"),
        serde_json::to_vec(&json!({
            "refs": [".."],
            "key_mask": key_mask(None),
            "hash_func": "sha256"
        }))
        .unwrap(),
    )
    .unwrap();

    let result = manager(None).load(temp.path());

    assert!(matches!(result, Err(ShardError::Corrupted(_))));
}

// =============================================================================
// Disk Growth Tests
// =============================================================================

#[test]
fn test_save_never_deletes_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path();
    let ids = save_layout(path, None, &["alpha"]);
    let id = &ids[0];

    let (mut metadata, mut index) = manager(None).load(path).unwrap();
    index.remove(id);
    manager(None)
        .save(path, &mut metadata, &index, &ObjectCache::new())
        .unwrap();

    assert_eq!(read_index(path)["refs"], json!([]));
    assert!(path.join("refs").join(format!("{}.json", id.prefix())).is_file());
    assert!(path.join("objects").join(id.prefix()).join(id.as_str()).is_file());

    let (_, index) = manager(None).load(path).unwrap();
    assert_eq!(index.count(), 0);
}
