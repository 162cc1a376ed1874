//! Benchmarks for ShardKV store operations

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use shardkv::keys::derive;
use shardkv::{Config, HashAlgorithm, Record, Store};
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> Store {
    let config = Config::builder()
        .data_dir(dir.path())
        .secret("bench-secret")
        .hash_algorithm(HashAlgorithm::Sha256)
        .build();
    Store::open(config).unwrap()
}

fn sample_record(i: usize) -> Record {
    Record::new()
        .with("id", i as u64)
        .with("name", format!("user-{}", i))
        .with("tags", serde_json::json!(["a", "b", "c"]))
}

fn store_benchmarks(c: &mut Criterion) {
    c.bench_function("derive_sha1", |b| {
        b.iter(|| derive("some-logical-key", Some("secret"), HashAlgorithm::Sha1))
    });

    c.bench_function("set_1000_in_memory", |b| {
        b.iter_batched(
            || {
                let dir = TempDir::new().unwrap();
                let store = open_store(&dir);
                (dir, store)
            },
            |(_dir, mut store)| {
                for i in 0..1000 {
                    store.set(&format!("key-{}", i), &sample_record(i));
                }
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("save_1000", |b| {
        b.iter_batched(
            || {
                let dir = TempDir::new().unwrap();
                let mut store = open_store(&dir);
                for i in 0..1000 {
                    store.set(&format!("key-{}", i), &sample_record(i));
                }
                (dir, store)
            },
            |(_dir, mut store)| {
                store.save().unwrap();
            },
            BatchSize::SmallInput,
        )
    });

    let dir = TempDir::new().unwrap();
    {
        let mut store = open_store(&dir);
        for i in 0..1000 {
            store.set(&format!("key-{}", i), &sample_record(i));
        }
        store.save().unwrap();
    }
    let store = open_store(&dir);

    c.bench_function("list_1000_from_disk", |b| {
        b.iter(|| store.list().unwrap())
    });
}

criterion_group!(benches, store_benchmarks);
criterion_main!(benches);
