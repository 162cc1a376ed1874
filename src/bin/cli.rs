//! ShardKV CLI
//!
//! Command-line interface for a local ShardKV store.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;
use shardkv::{Config, Record, ShardError, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// ShardKV CLI
#[derive(Parser, Debug)]
#[command(name = "shardkv")]
#[command(about = "CLI for the ShardKV embedded key-value store")]
#[command(version)]
struct Args {
    /// Store directory
    #[arg(short, long, default_value = "./.dbs")]
    path: PathBuf,

    /// Shared secret (keys identifiers and obfuscates payloads)
    #[arg(short, long, env = "SHARDKV_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Keyed-hash algorithm (sha1, sha224, sha256, sha384, sha512)
    #[arg(long = "hash", default_value = "sha1")]
    hash_func: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a record as JSON
    Get {
        /// The key to get
        key: String,
    },

    /// Store a record and save
    Set {
        /// The key to set
        key: String,

        /// The record as a JSON object, e.g. '{"x":1}'
        record: String,
    },

    /// Remove a key and save
    Remove {
        /// The key to remove
        key: String,
    },

    /// Print whether a key exists
    Exists {
        /// The key to check
        key: String,
    },

    /// Print every saved record, one JSON object per line
    List,

    /// Print the number of tracked records
    Count,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,shardkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> shardkv::Result<ExitCode> {
    let mut builder = Config::builder()
        .data_dir(&args.path)
        .hash_func(&args.hash_func);
    if let Some(secret) = &args.secret {
        builder = builder.secret(secret);
    }

    let mut store = Store::open(builder.build())?;

    match args.command {
        Commands::Get { key } => match store.get(&key)? {
            Some(record) => println!("{}", serde_json::to_string(&record)?),
            None => {
                tracing::warn!(key = %key, "key not found");
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Set { key, record } => {
            let record = parse_record(&record)?;
            store.set(&key, &record).save()?;
        }
        Commands::Remove { key } => {
            store.remove(&key).save()?;
        }
        Commands::Exists { key } => {
            println!("{}", store.exists(&key));
        }
        Commands::List => {
            store.for_each(|record| match serde_json::to_string(&record) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!("failed to encode record: {}", e),
            })?;
        }
        Commands::Count => {
            println!("{}", store.count());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_record(raw: &str) -> shardkv::Result<Record> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(fields) => Ok(Record::from_mapping(fields)),
        other => Err(ShardError::Serialization(format!(
            "record must be a JSON object, got {}",
            other
        ))),
    }
}
