//! VaultKV CLI
//!
//! Command-line interface for inspecting and editing a VaultKV log file.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};
use vaultkv::log::LogReader;
use vaultkv::{Config, Record, Result, Store, SyncStrategy, Value};

/// VaultKV CLI
#[derive(Parser, Debug)]
#[command(name = "vaultkv")]
#[command(about = "CLI for the VaultKV embedded key-value store")]
#[command(version)]
struct Args {
    /// Log file to open (created if missing)
    #[arg(short, long, default_value = "./vault.db")]
    db: String,

    /// When appended records are pushed to disk
    #[arg(short, long, value_enum, default_value = "flush")]
    sync: SyncArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set (JSON, or a plain string)
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Find the first value whose field equals the given value
    Search {
        /// Field name to compare
        field: String,

        /// Value to look for (JSON, or a plain string)
        value: String,
    },

    /// Print every live record as a JSON line
    Dump {
        /// Print every record in the log, in file order, tombstones included
        #[arg(long)]
        raw: bool,
    },

    /// Print replay statistics
    Stats,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SyncArg {
    /// Leave records buffered until exit
    Never,
    /// Flush to the OS after every write
    Flush,
    /// Flush and fsync after every write
    Always,
}

impl From<SyncArg> for SyncStrategy {
    fn from(arg: SyncArg) -> Self {
        match arg {
            SyncArg::Never => SyncStrategy::Never,
            SyncArg::Flush => SyncStrategy::FlushOnly,
            SyncArg::Always => SyncStrategy::EveryWrite,
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,vaultkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder()
        .path(&args.db)
        .sync_strategy(args.sync.into())
        .build();

    let store = Store::open(config)?;
    store.load()?;

    match args.command {
        Commands::Get { key } => print_value(store.get(&key)),
        Commands::Set { key, value } => {
            let record = store.set(key, parse_value(&value))?;
            println!("{}", to_json(&record));
        }
        Commands::Del { key } => {
            let record = store.delete(key)?;
            println!("{}", to_json(&record));
        }
        Commands::Search { field, value } => {
            print_value(store.search(&field, &parse_value(&value)))
        }
        Commands::Dump { raw: false } => {
            for (key, value) in store.load()? {
                println!("{}", to_json(&Record::new(key, value)));
            }
        }
        Commands::Dump { raw: true } => {
            for record in LogReader::open(store.path())?.records() {
                println!("{}", to_json(&record?));
            }
        }
        Commands::Stats => {
            let stats = store.replay_stats().unwrap_or_default();
            println!("path:              {}", store.path().display());
            println!("live keys:         {}", store.len());
            println!("records replayed:  {}", stats.records_applied);
            println!("tombstones:        {}", stats.tombstones_applied);
            println!("bytes read:        {}", stats.bytes_read);
            println!("trailing dropped:  {}", stats.trailing_bytes_dropped);
        }
    }

    store.close()
}

/// Parse a CLI argument as JSON, falling back to a JSON string
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_value(value: Option<Value>) {
    match value {
        Some(value) => println!("{}", to_json(&value)),
        None => println!("(nil)"),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unprintable: {}>", e))
}
