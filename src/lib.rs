//! # VaultKV
//!
//! A minimal embedded key-value store with:
//! - An in-memory index authoritative for reads
//! - An append-only JSON-lines log for durability
//! - Replay on load to rebuild the index
//! - Linear field-equality search
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                               │
//! │          load · get · set · delete · search · close          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  LogWriter  │          │    Index    │
//!   │  (Append)   │          │  (RwLock)   │
//!   └──────┬──────┘          └──────▲──────┘
//!          │                        │ replay (once)
//!          ▼                        │
//!   ┌─────────────────────────────────────┐
//!   │        vault.db (JSON lines)        │──── LogReader
//!   └─────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use serde_json::json;
//! use vaultkv::Store;
//!
//! # fn main() -> vaultkv::Result<()> {
//! let store = Store::open_path("./vault.db")?;
//! store.load()?;
//!
//! store.set("cat", json!({"name": "Bilbo"}))?;
//! assert_eq!(store.get("cat"), Some(json!({"name": "Bilbo"})));
//!
//! store.delete("cat")?;
//! assert_eq!(store.get("cat"), None);
//!
//! store.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod index;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{VaultError, Result};
pub use config::{Config, SyncStrategy};
pub use log::Record;
pub use store::Store;

/// JSON value type stored under each key
pub use serde_json::Value;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of VaultKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
