//! Configuration for VaultKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, VaultError};
use crate::log::DEFAULT_CHUNK_SIZE;

/// Main configuration for a VaultKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Backing log file. Opened for append at construction, created if missing.
    pub path: PathBuf,

    /// Create the parent directory of `path` on open
    pub create_dirs: bool,

    // -------------------------------------------------------------------------
    // Log Configuration
    // -------------------------------------------------------------------------
    /// How eagerly appended records are pushed to disk
    pub sync_strategy: SyncStrategy,

    /// Chunk size used when replaying the log (in bytes)
    pub read_buffer_size: usize,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Keep records in the user-space buffer until `sync` or `close`
    Never,

    /// Flush the buffer to the OS after every append, never fsync
    FlushOnly,

    /// Flush and fsync after every write (safest, slowest)
    EveryWrite,

    /// Flush every append, fsync after N appended records
    EveryNEntries { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./vault.db"),
            create_dirs: true,
            sync_strategy: SyncStrategy::FlushOnly,
            read_buffer_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default config pointing at the given log file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Reject configurations the store cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(VaultError::Config("log path must not be empty".to_string()));
        }
        if self.read_buffer_size == 0 {
            return Err(VaultError::Config(
                "read_buffer_size must be greater than zero".to_string(),
            ));
        }
        if let SyncStrategy::EveryNEntries { count: 0 } = self.sync_strategy {
            return Err(VaultError::Config(
                "EveryNEntries count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing log file
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Whether to create the parent directory on open
    pub fn create_dirs(mut self, create: bool) -> Self {
        self.config.create_dirs = create;
        self
    }

    /// Set the log sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the replay chunk size (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
