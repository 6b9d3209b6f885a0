//! Store Module
//!
//! The embedded store that ties the log and the index together.
//!
//! ## Responsibilities
//! - Open the append sink at construction
//! - Replay the log exactly once to build the index
//! - Serve reads from the index
//! - Apply each mutation to the index and append it to the log under one lock

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::index::Index;
use crate::log::{LogReader, LogWriter, Record, ReplayStats};

/// The key-value store
///
/// ## Concurrency Model
///
/// - **Reads** (get/search): take the index read lock only
/// - **Writes** (set/delete): hold the `writer` lock across both the index
///   update and the append, so the order of records in the log matches the
///   order the index saw them. The index change is visible before the append
///   is issued.
/// - **Load**: guarded by `load_lock`; overlapping callers wait for the
///   in-flight replay and then see its result. The replay also holds the
///   `writer` lock, so no write lands between the reader reaching end of
///   file and the store being marked loaded.
///
/// Lock order is always `writer` then the index lock.
///
/// A failed append is not rolled back: the index keeps the new value while
/// the log does not. Callers that need them to agree must reopen and reload.
///
/// An unterminated trailing line is skipped on load, but it stays in the
/// file. The next append is written straight after it, merging into one
/// malformed line, and every later load of that file fails with a parse
/// error. Repair the file by hand before writing to it.
pub struct Store {
    /// Store configuration
    config: Config,

    /// Live key → value map
    index: Index,

    /// Append sink for the log file
    writer: Mutex<LogWriter>,

    /// Set once the first replay has completed successfully
    loaded: AtomicBool,

    /// Serializes replays
    load_lock: Mutex<()>,

    /// Stats from the successful replay
    replay_stats: Mutex<Option<ReplayStats>>,
}

impl Store {
    /// Open a store with the given config
    ///
    /// Creates the log file if it does not exist. The log is not read until
    /// `load` is called.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        if config.create_dirs {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let writer = LogWriter::open(&config.path, config.sync_strategy)?;

        tracing::debug!(path = %config.path.display(), "Store opened");

        Ok(Self {
            config,
            index: Index::new(),
            writer: Mutex::new(writer),
            loaded: AtomicBool::new(false),
            load_lock: Mutex::new(()),
            replay_stats: Mutex::new(None),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified log file
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(Config::with_path(path.as_ref()))
    }

    /// Replay the log into the index and return every live key/value
    ///
    /// Only the first successful call reads the file; later calls return the
    /// current index without touching the disk.
    ///
    /// A malformed line fails the load. Records before it stay applied and
    /// the store stays unloaded, so a later call replays again.
    pub fn load(&self) -> Result<BTreeMap<String, Value>> {
        if self.loaded.load(Ordering::Acquire) {
            return Ok(self.index.snapshot());
        }

        let _load_guard = self.load_lock.lock();

        // Another caller may have finished while we waited
        if self.loaded.load(Ordering::Acquire) {
            return Ok(self.index.snapshot());
        }

        // Held for the whole replay so no set can slip in behind the reader
        let mut writer = self.writer.lock();

        // Records appended before load must be visible to the reader
        writer.flush()?;

        let mut reader =
            LogReader::open_with_chunk_size(&self.config.path, self.config.read_buffer_size)?;
        let stats = reader.replay(|record| {
            self.index.apply_owned(record);
        })?;

        *self.replay_stats.lock() = Some(stats);
        self.loaded.store(true, Ordering::Release);
        drop(writer);

        if stats.trailing_bytes_dropped > 0 {
            tracing::warn!(
                path = %self.config.path.display(),
                bytes = stats.trailing_bytes_dropped,
                "Log ends in an incomplete line; new records will be appended onto it \
                 and the file will no longer load"
            );
        }

        tracing::info!(
            path = %self.config.path.display(),
            records = stats.records_applied,
            tombstones = stats.tombstones_applied,
            live_keys = self.index.len(),
            "Log replayed"
        );

        Ok(self.index.snapshot())
    }

    /// Get the current value for a key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.index.get(key)
    }

    /// Set a key
    ///
    /// Steps:
    /// 1. Acquire the writer lock
    /// 2. Update the index (falsy value removes the key)
    /// 3. Append the record to the log
    ///
    /// Returns the record once the sink has accepted it.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<Record> {
        let record = Record::new(key, value);

        {
            let mut writer = self.writer.lock();
            self.index.apply(&record);
            writer.append(&record)?;
        }

        tracing::debug!(key = %record.key, tombstone = record.is_tombstone(), "Record set");
        Ok(record)
    }

    /// Delete a key by appending a tombstone
    pub fn delete(&self, key: impl Into<String>) -> Result<Record> {
        self.set(key, Value::Null)
    }

    /// First live value whose `field` is truthy and equal to `target`
    ///
    /// Scans every value in key order; slow on large collections.
    pub fn search(&self, field: &str, target: &Value) -> Option<Value> {
        self.index.search(field, target)
    }

    /// Flush buffered records and fsync the log file
    pub fn sync(&self) -> Result<()> {
        self.writer.lock().sync()
    }

    /// Close the store gracefully
    ///
    /// Flushes pending records and syncs to disk
    pub fn close(self) -> Result<()> {
        let mut writer = self.writer.lock();
        writer.sync()?;

        tracing::info!(
            path = %self.config.path.display(),
            records_written = writer.records_written(),
            "Store closed"
        );
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// True once the log has been replayed
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Path of the backing log file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Live keys in iteration order
    pub fn keys(&self) -> Vec<String> {
        self.index.keys()
    }

    /// Stats from the successful replay, if any
    pub fn replay_stats(&self) -> Option<ReplayStats> {
        *self.replay_stats.lock()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
