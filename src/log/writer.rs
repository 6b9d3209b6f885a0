//! Log Writer
//!
//! Appends records to the log file. Existing bytes are never rewritten.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::Record;
use crate::config::SyncStrategy;
use crate::error::Result;

/// Appends records to the log file
pub struct LogWriter {
    /// Buffered append handle
    writer: BufWriter<File>,

    /// Path of the log file (for diagnostics)
    path: PathBuf,

    sync_strategy: SyncStrategy,

    /// Records appended since the last fsync
    unsynced: usize,

    records_written: u64,
    bytes_written: u64,
}

impl LogWriter {
    /// Open or create a log file in append mode
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        tracing::debug!(path = %path.display(), ?sync_strategy, "Opened log for append");

        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            sync_strategy,
            unsynced: 0,
            records_written: 0,
            bytes_written: 0,
        })
    }

    /// Append a record as one line
    ///
    /// Returns the number of bytes handed to the sink. Whether they reach
    /// the OS or the disk before returning depends on the sync strategy.
    pub fn append(&mut self, record: &Record) -> Result<usize> {
        let line = record.encode_line()?;
        self.writer.write_all(&line)?;

        self.records_written += 1;
        self.bytes_written += line.len() as u64;
        self.unsynced += 1;

        match self.sync_strategy {
            SyncStrategy::Never => {}
            SyncStrategy::FlushOnly => self.writer.flush()?,
            SyncStrategy::EveryWrite => self.sync()?,
            SyncStrategy::EveryNEntries { count } => {
                if self.unsynced >= count {
                    self.sync()?;
                } else {
                    self.writer.flush()?;
                }
            }
        }

        tracing::trace!(key = %record.key, bytes = line.len(), "Appended record");
        Ok(line.len())
    }

    /// Push buffered bytes to the OS
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this writer
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Bytes appended through this writer
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}
