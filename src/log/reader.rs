//! Log Reader
//!
//! Sequentially reads records from the log file.
//!
//! The file is consumed in fixed-size chunks. Bytes after the last newline
//! are held back until more input arrives; whatever is still held back at
//! end of input is an incomplete line and is dropped without being parsed.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use bytes::{Bytes, BytesMut};

use super::Record;
use crate::error::Result;

/// Default replay chunk size (64 KB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Summary of a completed replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Number of complete lines applied (tombstones included)
    pub records_applied: u64,

    /// How many of the applied records were tombstones
    pub tombstones_applied: u64,

    /// Total bytes consumed from the source
    pub bytes_read: u64,

    /// Size of the unterminated trailing line that was ignored
    pub trailing_bytes_dropped: usize,
}

/// Reads records from a newline-delimited JSON log
pub struct LogReader<R: Read = File> {
    /// Underlying byte source
    inner: R,

    /// Scratch buffer for a single read call
    chunk: Vec<u8>,

    /// Bytes read but not yet returned as a complete line
    pending: BytesMut,

    /// Prefix of `pending` already known to contain no newline
    scanned: usize,

    /// 1-based number of the last line handed out
    line_no: u64,

    bytes_read: u64,
    eof: bool,
}

impl LogReader<File> {
    /// Open a log file for reading
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_chunk_size(path, DEFAULT_CHUNK_SIZE)
    }

    /// Open a log file, reading it `chunk_size` bytes at a time
    pub fn open_with_chunk_size(path: &Path, chunk_size: usize) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::with_chunk_size(file, chunk_size))
    }
}

impl<R: Read> LogReader<R> {
    /// Wrap any byte source
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            chunk: vec![0u8; chunk_size.max(1)],
            pending: BytesMut::new(),
            scanned: 0,
            line_no: 0,
            bytes_read: 0,
            eof: false,
        }
    }

    /// Read the next complete record
    ///
    /// Returns `Ok(None)` at end of input. A line that is not a valid record
    /// fails with a parse error carrying its line number.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        match self.next_line()? {
            Some(line) => Record::decode_line(&line, self.line_no).map(Some),
            None => Ok(None),
        }
    }

    /// Apply every complete record, in file order, to `apply`
    ///
    /// Stops at the first malformed line; records before it have already
    /// been handed to `apply`.
    pub fn replay<F>(&mut self, mut apply: F) -> Result<ReplayStats>
    where
        F: FnMut(Record),
    {
        let mut stats = ReplayStats::default();

        while let Some(record) = self.next_record()? {
            stats.records_applied += 1;
            if record.is_tombstone() {
                stats.tombstones_applied += 1;
            }
            apply(record);
        }

        stats.bytes_read = self.bytes_read;
        stats.trailing_bytes_dropped = self.trailing_bytes();

        if stats.trailing_bytes_dropped > 0 {
            tracing::warn!(
                bytes = stats.trailing_bytes_dropped,
                line = self.line_no + 1,
                "Ignoring unterminated trailing line in log"
            );
        }

        Ok(stats)
    }

    /// Iterate over all complete records
    pub fn records(self) -> Records<R> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Bytes held back as an incomplete line (meaningful once input is exhausted)
    pub fn trailing_bytes(&self) -> usize {
        self.pending.len()
    }

    /// Number of complete lines read so far
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }

    /// Split off the next newline-terminated line, reading more input as needed
    fn next_line(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Some(pos) = self.pending[self.scanned..].iter().position(|&b| b == b'\n') {
                let end = self.scanned + pos;
                let mut line = self.pending.split_to(end + 1);
                line.truncate(end);
                self.scanned = 0;
                self.line_no += 1;
                return Ok(Some(line.freeze()));
            }
            self.scanned = self.pending.len();

            if self.eof {
                return Ok(None);
            }

            let n = match self.inner.read(&mut self.chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if n == 0 {
                self.eof = true;
                continue;
            }

            self.bytes_read += n as u64;
            self.pending.extend_from_slice(&self.chunk[..n]);
        }
    }
}

/// Iterator over log records
///
/// Yields the first error and then ends.
pub struct Records<R: Read = File> {
    reader: LogReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
