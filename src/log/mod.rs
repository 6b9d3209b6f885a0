//! Append-Only Log Module
//!
//! Provides durability by appending every mutation to a single file.
//!
//! ## Responsibilities
//! - Append one record per mutation, never rewriting existing bytes
//! - Replay the file in order to rebuild the index
//! - Tolerate an unterminated final line by ignoring it
//!
//! ## File Format
//! ```text
//! {"key":"test","value":"example"}\n
//! {"key":"cat","value":{"name":"Bilbo"}}\n
//! {"key":"test","value":null}\n          <- tombstone
//! {"key":"dog","val                      <- incomplete, ignored on read
//! ```

mod record;
mod reader;
mod writer;

pub use record::{is_falsy, Record};
pub use reader::{LogReader, Records, ReplayStats, DEFAULT_CHUNK_SIZE};
pub use writer::LogWriter;
