//! Tests for Log Reader
//!
//! These tests verify:
//! - Reading records from a log file
//! - Iterator functionality
//! - Lines split across read chunks
//! - Unterminated trailing line handling
//! - Parse and I/O error reporting

use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;
use vaultkv::log::{LogReader, Record};
use vaultkv::VaultError;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("test.db");
    (temp_dir, log_path)
}

fn write_raw(path: &PathBuf, contents: &str) {
    let mut file = File::create(path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.sync_all().unwrap();
}

fn collect(contents: &str, chunk_size: usize) -> Vec<Record> {
    LogReader::with_chunk_size(Cursor::new(contents.as_bytes().to_vec()), chunk_size)
        .records()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// Source that yields some bytes and then fails
struct FailingSource {
    data: Cursor<Vec<u8>>,
}

impl Read for FailingSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.read(buf)?;
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "disk went away"));
        }
        Ok(n)
    }
}

// =============================================================================
// Basic Reading Tests
// =============================================================================

#[test]
fn test_read_empty_file() {
    let (_temp, log_path) = setup_temp_log();
    File::create(&log_path).unwrap();

    let mut reader = LogReader::open(&log_path).unwrap();

    assert!(reader.next_record().unwrap().is_none());
    assert_eq!(reader.trailing_bytes(), 0);
}

#[test]
fn test_read_single_record() {
    let (_temp, log_path) = setup_temp_log();
    write_raw(&log_path, "{\"key\":\"test\",\"value\":\"example\"}\n");

    let mut reader = LogReader::open(&log_path).unwrap();
    let record = reader.next_record().unwrap().unwrap();

    assert_eq!(record.key, "test");
    assert_eq!(record.value, json!("example"));
    assert!(reader.next_record().unwrap().is_none());
}

#[test]
fn test_open_missing_file_is_io_error() {
    let (_temp, log_path) = setup_temp_log();

    let err = LogReader::open(&log_path).err().unwrap();

    assert!(matches!(err, VaultError::Io(_)));
}

// =============================================================================
// Chunking Tests
// =============================================================================

#[test]
fn test_lines_split_across_chunks() {
    let contents = "{\"key\":\"a\",\"value\":1}\n{\"key\":\"b\",\"value\":{\"n\":[1,2,3]}}\n";

    for chunk_size in [1, 2, 7, 64, 4096] {
        let records = collect(contents, chunk_size);
        assert_eq!(records.len(), 2, "chunk size {}", chunk_size);
        assert_eq!(records[1].value, json!({"n": [1, 2, 3]}));
    }
}

#[test]
fn test_multibyte_utf8_split_across_chunks() {
    let contents = "{\"key\":\"greeting\",\"value\":\"héllo wörld ✓\"}\n";

    let records = collect(contents, 3);

    assert_eq!(records[0].value, json!("héllo wörld ✓"));
}

// =============================================================================
// Trailing Line Tests
// =============================================================================

#[test]
fn test_unterminated_last_line_is_dropped() {
    let contents = "{\"key\":\"a\",\"value\":1}\n{\"key\":\"b\",\"value\":2}";

    let mut reader = LogReader::new(Cursor::new(contents.as_bytes().to_vec()));
    let mut keys = Vec::new();
    let stats = reader.replay(|record| keys.push(record.key)).unwrap();

    assert_eq!(keys, vec!["a".to_string()]);
    assert_eq!(stats.records_applied, 1);
    assert_eq!(stats.trailing_bytes_dropped, "{\"key\":\"b\",\"value\":2}".len());
}

#[test]
fn test_garbage_trailing_line_is_not_parsed() {
    let contents = "{\"key\":\"a\",\"value\":1}\n{\"key\":\"b\",\"va";

    let records = collect(contents, 5);

    assert_eq!(records.len(), 1);
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_replay_stats() {
    let contents = concat!(
        "{\"key\":\"a\",\"value\":1}\n",
        "{\"key\":\"b\",\"value\":2}\n",
        "{\"key\":\"a\",\"value\":null}\n",
        "{\"key\":\"c\",\"value\":false}\n",
    );

    let mut reader = LogReader::new(Cursor::new(contents.as_bytes().to_vec()));
    let stats = reader.replay(|_| {}).unwrap();

    assert_eq!(stats.records_applied, 4);
    assert_eq!(stats.tombstones_applied, 2);
    assert_eq!(stats.bytes_read, contents.len() as u64);
    assert_eq!(stats.trailing_bytes_dropped, 0);
}

#[test]
fn test_replay_stops_at_malformed_line() {
    let contents = "{\"key\":\"a\",\"value\":1}\nnot json\n{\"key\":\"c\",\"value\":3}\n";

    let mut reader = LogReader::new(Cursor::new(contents.as_bytes().to_vec()));
    let mut applied = Vec::new();
    let err = reader.replay(|record| applied.push(record.key)).unwrap_err();

    assert_eq!(applied, vec!["a".to_string()]);
    match err {
        VaultError::Parse { line, .. } => assert_eq!(line, 2),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_blank_line_is_parse_error() {
    let contents = "{\"key\":\"a\",\"value\":1}\n\n";

    let mut reader = LogReader::new(Cursor::new(contents.as_bytes().to_vec()));
    let err = reader.replay(|_| {}).unwrap_err();

    assert!(err.is_parse());
}

#[test]
fn test_replay_surfaces_io_error() {
    let source = FailingSource {
        data: Cursor::new(b"{\"key\":\"a\",\"value\":1}\n".to_vec()),
    };

    let mut reader = LogReader::with_chunk_size(source, 8);
    let mut applied = 0;
    let err = reader.replay(|_| applied += 1).unwrap_err();

    assert!(matches!(err, VaultError::Io(_)));
    assert_eq!(applied, 1);
}

// =============================================================================
// Iterator Tests
// =============================================================================

#[test]
fn test_iterator_ends_after_error() {
    let contents = "{\"key\":\"a\",\"value\":1}\n{oops}\n{\"key\":\"c\",\"value\":3}\n";

    let results: Vec<_> = LogReader::new(Cursor::new(contents.as_bytes().to_vec()))
        .records()
        .collect();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

#[test]
fn test_records_follow_log_order_with_tombstones() {
    let (_temp, log_path) = setup_temp_log();
    {
        let store = vaultkv::Store::open_path(&log_path).unwrap();
        store.load().unwrap();
        store.set("b", 1).unwrap();
        store.set("a", 2).unwrap();
        store.delete("b").unwrap();
        store.close().unwrap();
    }

    let records: Vec<Record> = LogReader::open(&log_path)
        .unwrap()
        .records()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(
        records,
        vec![Record::new("b", 1), Record::new("a", 2), Record::tombstone("b")]
    );
}

#[test]
fn test_lines_read_counter() {
    let contents = "{\"key\":\"a\",\"value\":1}\n{\"key\":\"b\",\"value\":2}\n";

    let mut reader = LogReader::new(Cursor::new(contents.as_bytes().to_vec()));
    while reader.next_record().unwrap().is_some() {}

    assert_eq!(reader.lines_read(), 2);
}
