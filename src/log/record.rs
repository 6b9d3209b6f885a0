//! Log record definitions
//!
//! Defines the structure of individual log lines.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, VaultError};

/// A single entry in the log: one key and its new value
///
/// Serialized as one compact JSON object per line:
/// `{"key":"cat","value":{"name":"Bilbo"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Key the record applies to
    pub key: String,

    /// New value for the key; a falsy value is a tombstone
    #[serde(default)]
    pub value: Value,
}

impl Record {
    /// Create a record assigning `value` to `key`
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a tombstone for `key`
    pub fn tombstone(key: impl Into<String>) -> Self {
        Self::new(key, Value::Null)
    }

    /// True if applying this record removes the key
    pub fn is_tombstone(&self) -> bool {
        is_falsy(&self.value)
    }

    /// Encode as a newline-terminated JSON line
    pub fn encode_line(&self) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)
            .map_err(|e| VaultError::Serialization(format!("record {:?}: {}", self.key, e)))?;
        line.push(b'\n');
        Ok(line)
    }

    /// Decode one complete line (without its terminator)
    ///
    /// `line_no` is 1-based and only used for error reporting.
    pub fn decode_line(line: &[u8], line_no: u64) -> Result<Self> {
        serde_json::from_slice(line).map_err(|source| VaultError::Parse {
            line: line_no,
            source,
        })
    }
}

/// Falsy values mark a key as deleted.
///
/// `null`, `false`, `0`, `-0`, `0.0` and `""` are falsy. Arrays and objects
/// are always truthy, even when empty.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
