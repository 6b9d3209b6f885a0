//! Index implementation
//!
//! BTreeMap-based index with RwLock for concurrency.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde_json::Value;

use super::scan;
use crate::log::{is_falsy, Record};

/// In-memory key → value map
///
/// ## Concurrency:
/// - `data`: Protected by RwLock (many concurrent readers, exclusive writer)
/// - All methods use `&self`
pub struct Index {
    data: RwLock<BTreeMap<String, Value>>,
}

impl Index {
    /// Create a new empty Index
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Get the current value for a key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.data.read().get(key).cloned()
    }

    /// True if the key is live
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Apply a record: a falsy value removes the key, anything else assigns it
    ///
    /// Returns true if the key is live afterwards.
    pub fn apply(&self, record: &Record) -> bool {
        self.apply_value(record.key.clone(), record.value.clone())
    }

    /// Apply an owned record without cloning its value
    pub fn apply_owned(&self, record: Record) -> bool {
        self.apply_value(record.key, record.value)
    }

    fn apply_value(&self, key: String, value: Value) -> bool {
        let mut data = self.data.write();
        if is_falsy(&value) {
            data.remove(&key);
            false
        } else {
            data.insert(key, value);
            true
        }
    }

    /// First value (in key order) whose `field` is truthy and equal to `target`
    pub fn search(&self, field: &str, target: &Value) -> Option<Value> {
        let data = self.data.read();
        scan::find_first(data.values(), field, target).cloned()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Live keys in iteration order
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Copy of the whole map
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.data.read().clone()
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}
