//! Index Module
//!
//! In-memory map of every live key to its current value.
//!
//! ## Responsibilities
//! - Authoritative reads once the log has been replayed
//! - Apply records with tombstone semantics (falsy value removes the key)
//! - Linear field-equality search over live values
//!
//! ## Data Structure Choice
//! Using BTreeMap wrapped in RwLock:
//! - Deterministic iteration order (sorted by key), so `search` is repeatable
//! - Many concurrent readers, one writer at a time

mod scan;
mod table;

pub use scan::{field_matches, find_first, strict_eq};
pub use table::Index;
