//! Cache Entry Module
//!
//! Defines the immutable value record held by the LRU store and shipped
//! across replicas.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A single cached value plus the wall-clock timestamp assigned by the node
/// that first accepted the write.
///
/// Entries are immutable once constructed: a Set always builds a fresh entry
/// with a fresh timestamp, values are never mutated in place. The timestamp
/// is what the last-writer-wins merge compares when replicas reconcile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored value, treated as an opaque payload
    pub value: String,
    /// Source timestamp (Unix milliseconds) stamped by the accepting node
    pub source_ts: i64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current wall-clock time.
    pub fn new(value: String) -> Self {
        Self {
            value,
            source_ts: current_timestamp_ms(),
        }
    }

    /// Creates an entry with an explicit source timestamp.
    ///
    /// Used when reconstructing entries from replication records; normal
    /// writes go through [`CacheEntry::new`].
    pub fn with_timestamp(value: String, source_ts: i64) -> Self {
        Self { value, source_ts }
    }

    // == Size ==
    /// Byte length of the payload, the unit the store's budget is charged in.
    pub fn size_bytes(&self) -> i64 {
        self.value.len() as i64
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
