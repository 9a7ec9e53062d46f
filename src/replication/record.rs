//! Replication Record Module
//!
//! The envelope persisted to the durable log, one per local Set, plus the
//! path scheme that addresses it.
//!
//! Records for a key are always written to the same path, so a later write
//! overwrites the prior record: the log doubles as a compacted per-key
//! table rather than an append-only journal.

use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Replication Record ==
/// A replicated write: the originating node's address, the full cache key,
/// and the entry as stored locally.
///
/// `source` is what the sync engine compares against its own advertised
/// address to discard self-echoes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationRecord {
    /// Network address of the node that accepted the write
    pub source: String,
    /// Full cache key (`namespace || key`)
    pub key: String,
    /// The entry, timestamp included
    pub value: CacheEntry,
}

impl ReplicationRecord {
    /// Creates a record for a locally accepted write.
    pub fn new(source: impl Into<String>, key: impl Into<String>, value: CacheEntry) -> Self {
        Self {
            source: source.into(),
            key: key.into(),
            value,
        }
    }

    // == Encode ==
    /// Serializes the record for storage in the log.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| CacheError::Internal(format!("encoding replication record: {}", e)))
    }

    // == Decode ==
    /// Deserializes a record read from the log.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| CacheError::Internal(format!("decoding replication record: {}", e)))
    }
}

// == Path Scheme ==
/// Log prefix holding every record of one shard: `<cache_prefix>/<shard>`.
pub fn shard_prefix(cache_prefix: &str, shard: usize) -> String {
    format!("{}/{}", cache_prefix, shard)
}

/// Full log path of a key's record: `<cache_prefix>/<shard>/<key>`.
pub fn key_path(cache_prefix: &str, shard: usize, key: &str) -> String {
    format!("{}/{}", shard_prefix(cache_prefix, shard), key)
}
