//! Node Service Module
//!
//! Core state and operations of a cache node: local reads and writes on the
//! LRU store, detached replication-log appends, the last-writer-wins merge
//! applied to replicated writes, and free-running request counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::warn;

use crate::cache::{CacheEntry, LruStore};
use crate::config::NodeConfig;
use crate::error::{CacheError, Result};
use crate::models::StatsResponse;
use crate::replication::{key_path, shard_prefix, ReplicationLog, ReplicationRecord};
use crate::shard::cache_key;

// == Node State ==
/// One cache node: the shard's LRU store plus a handle to the replication
/// log and the node's identity on it.
///
/// Counters are free-running atomics with an eventually-consistent read
/// contract: `stats` may be called at any time without blocking writers.
pub struct NodeState {
    /// The shard's byte-bounded LRU store
    pub store: LruStore,
    /// Durable replication log shared with shard peers
    pub log: Arc<dyn ReplicationLog>,
    /// This node's advertised address; stamped on outgoing records and
    /// compared against incoming ones for self-echo suppression
    pub addr: String,
    /// Cache shard served by this node
    pub shard: usize,
    /// Log path prefix shared by the cluster
    pub cache_prefix: String,
    get_count: AtomicU64,
    set_count: AtomicU64,
    miss_count: AtomicU64,
    total_count: AtomicU64,
    sync_count: AtomicU64,
}

impl NodeState {
    // == Constructor ==
    /// Creates node state from configuration, a store and a log handle.
    pub fn new(config: &NodeConfig, store: LruStore, log: Arc<dyn ReplicationLog>) -> Self {
        Self {
            store,
            log,
            addr: config.advertise_addr.clone(),
            shard: config.shard,
            cache_prefix: config.cache_prefix.clone(),
            get_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            total_count: AtomicU64::new(0),
            sync_count: AtomicU64::new(0),
        }
    }

    // == Paths ==
    /// Log prefix holding every record of this node's shard.
    pub fn shard_prefix(&self) -> String {
        shard_prefix(&self.cache_prefix, self.shard)
    }

    /// Full log path of a key's record under this node's shard.
    pub fn key_path(&self, key: &str) -> String {
        key_path(&self.cache_prefix, self.shard, key)
    }

    // == Get ==
    /// Looks up `(namespace, key)` locally.
    ///
    /// Absence is a NotFound error, never an empty value.
    pub fn get_value(&self, namespace: &str, key: &str) -> Result<CacheEntry> {
        self.get_count.fetch_add(1, Ordering::Relaxed);
        self.total_count.fetch_add(1, Ordering::Relaxed);
        match self.store.get(&cache_key(namespace, key)) {
            Some(entry) => Ok(entry),
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                Err(CacheError::NotFound(format!("Cache miss for key {}", key)))
            }
        }
    }

    // == Set ==
    /// Stamps and stores a new entry, then replicates it.
    ///
    /// The local write is synchronous; this returns only after the map
    /// write lands. The replication-log append runs on a detached task;
    /// a failed append is logged and never surfaces to the caller. The
    /// client-visible contract is "locally durable, eventually replicated".
    pub fn set_value(&self, namespace: &str, key: &str, value: String) {
        let full_key = cache_key(namespace, key);
        let entry = CacheEntry::new(value);
        self.store.set(&full_key, entry.clone());
        self.set_count.fetch_add(1, Ordering::Relaxed);
        self.total_count.fetch_add(1, Ordering::Relaxed);

        let log = Arc::clone(&self.log);
        let path = self.key_path(&full_key);
        let record = ReplicationRecord::new(self.addr.clone(), full_key, entry);
        tokio::spawn(async move {
            let bytes = match record.encode() {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(key = %record.key, "failed to encode replication record: {}", e);
                    return;
                }
            };
            if let Err(e) = log.put(&path, bytes).await {
                warn!(key = %record.key, "replication log write failed: {}", e);
            }
        });
    }

    // == Apply Sync ==
    /// Applies a replicated write with last-writer-wins merge.
    ///
    /// A local entry strictly newer than the incoming one wins and the
    /// incoming write is discarded; otherwise the incoming entry goes
    /// through the normal store set path, so it participates in eviction
    /// and size accounting like any other write. Applying the same record
    /// twice, or records out of arrival order, converges to the same state.
    ///
    /// Invoked only by the sync engine, never by clients.
    pub fn apply_sync(&self, key: &str, incoming: CacheEntry) {
        if let Some(current) = self.store.get(key) {
            if current.source_ts > incoming.source_ts {
                return; // local cache has newer value
            }
        }
        self.store.set(key, incoming);
        self.sync_count.fetch_add(1, Ordering::Relaxed);
    }

    // == Stats ==
    /// Point-in-time counters plus the store's live occupancy.
    pub fn stats(&self) -> StatsResponse {
        StatsResponse {
            get_count: self.get_count.load(Ordering::Relaxed),
            set_count: self.set_count.load(Ordering::Relaxed),
            total_count: self.total_count.load(Ordering::Relaxed),
            sync_count: self.sync_count.load(Ordering::Relaxed),
            current_bytes: self.store.curr_size(),
            key_count: self.store.count(),
            shard: self.shard,
        }
    }
}
