//! LRU Store Module
//!
//! The leaf data engine: a concurrent key/value map bounded by a byte budget,
//! with recency bookkeeping and eviction running off the request path.
//!
//! `set` returns to the caller as soon as the map write lands; byte
//! accounting, recency updates and eviction happen in a detached task, so
//! `curr_size`/`count` are eventually consistent with the map during bursts
//! of writes. Callers that need to observe the post-write state (tests,
//! mostly) poll or wait a bounded interval.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::cache::{CacheEntry, RecencyTracker};

// == LRU Store ==
/// Byte-bounded concurrent LRU cache.
///
/// Cloning is cheap: clones share the same map, tracker and counters, which
/// is what lets detached background tasks outlive a borrow of the store.
#[derive(Debug, Clone)]
pub struct LruStore {
    /// Key-value storage
    map: Arc<DashMap<String, CacheEntry>>,
    /// Recency tracker for victim selection
    tracker: Arc<RecencyTracker>,
    /// Running byte total, updated atomically off the request path
    curr_bytes: Arc<AtomicI64>,
    /// Fixed byte budget
    max_bytes: i64,
}

impl LruStore {
    // == Constructor ==
    /// Creates an empty store with the given byte budget.
    pub fn new(max_bytes: i64) -> Self {
        Self::with_tracker(max_bytes, RecencyTracker::new())
    }

    /// Creates a store with an explicitly configured recency tracker.
    ///
    /// Mostly useful for tuning the list-shard count; a single-shard tracker
    /// gives strict global LRU order at the cost of lock contention.
    pub fn with_tracker(max_bytes: i64, tracker: RecencyTracker) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            tracker: Arc::new(tracker),
            curr_bytes: Arc::new(AtomicI64::new(0)),
            max_bytes,
        }
    }

    // == Get ==
    /// Looks up a key. Absence is `None`, never an error.
    ///
    /// On a hit, the recency touch is scheduled on a detached task and may
    /// run after this call returns; the lookup itself never blocks on the
    /// list-shard lock.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let entry = self.map.get(key).map(|e| e.value().clone());
        if entry.is_some() {
            let tracker = Arc::clone(&self.tracker);
            let key = key.to_string();
            tokio::spawn(async move {
                tracker.upsert_front(&key, true);
            });
        }
        entry
    }

    // == Set ==
    /// Writes an entry, returning its size in bytes.
    ///
    /// The map write is synchronous; byte accounting, the recency upsert and
    /// eviction run on a detached task. When the budget is exceeded, exactly
    /// one victim is evicted per set: the tail of the written key's list
    /// shard. A single oversized write can therefore leave the store above
    /// budget until subsequent sets evict further.
    pub fn set(&self, key: &str, entry: CacheEntry) -> i64 {
        let size = entry.size_bytes();
        let existed = self.map.contains_key(key);
        self.map.insert(key.to_string(), entry);

        let map = Arc::clone(&self.map);
        let tracker = Arc::clone(&self.tracker);
        let curr_bytes = Arc::clone(&self.curr_bytes);
        let max_bytes = self.max_bytes;
        let key = key.to_string();
        tokio::spawn(async move {
            curr_bytes.fetch_add(size, Ordering::Relaxed);
            tracker.upsert_front(&key, existed);
            if curr_bytes.load(Ordering::Relaxed) > max_bytes {
                // The upsert above put `key` in its list shard, so the shard
                // is non-empty and remove_back's precondition holds.
                let victim = tracker.remove_back(&key);
                if let Some((_, evicted)) = map.remove(&victim) {
                    curr_bytes.fetch_sub(evicted.size_bytes(), Ordering::Relaxed);
                }
            }
        });

        size
    }

    // == Count ==
    /// Number of entries currently in the map.
    pub fn count(&self) -> usize {
        self.map.len()
    }

    // == Current Size ==
    /// Running byte total. Eventually consistent with the map's occupancy.
    pub fn curr_size(&self) -> i64 {
        self.curr_bytes.load(Ordering::Relaxed)
    }

    /// The configured byte budget.
    pub fn max_bytes(&self) -> i64 {
        self.max_bytes
    }
}
