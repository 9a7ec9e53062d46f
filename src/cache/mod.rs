//! Cache Module
//!
//! The per-node data engine: a byte-bounded LRU store built from a
//! concurrent map and a sharded recency tracker.

mod entry;
mod recency;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use recency::{RecencyTracker, LIST_SHARD_COUNT};
pub use store::LruStore;
