//! Shard Selection Module
//!
//! Deterministic mapping from a `(namespace, key)` pair to a cache shard.
//!
//! Every component that needs shard agreement (the router, the node binary,
//! tests) must go through these functions: the mapping is a pure function of
//! the key bytes and the shard count, with no process-local state, so any two
//! router instances (or the same instance across restarts) agree.

// == Cache Key ==
/// Builds the canonical cache key for a `(namespace, key)` pair.
///
/// The physical key is the plain concatenation `namespace || key` with no
/// separator. Two distinct pairs that concatenate to the same string (for
/// example `("ab", "c")` and `("a", "bc")`) are indistinguishable. This is
/// an accepted property of the key scheme, not a defect.
pub fn cache_key(namespace: &str, key: &str) -> String {
    format!("{}{}", namespace, key)
}

// == Shard Selection ==
/// Returns the cache shard that owns `(namespace, key)`.
///
/// Computed as `fnv32(namespace || key) mod shard_count`.
///
/// # Panics
/// Panics if `shard_count` is zero.
pub fn shard_for(namespace: &str, key: &str, shard_count: usize) -> usize {
    fnv32(&cache_key(namespace, key)) as usize % shard_count
}

// == FNV-1 Hash ==
/// Computes a 32-bit FNV-1 hash of the key.
///
/// This is the same hash family the recency tracker uses for list-shard
/// selection, kept as a plain function so its output is stable across
/// processes and releases.
pub fn fnv32(key: &str) -> u32 {
    const PRIME32: u32 = 16_777_619;
    let mut hash: u32 = 2_166_136_261;
    for b in key.as_bytes() {
        hash = hash.wrapping_mul(PRIME32);
        hash ^= u32::from(*b);
    }
    hash
}
