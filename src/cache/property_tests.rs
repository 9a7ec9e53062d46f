//! Property-Based Tests for the Cache Core
//!
//! Uses proptest to verify ordering and determinism properties of the
//! pure components: recency tracking and shard selection.

use std::collections::VecDeque;

use proptest::prelude::*;

use crate::cache::RecencyTracker;
use crate::shard::{cache_key, fnv32, shard_for};

// == Strategies ==
/// Generates plausible namespace/key fragments.
fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}".prop_map(|s| s)
}

/// Generates small distinct key sets.
fn distinct_keys_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z]{1,8}", 1..20).prop_map(|s| s.into_iter().collect())
}

/// Reference model of a single recency list: front = most recent.
#[derive(Default)]
struct ModelList {
    order: VecDeque<String>,
}

impl ModelList {
    fn upsert_front(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push_front(key.to_string());
    }

    fn remove_back(&mut self) -> Option<String> {
        self.order.pop_back()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Routing is a pure function: same inputs, same shard, always in range.
    #[test]
    fn prop_route_deterministic_and_in_range(
        ns in ident_strategy(),
        key in ident_strategy(),
        shard_count in 1usize..64,
    ) {
        let first = shard_for(&ns, &key, shard_count);
        prop_assert!(first < shard_count);
        prop_assert_eq!(shard_for(&ns, &key, shard_count), first);
    }

    // The shard is a function of the concatenated key alone; pairs that
    // concatenate identically route identically.
    #[test]
    fn prop_route_is_function_of_concatenation(
        ns in ident_strategy(),
        key in ident_strategy(),
        shard_count in 1usize..64,
    ) {
        let joined = cache_key(&ns, &key);
        prop_assert_eq!(
            shard_for(&ns, &key, shard_count),
            shard_for("", &joined, shard_count)
        );
    }

    // The hash itself is stable for equal inputs and over clones.
    #[test]
    fn prop_fnv32_stable(key in ident_strategy()) {
        prop_assert_eq!(fnv32(&key), fnv32(&key.clone()));
    }

    // A single-shard tracker drops keys in exact least-recently-used order.
    #[test]
    fn prop_single_shard_tracker_matches_model(
        keys in distinct_keys_strategy(),
        touches in prop::collection::vec(any::<prop::sample::Index>(), 0..40),
    ) {
        let tracker = RecencyTracker::with_shard_count(1);
        let mut model = ModelList::default();

        for key in &keys {
            tracker.upsert_front(key, false);
            model.upsert_front(key);
        }
        for touch in touches {
            let key = &keys[touch.index(keys.len())];
            tracker.upsert_front(key, true);
            model.upsert_front(key);
        }

        // Drain both; orders must match exactly.
        for _ in 0..keys.len() {
            let expected = model.remove_back().expect("model cannot be empty here");
            prop_assert_eq!(tracker.remove_back(&expected), expected);
        }
        prop_assert!(tracker.is_empty());
    }

    // Tracker length counts each key once no matter how often it is touched.
    #[test]
    fn prop_tracker_len_counts_distinct_keys(
        keys in distinct_keys_strategy(),
        repeat in 1usize..4,
    ) {
        let tracker = RecencyTracker::new();
        for key in &keys {
            tracker.upsert_front(key, false);
        }
        for _ in 0..repeat {
            for key in &keys {
                tracker.upsert_front(key, true);
            }
        }
        prop_assert_eq!(tracker.len(), keys.len());
    }
}
