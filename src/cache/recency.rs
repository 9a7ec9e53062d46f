//! Recency Tracker Module
//!
//! Records key access/insert order for eviction victim selection.
//!
//! The tracker is an array of independently-locked doubly linked lists
//! ("list shards", unrelated to cache shards). Splitting the list reduces
//! lock contention: concurrent touches of keys in different list shards never
//! serialize on each other. A key's list shard is `fnv32(key) mod
//! LIST_SHARD_COUNT` for its whole lifetime.
//!
//! Each list is a purpose-built partial structure, not a general container:
//! it only supports front-insert, move-to-front and remove-tail, which is all
//! the eviction contract needs (O(1) victim selection at the tail). Nodes are
//! slots in a `Vec` linked by explicit prev/next indices, with freed slots
//! recycled through a free list.

use parking_lot::Mutex;

use crate::shard::fnv32;

/// Number of independent list shards in the tracker.
pub const LIST_SHARD_COUNT: usize = 32;

// == List Node ==
/// One slot of a list shard. Holds the cache key and its neighbor indices.
#[derive(Debug)]
struct ListNode {
    key: String,
    prev: Option<usize>,
    next: Option<usize>,
}

// == List Shard ==
/// A single doubly linked list: front = most recent, back = eviction victim.
#[derive(Debug, Default)]
struct ListShard {
    head: Option<usize>,
    tail: Option<usize>,
    nodes: Vec<ListNode>,
    free: Vec<usize>,
}

impl ListShard {
    /// Allocates a slot for `key`, reusing a freed slot when available.
    fn alloc(&mut self, key: String, next: Option<usize>) -> usize {
        let node = ListNode {
            key,
            prev: None,
            next,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Links `key` at the front of the list.
    fn insert_front(&mut self, key: String) {
        let idx = self.alloc(key, self.head);
        if let Some(old_head) = self.head {
            self.nodes[old_head].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Relinks `key` to the front, scanning from the head to find it.
    ///
    /// The scan is intentionally linear: positions are not independently
    /// indexed, and the walk is bounded by this shard's cardinality. A key
    /// that is already the head returns immediately; a key not present is a
    /// no-op (it may have been evicted between map and tracker updates).
    fn move_to_front(&mut self, key: &str) {
        let head = match self.head {
            Some(h) => h,
            None => return,
        };
        if self.nodes[head].key == key {
            return; // already most recent
        }

        let mut cursor = self.nodes[head].next;
        while let Some(idx) = cursor {
            if self.nodes[idx].key == key {
                // Unlink from current position.
                let prev = self.nodes[idx].prev;
                let next = self.nodes[idx].next;
                if let Some(p) = prev {
                    self.nodes[p].next = next;
                }
                if let Some(n) = next {
                    self.nodes[n].prev = prev;
                } else {
                    self.tail = prev;
                }
                // Relink at the front.
                self.nodes[idx].prev = None;
                self.nodes[idx].next = self.head;
                if let Some(h) = self.head {
                    self.nodes[h].prev = Some(idx);
                }
                self.head = Some(idx);
                return;
            }
            cursor = self.nodes[idx].next;
        }
    }

    /// Drops and returns the tail key.
    ///
    /// # Panics
    /// Panics if the list is empty. Callers must only invoke this on a shard
    /// known to be non-empty (the eviction path upserts the new key into the
    /// same shard first, so the precondition always holds there).
    fn remove_back(&mut self) -> String {
        let tail = self
            .tail
            .unwrap_or_else(|| panic!("remove_back called on empty list shard"));
        let prev = self.nodes[tail].prev;
        match prev {
            Some(p) => self.nodes[p].next = None,
            None => self.head = None,
        }
        self.tail = prev;
        self.free.push(tail);
        std::mem::take(&mut self.nodes[tail].key)
    }

    fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }
}

// == Recency Tracker ==
/// Sharded recency list used by the LRU store to pick eviction victims.
#[derive(Debug)]
pub struct RecencyTracker {
    shards: Vec<Mutex<ListShard>>,
}

impl Default for RecencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RecencyTracker {
    // == Constructor ==
    /// Creates a tracker with [`LIST_SHARD_COUNT`] empty list shards.
    pub fn new() -> Self {
        Self::with_shard_count(LIST_SHARD_COUNT)
    }

    /// Creates a tracker with an explicit number of list shards.
    ///
    /// One shard gives a single global recency order (strict LRU); more
    /// shards trade ordering precision for lower lock contention.
    ///
    /// # Panics
    /// Panics if `shard_count` is zero.
    pub fn with_shard_count(shard_count: usize) -> Self {
        assert!(shard_count > 0, "tracker needs at least one list shard");
        Self {
            shards: (0..shard_count)
                .map(|_| Mutex::new(ListShard::default()))
                .collect(),
        }
    }

    fn shard(&self, key: &str) -> &Mutex<ListShard> {
        &self.shards[fnv32(key) as usize % self.shards.len()]
    }

    // == Insert Front ==
    /// Inserts a new key at the front of its list shard.
    pub fn insert_front(&self, key: &str) {
        self.shard(key).lock().insert_front(key.to_string());
    }

    // == Move To Front ==
    /// Marks an existing key as most recently used.
    pub fn move_to_front(&self, key: &str) {
        self.shard(key).lock().move_to_front(key);
    }

    // == Upsert Front ==
    /// Dispatches to [`move_to_front`](Self::move_to_front) when the key is
    /// already tracked, [`insert_front`](Self::insert_front) otherwise.
    pub fn upsert_front(&self, key: &str, exists: bool) {
        if exists {
            self.move_to_front(key);
        } else {
            self.insert_front(key);
        }
    }

    // == Remove Back ==
    /// Drops and returns the least recently used key of `key`'s list shard.
    ///
    /// # Panics
    /// Panics if that list shard is empty; callers must guarantee the shard
    /// holds at least one key (see [`ListShard::remove_back`]).
    pub fn remove_back(&self, key: &str) -> String {
        self.shard(key).lock().remove_back()
    }

    // == Length ==
    /// Total number of tracked keys across all list shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    /// Returns true if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    /// Single-shard list for deterministic ordering checks.
    fn single_list() -> ListShard {
        ListShard::default()
    }

    #[test]
    fn test_insert_then_remove_back_fifo() {
        let mut list = single_list();
        list.insert_front("a".to_string());
        list.insert_front("b".to_string());
        list.insert_front("c".to_string());

        // Back is the oldest insert.
        assert_eq!(list.remove_back(), "a");
        assert_eq!(list.remove_back(), "b");
        assert_eq!(list.remove_back(), "c");
    }

    #[test]
    fn test_move_to_front_protects_key() {
        let mut list = single_list();
        list.insert_front("a".to_string());
        list.insert_front("b".to_string());
        list.insert_front("c".to_string());

        list.move_to_front("a");

        assert_eq!(list.remove_back(), "b");
        assert_eq!(list.remove_back(), "c");
        assert_eq!(list.remove_back(), "a");
    }

    #[test]
    fn test_move_to_front_of_head_is_noop() {
        let mut list = single_list();
        list.insert_front("a".to_string());
        list.insert_front("b".to_string());

        list.move_to_front("b");

        assert_eq!(list.len(), 2);
        assert_eq!(list.remove_back(), "a");
    }

    #[test]
    fn test_move_to_front_adjusts_tail() {
        let mut list = single_list();
        list.insert_front("a".to_string());
        list.insert_front("b".to_string());

        // 'a' is the tail; moving it to the front must promote 'b' to tail.
        list.move_to_front("a");
        assert_eq!(list.remove_back(), "b");
        assert_eq!(list.remove_back(), "a");
    }

    #[test]
    fn test_move_to_front_missing_key_is_noop() {
        let mut list = single_list();
        list.insert_front("a".to_string());
        list.move_to_front("ghost");
        assert_eq!(list.len(), 1);
    }

    #[test]
    #[should_panic(expected = "empty list shard")]
    fn test_remove_back_empty_panics() {
        let mut list = single_list();
        list.remove_back();
    }

    #[test]
    fn test_slot_reuse_after_remove() {
        let mut list = single_list();
        list.insert_front("a".to_string());
        list.remove_back();
        list.insert_front("b".to_string());

        // The freed slot is recycled rather than growing the arena.
        assert_eq!(list.nodes.len(), 1);
        assert_eq!(list.remove_back(), "b");
    }

    #[test]
    fn test_tracker_upsert_and_len() {
        let tracker = RecencyTracker::new();
        assert!(tracker.is_empty());

        tracker.upsert_front("key1", false);
        tracker.upsert_front("key2", false);
        tracker.upsert_front("key1", true);

        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_tracker_remove_back_same_shard() {
        let tracker = RecencyTracker::new();
        tracker.insert_front("victim");

        // remove_back on the same key's shard must return that key when it
        // is the only occupant.
        assert_eq!(tracker.remove_back("victim"), "victim");
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_tracker_shard_assignment_is_stable() {
        let tracker = RecencyTracker::new();
        let a = tracker.shard("some_key") as *const _;
        let b = tracker.shard("some_key") as *const _;
        assert_eq!(a, b);
    }
}
