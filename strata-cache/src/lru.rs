//! Bounded LRU store with O(1) operations.
//!
//! Uses a `HashMap` for key lookup and an arena-backed doubly-linked list
//! for recency ordering, with index-based links instead of raw pointers
//! (no `unsafe`). The list runs from least-recently used at the head to
//! most-recently used at the tail; every `get` or `put` that touches an
//! existing key moves exactly that key to the tail without disturbing the
//! relative order of the rest.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strata_core::{CacheKey, ConfigError};

/// Sentinel index for absent links in the arena list.
const NIL: usize = usize::MAX;

/// A node in the arena-backed doubly-linked recency list.
///
/// `value` is an `Option` so eviction can move the payload out without
/// cloning it.
#[derive(Debug)]
struct Node<V> {
    key: CacheKey,
    value: Option<V>,
    prev: usize,
    next: usize,
}

/// Observability counters for a single store.
///
/// Counters never influence policy; they exist for debugging and display.
/// `peek` and `contains_key` are not counted as lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheCounters {
    /// Number of `get` calls that found the key.
    pub hits: u64,
    /// Number of `get` calls that missed.
    pub misses: u64,
    /// Number of new keys inserted by `put`.
    pub insertions: u64,
    /// Number of existing keys overwritten by `put`.
    pub updates: u64,
    /// Number of entries evicted under capacity pressure.
    pub evictions: u64,
}

impl CacheCounters {
    /// Hit rate as a fraction in [0.0, 1.0]. Returns 0.0 with no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of `get` calls (hits + misses).
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Fixed-capacity key/value store with strict LRU eviction.
///
/// # Invariants
///
/// - `len() <= capacity()` at every observable point; capacity is fixed
///   at construction.
/// - The recency list contains exactly the mapped key set, no duplicates.
/// - Inserting a new key at capacity evicts the current LRU entry in the
///   same logical step - at most one eviction per `put`, never more.
///
/// There is no explicit delete operation: entries leave the store only
/// through eviction.
pub struct LruStore<V> {
    /// Maximum number of entries, fixed for the life of the store.
    capacity: usize,
    /// Key to arena index.
    map: HashMap<CacheKey, usize>,
    /// Node arena; slots freed by eviction are recycled via `free_head`.
    arena: Vec<Node<V>>,
    /// Index of the least-recently used node.
    head: usize,
    /// Index of the most-recently used node.
    tail: usize,
    /// Head of the free-slot list.
    free_head: usize,
    counters: CacheCounters,
}

impl<V> std::fmt::Debug for LruStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruStore")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("counters", &self.counters)
            .finish()
    }
}

impl<V> LruStore<V> {
    /// Create a store with the given fixed capacity.
    ///
    /// Capacity 0 is a configuration error: a store that cannot hold
    /// anything has no coherent eviction semantics, so it is rejected at
    /// construction rather than clamped.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::CapacityTooSmall { got: capacity });
        }
        Ok(Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            arena: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            free_head: NIL,
            counters: CacheCounters::default(),
        })
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Observability counters for this store.
    pub fn counters(&self) -> &CacheCounters {
        &self.counters
    }

    /// Get the value for `key`, marking it most-recently used.
    ///
    /// An absent key returns `None` and leaves the recency order of all
    /// entries untouched (only the miss counter moves).
    pub fn get(&mut self, key: &str) -> Option<&V> {
        if let Some(&idx) = self.map.get(key) {
            self.move_to_tail(idx);
            self.counters.hits += 1;
            self.arena[idx].value.as_ref()
        } else {
            self.counters.misses += 1;
            None
        }
    }

    /// Read the value for `key` without touching its recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.map
            .get(key)
            .and_then(|&idx| self.arena[idx].value.as_ref())
    }

    /// Membership test without recency promotion.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or overwrite `key`, marking it most-recently used.
    ///
    /// Overwriting an existing key never evicts. Inserting a new key at
    /// capacity evicts the current LRU entry first and returns it, so the
    /// store never observably exceeds its capacity.
    pub fn put(&mut self, key: &str, value: V) -> Option<(CacheKey, V)> {
        if let Some(&idx) = self.map.get(key) {
            self.arena[idx].value = Some(value);
            self.move_to_tail(idx);
            self.counters.updates += 1;
            return None;
        }

        let evicted = if self.map.len() == self.capacity {
            self.evict_lru()
        } else {
            None
        };

        let idx = self.alloc_slot(key.to_owned(), value);
        self.push_tail(idx);
        self.map.insert(key.to_owned(), idx);
        self.counters.insertions += 1;

        evicted
    }

    /// Snapshot of the present keys in least- to most-recently used order.
    ///
    /// Never mutates recency; safe for introspection at any point.
    pub fn keys_by_recency(&self) -> Vec<CacheKey> {
        let mut keys = Vec::with_capacity(self.map.len());
        let mut current = self.head;
        while current != NIL {
            keys.push(self.arena[current].key.clone());
            current = self.arena[current].next;
        }
        keys
    }

    // --- Internal linked-list operations ---

    /// Allocate an arena slot, recycling a freed one if available.
    fn alloc_slot(&mut self, key: CacheKey, value: V) -> usize {
        if self.free_head != NIL {
            let idx = self.free_head;
            self.free_head = self.arena[idx].next;
            self.arena[idx] = Node {
                key,
                value: Some(value),
                prev: NIL,
                next: NIL,
            };
            idx
        } else {
            let idx = self.arena.len();
            self.arena.push(Node {
                key,
                value: Some(value),
                prev: NIL,
                next: NIL,
            });
            idx
        }
    }

    /// Detach node `idx` from the recency list without freeing its slot.
    fn unlink(&mut self, idx: usize) {
        let prev = self.arena[idx].prev;
        let next = self.arena[idx].next;

        if prev != NIL {
            self.arena[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.arena[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.arena[idx].prev = NIL;
        self.arena[idx].next = NIL;
    }

    /// Append node `idx` at the tail (most-recently used).
    fn push_tail(&mut self, idx: usize) {
        self.arena[idx].prev = self.tail;
        self.arena[idx].next = NIL;

        if self.tail != NIL {
            self.arena[self.tail].next = idx;
        }
        self.tail = idx;

        if self.head == NIL {
            self.head = idx;
        }
    }

    /// Move an existing node to the tail (most-recently used).
    fn move_to_tail(&mut self, idx: usize) {
        if self.tail == idx {
            return;
        }
        self.unlink(idx);
        self.push_tail(idx);
    }

    /// Evict the head (least-recently used) entry.
    fn evict_lru(&mut self) -> Option<(CacheKey, V)> {
        if self.head == NIL {
            return None;
        }
        let idx = self.head;
        let key = self.arena[idx].key.clone();
        let value = self.arena[idx].value.take();

        self.unlink(idx);
        self.map.remove(&key);

        // Recycle the slot so the arena stays bounded by capacity.
        self.arena[idx].next = self.free_head;
        self.free_head = idx;

        self.counters.evictions += 1;

        value.map(|v| (key, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result: Result<LruStore<i32>, _> = LruStore::new(0);
        assert_eq!(result.err(), Some(ConfigError::CapacityTooSmall { got: 0 }));
    }

    #[test]
    fn test_basic_put_and_get() {
        let mut store = LruStore::new(3).unwrap();
        store.put("a", 1);
        store.put("b", 2);
        store.put("c", 3);

        assert_eq!(store.get("a"), Some(&1));
        assert_eq!(store.get("b"), Some(&2));
        assert_eq!(store.get("c"), Some(&3));
        assert_eq!(store.len(), 3);
        assert_eq!(store.capacity(), 3);
    }

    #[test]
    fn test_miss_returns_none_without_reordering() {
        let mut store = LruStore::new(2).unwrap();
        store.put("a", 1);
        store.put("b", 2);

        assert_eq!(store.get("nope"), None);
        assert_eq!(store.keys_by_recency(), vec!["a", "b"]);
        assert_eq!(store.counters().misses, 1);
    }

    #[test]
    fn test_insert_at_capacity_evicts_lru() {
        let mut store = LruStore::new(2).unwrap();
        store.put("a", 1);
        store.put("b", 2);

        let evicted = store.put("c", 3);
        assert_eq!(evicted, Some(("a".to_string(), 1)));
        assert_eq!(store.len(), 2);
        assert!(!store.contains_key("a"));
        assert_eq!(store.keys_by_recency(), vec!["b", "c"]);
        assert_eq!(store.counters().evictions, 1);
    }

    #[test]
    fn test_n_plus_one_inserts_evict_only_the_first() {
        let mut store = LruStore::new(3).unwrap();
        for key in ["k1", "k2", "k3", "k4"] {
            store.put(key, ());
        }
        assert_eq!(store.keys_by_recency(), vec!["k2", "k3", "k4"]);
    }

    #[test]
    fn test_get_promotes_to_mru() {
        let mut store = LruStore::new(2).unwrap();
        store.put("a", 1);
        store.put("b", 2);

        store.get("a");
        let evicted = store.put("c", 3);
        assert_eq!(evicted, Some(("b".to_string(), 2)));
        assert_eq!(store.keys_by_recency(), vec!["a", "c"]);
    }

    #[test]
    fn test_accessed_key_survives_fill_to_capacity() {
        let mut store = LruStore::new(3).unwrap();
        store.put("a", 1);
        store.put("b", 2);
        store.put("c", 3);

        store.get("a");
        store.put("d", 4); // evicts b
        store.put("e", 5); // evicts c

        assert!(store.contains_key("a"));
        assert_eq!(store.keys_by_recency(), vec!["a", "d", "e"]);
    }

    #[test]
    fn test_update_existing_key_never_evicts() {
        let mut store = LruStore::new(2).unwrap();
        store.put("a", 1);
        store.put("b", 2);

        let evicted = store.put("a", 10);
        assert!(evicted.is_none());
        assert_eq!(store.len(), 2);
        assert_eq!(store.peek("a"), Some(&10));
        // Update also bumps recency.
        assert_eq!(store.keys_by_recency(), vec!["b", "a"]);
        assert_eq!(store.counters().updates, 1);
    }

    #[test]
    fn test_peek_does_not_promote() {
        let mut store = LruStore::new(2).unwrap();
        store.put("a", 1);
        store.put("b", 2);

        assert_eq!(store.peek("a"), Some(&1));
        let evicted = store.put("c", 3);
        assert_eq!(evicted, Some(("a".to_string(), 1)));
    }

    #[test]
    fn test_keys_by_recency_does_not_mutate_order() {
        let mut store = LruStore::new(3).unwrap();
        store.put("a", 1);
        store.put("b", 2);

        let before = store.keys_by_recency();
        let after = store.keys_by_recency();
        assert_eq!(before, after);
        assert_eq!(before, vec!["a", "b"]);
    }

    #[test]
    fn test_capacity_one_store() {
        let mut store = LruStore::new(1).unwrap();
        store.put("a", 1);
        let evicted = store.put("b", 2);

        assert_eq!(evicted, Some(("a".to_string(), 1)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.keys_by_recency(), vec!["b"]);
    }

    #[test]
    fn test_eviction_cycles_recycle_arena_slots() {
        let mut store = LruStore::new(2).unwrap();
        for round in 0..10 {
            store.put(&format!("a{round}"), round);
            store.put(&format!("b{round}"), round);
        }
        assert_eq!(store.len(), 2);
        // Slot recycling keeps the arena bounded by capacity.
        assert!(store.arena.len() <= 2);
    }

    #[test]
    fn test_counters_track_operations() {
        let mut store = LruStore::new(2).unwrap();
        store.put("a", 1); // insertion
        store.put("b", 2); // insertion
        store.get("a"); // hit
        store.get("x"); // miss
        store.put("a", 10); // update
        store.put("c", 3); // insertion + eviction

        let counters = store.counters();
        assert_eq!(counters.insertions, 3);
        assert_eq!(counters.updates, 1);
        assert_eq!(counters.hits, 1);
        assert_eq!(counters.misses, 1);
        assert_eq!(counters.evictions, 1);
        assert_eq!(counters.lookups(), 2);
        assert!((counters.hit_rate() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_hit_rate_is_zero_with_no_lookups() {
        let counters = CacheCounters::default();
        assert_eq!(counters.hit_rate(), 0.0);
    }

    #[test]
    fn test_sequential_overflow_keeps_only_newest() {
        let mut store = LruStore::new(100).unwrap();
        for i in 0..1000 {
            store.put(&format!("key{i}"), i);
        }
        assert_eq!(store.len(), 100);
        for i in 900..1000 {
            assert_eq!(store.peek(&format!("key{i}")), Some(&i));
        }
        assert!(!store.contains_key("key899"));
    }
}
