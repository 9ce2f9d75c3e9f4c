//! Insertion-order LRU cache.
//!
//! Backs text measurement and the image/sprite resource caches. Lookups do
//! not promote entries: the oldest inserted key is evicted first, which is
//! close enough to recency for short cell strings and icon sets.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

pub struct LruCache<K: Hash + Eq + Clone, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert a value. An existing key keeps its value and its age.
    /// Returns `true` if the entry was newly inserted.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.capacity == 0 || self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key.clone(), value);
        self.order.push_back(key);
        self.trim();
        true
    }

    /// Return the cached value, computing and inserting it on a miss. With
    /// capacity 0 the computed value is returned without being stored.
    pub fn get_or_insert_with(&mut self, key: &K, make: impl FnOnce() -> V) -> V
    where
        V: Clone,
    {
        if let Some(v) = self.entries.get(key) {
            return v.clone();
        }
        let value = make();
        self.insert(key.clone(), value.clone());
        value
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Evict oldest entries until we're at or below capacity.
    fn trim(&mut self) {
        let mut evicted = 0usize;
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            evicted += 1;
        }
        if evicted > 0 {
            log::trace!("lru: evicted {evicted} entries (capacity {})", self.capacity);
        }
    }
}

impl<K: Hash + Eq + Clone, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
