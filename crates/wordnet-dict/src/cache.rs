//! Entity caches: a bounded recency-evicting policy for offset-addressed
//! entities and an unbounded concurrent policy for key spaces that grow
//! with the query stream.
//!
//! Every cache here is a pure optimization over deterministic recomputation
//! from the store: a miss is never an error, and eviction only costs
//! latency. Values are `Arc`s, so while an entry stays resident all callers
//! observe the same shared object — sense equality and sense numbering
//! depend on that.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;
use lru::LruCache;

/// Bounded cache, least-recently-used entry evicted first.
pub(crate) struct LruEntityCache<K, V> {
    inner: Mutex<LruCache<K, V>>,
}

impl<K: Hash + Eq, V: Clone> LruEntityCache<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<V> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub(crate) fn put(&self, key: K, value: V) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key, value);
    }

    pub(crate) fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Unbounded concurrent cache for keys with high hit benefit but no usable
/// bound (arbitrary query strings). The legacy engine used
/// soft-reference maps reclaimed under memory pressure; without a runtime
/// hook for that, entries stay until [`clear`](Self::clear).
pub(crate) struct SoftCache<K, V> {
    map: DashMap<K, V>,
}

impl<K: Hash + Eq, V: Clone> SoftCache<K, V> {
    pub(crate) fn new() -> Self {
        Self { map: DashMap::new() }
    }

    pub(crate) fn get(&self, key: &K) -> Option<V> {
        self.map.get(key).map(|v| v.clone())
    }

    pub(crate) fn put(&self, key: K, value: V) {
        self.map.insert(key, value);
    }

    pub(crate) fn clear(&self) {
        self.map.clear();
    }
}
