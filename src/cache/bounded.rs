//! Bounded Cache Module
//!
//! Thread-safe key/value cache with a fixed capacity and LRU eviction.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{GridError, Result};

// == Bounded Cache ==
/// A capacity-bounded LRU cache safe to share between threads.
///
/// Every operation, including hit refreshes, runs under one mutex per
/// instance, so `len() <= capacity()` holds whenever the lock is released.
///
/// `set_capacity` takes the same lock as everything else, but callers that
/// shrink a cache while other threads are reading and writing must still
/// serialize the resize themselves if they need a consistent view across
/// several calls.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    inner: Mutex<Inner<K, V>>,
}

#[derive(Debug)]
struct Inner<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Access-order index
    lru: LruTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> Inner<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    /// Evicts least recently used entries until at most `limit` remain.
    fn evict_to(&mut self, limit: usize) -> usize {
        let mut evicted = 0;
        while self.entries.len() > limit {
            let Some(key) = self.lru.evict_oldest() else {
                break;
            };
            self.entries.remove(&key);
            self.stats.record_eviction();
            evicted += 1;
        }
        evicted
    }
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Ord + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Fails with `InvalidConfiguration` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                stats: CacheStats::new(capacity),
                capacity,
            }),
        })
    }

    // == Try Get ==
    /// Looks up a key, marking it most recently used on a hit.
    pub fn try_get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let Inner {
            entries, lru, stats, ..
        } = &mut *inner;

        match entries.get_mut(key) {
            Some(entry) => {
                let tick = lru.touch(key, Some(entry.last_access));
                entry.touch(tick);
                stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                stats.record_miss();
                None
            }
        }
    }

    // == Get Or Insert ==
    /// Returns the stored value for `key`, inserting `value` if absent.
    ///
    /// An existing entry wins: `value` is discarded and the entry is only
    /// refreshed. A new entry at capacity first evicts the least recently
    /// used one.
    pub fn get_or_insert(&self, key: K, value: V) -> V {
        let mut inner = self.inner.lock();
        let Inner { entries, lru, .. } = &mut *inner;

        if let Some(entry) = entries.get_mut(&key) {
            let tick = lru.touch(&key, Some(entry.last_access));
            entry.touch(tick);
            return entry.value.clone();
        }

        let limit = inner.capacity - 1;
        if inner.entries.len() > limit {
            let evicted = inner.evict_to(limit);
            debug!(evicted, "cache at capacity, evicted least recently used");
        }

        let tick = inner.lru.touch(&key, None);
        inner.entries.insert(key, CacheEntry::new(value.clone(), tick));
        inner.stats.record_insertion();
        value
    }

    // == Get Or Insert With ==
    /// Read-through lookup: computes the value outside the lock on a miss.
    ///
    /// If another thread stores the key first, its value is returned and the
    /// computed one is dropped.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.try_get(&key) {
            return value;
        }
        let value = compute();
        self.get_or_insert(key, value)
    }

    // == Remove ==
    /// Removes an entry, returning its value if it was present.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let entry = inner.entries.remove(key)?;
        inner.lru.remove(key, entry.last_access);
        Some(entry.value)
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.lru.clear();
    }

    // == Set Capacity ==
    /// Changes the capacity, evicting oldest entries until the cache fits.
    ///
    /// Fails with `InvalidConfiguration` when `capacity` is zero, leaving the
    /// previous capacity in place.
    pub fn set_capacity(&self, capacity: usize) -> Result<()> {
        validate_capacity(capacity)?;
        let mut inner = self.inner.lock();
        inner.capacity = capacity;
        inner.stats.capacity = capacity;
        let evicted = inner.evict_to(capacity);
        debug!(capacity, evicted, "cache capacity changed");
        Ok(())
    }

    // == Contains ==
    /// Checks for a key without touching its recency.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    // == Snapshot ==
    /// Copies out all entries, least recently used first.
    ///
    /// The result does not follow later mutations of the cache.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        let inner = self.inner.lock();
        inner
            .lru
            .iter()
            .filter_map(|key| {
                inner
                    .entries
                    .get(key)
                    .map(|entry| (key.clone(), entry.value.clone()))
            })
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats;
        stats.total_entries = inner.entries.len();
        stats
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}

fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(GridError::InvalidConfiguration(
            "cache capacity must be positive".to_string(),
        ));
    }
    Ok(())
}
