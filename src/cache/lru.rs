//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::BTreeSet;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys are indexed by `(tick, key)` where the tick comes from a logical clock
/// owned by the tracker:
/// - Smallest tick = Least recently used
/// - Largest tick = Most recently used
///
/// Equal ticks cannot occur within one tracker, and if they did the key
/// ordering would break the tie, so eviction order is reproducible.
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Keys ordered by last access
    order: BTreeSet<(u64, K)>,
    /// Logical clock, advanced on every touch
    clock: u64,
}

impl<K: Ord + Clone> Default for LruTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: BTreeSet::new(),
            clock: 0,
        }
    }

    // == Touch ==
    /// Marks a key as most recently used and returns its new tick.
    ///
    /// `previous` is the tick the key was last touched with, if it is
    /// already tracked.
    pub fn touch(&mut self, key: &K, previous: Option<u64>) -> u64 {
        if let Some(tick) = previous {
            self.order.remove(&(tick, key.clone()));
        }
        self.clock += 1;
        self.order.insert((self.clock, key.clone()));
        self.clock
    }

    // == Remove ==
    /// Removes a key tracked at `tick`.
    pub fn remove(&mut self, key: &K, tick: u64) {
        self.order.remove(&(tick, key.clone()));
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.first().map(|(_, key)| key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Iterate ==
    /// Keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter().map(|(_, key)| key)
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
