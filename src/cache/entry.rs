//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with recency metadata.

// == Cache Entry ==
/// A stored value together with its last-access tick.
///
/// Ticks come from the owning cache's logical clock, so they are strictly
/// monotonic per cache instance. Entries are never mutated after insertion
/// apart from their access tick.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Tick of the last insert or hit
    pub last_access: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the given tick.
    pub fn new(value: V, tick: u64) -> Self {
        Self {
            value,
            last_access: tick,
        }
    }

    // == Touch ==
    /// Records an access and returns the previous tick.
    pub fn touch(&mut self, tick: u64) -> u64 {
        std::mem::replace(&mut self.last_access, tick)
    }
}
