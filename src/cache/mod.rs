//! Cache Module
//!
//! Bounded, thread-safe LRU caching used to memoize path resolution.

mod bounded;
mod entry;
mod lru;
mod stats;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;

// == Public Constants ==
/// Default capacity of the resolver's value and type caches
pub const DEFAULT_CACHE_SIZE: usize = 25_000;
