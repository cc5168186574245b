//! Memoizing path resolver.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::cache::{BoundedCache, CacheStats, DEFAULT_CACHE_SIZE};
use crate::error::Result;
use crate::resolve::path::{self, PathToken};
use crate::resolve::{ObjectId, ObjectRef, TypeKey, TypeRegistry, Value, ValueType};

type ValueCache = BoundedCache<(ObjectId, String), Option<Value>>;
type TypeCache = BoundedCache<(TypeKey, String), Option<ValueType>>;

// == Path Resolver ==
/// Resolves dotted member paths against row objects and their types.
///
/// Results are memoized per `(object identity, path)` and per
/// `(type, path)`, absent results included. A cached value is never
/// invalidated when the object changes: it stays until it is evicted, removed
/// with [`PathResolver::invalidate`], or dropped by [`PathResolver::clear`] or
/// [`PathResolver::set_cache_size`]. Rows with interior mutability can
/// therefore read stale values.
///
/// One resolver is meant to be shared by every grid in the process so they
/// all benefit from the same memoized results.
#[derive(Debug)]
pub struct PathResolver {
    registry: Arc<TypeRegistry>,
    values: RwLock<Arc<ValueCache>>,
    types: RwLock<Arc<TypeCache>>,
}

impl PathResolver {
    // == Constructor ==
    /// Creates a resolver whose caches each hold `cache_size` entries.
    pub fn new(registry: Arc<TypeRegistry>, cache_size: usize) -> Result<Self> {
        Ok(Self {
            registry,
            values: RwLock::new(Arc::new(BoundedCache::new(cache_size)?)),
            types: RwLock::new(Arc::new(BoundedCache::new(cache_size)?)),
        })
    }

    /// Resolver over `registry` with the default cache size.
    pub fn with_registry(registry: Arc<TypeRegistry>) -> Result<Self> {
        Self::new(registry, DEFAULT_CACHE_SIZE)
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    // == Resolve Value ==
    /// Resolves `path` against `owner`.
    ///
    /// Returns `None` for a missing owner, a blank or malformed path, an
    /// unknown member, an absent intermediate value, or an indexer argument
    /// that does not convert. Never panics on odd input.
    pub fn resolve_value(&self, owner: Option<&ObjectRef>, path: &str) -> Option<Value> {
        let owner = owner?;
        if path.trim().is_empty() {
            return None;
        }
        let cache = Arc::clone(&*self.values.read());
        cache.get_or_insert_with((owner.id(), path.to_string()), || {
            self.resolve_value_uncached(owner, path)
        })
    }

    /// Same as [`PathResolver::resolve_value`] without touching the cache.
    pub fn resolve_value_uncached(&self, owner: &ObjectRef, path: &str) -> Option<Value> {
        let tokens = path::parse(path)?;
        let mut current = Value::Object(owner.clone());
        for token in &tokens {
            current = self.step_value(&current, token)?;
            if current.is_null() {
                return None;
            }
        }
        Some(current)
    }

    fn step_value(&self, current: &Value, token: &PathToken) -> Option<Value> {
        match (current, token) {
            (Value::Object(object), PathToken::Member(name)) => self
                .registry
                .describe(&object.type_key())?
                .member_value(object, name),
            (Value::Object(object), PathToken::Index(raw)) => self
                .registry
                .describe(&object.type_key())?
                .index_value(object, raw),
            (Value::List(items), PathToken::Index(raw)) => {
                let index: usize = raw.trim().parse().ok()?;
                items.get(index).cloned()
            }
            _ => None,
        }
    }

    // == Resolve Type ==
    /// Resolves `path` at the type level, starting from `root`.
    ///
    /// Members of schemaless types resolve to [`ValueType::Dynamic`], and so
    /// does everything reached through them.
    pub fn resolve_type(&self, root: &TypeKey, path: &str) -> Option<ValueType> {
        if path.trim().is_empty() {
            return None;
        }
        let cache = Arc::clone(&*self.types.read());
        cache.get_or_insert_with((*root, path.to_string()), || {
            self.resolve_type_uncached(root, path)
        })
    }

    pub fn resolve_type_uncached(&self, root: &TypeKey, path: &str) -> Option<ValueType> {
        let tokens = path::parse(path)?;
        let mut current = ValueType::Object(*root);
        for token in &tokens {
            current = self.step_type(&current, token)?;
        }
        Some(current)
    }

    fn step_type(&self, current: &ValueType, token: &PathToken) -> Option<ValueType> {
        match (current, token) {
            (ValueType::Dynamic, _) => Some(ValueType::Dynamic),
            (ValueType::Object(key), PathToken::Member(name)) => {
                self.registry.describe(key)?.member_type(name)
            }
            (ValueType::Object(key), PathToken::Index(raw)) => {
                self.registry.describe(key)?.index_type(raw)
            }
            (ValueType::List(element), PathToken::Index(raw)) => {
                raw.trim().parse::<usize>().ok()?;
                Some((**element).clone())
            }
            _ => None,
        }
    }

    /// Whether a column at `path` under `root` can be sorted, judged from
    /// declared types alone.
    pub fn column_sortable(&self, root: &TypeKey, path: &str) -> bool {
        self.resolve_type(root, path)
            .is_some_and(|ty| self.registry.is_orderable(&ty))
    }

    // == Cache Management ==
    /// Replaces both caches with empty ones of the new capacity.
    ///
    /// Fails with `InvalidConfiguration` on zero, keeping the current caches.
    pub fn set_cache_size(&self, size: usize) -> Result<()> {
        let values = BoundedCache::new(size)?;
        let types = BoundedCache::new(size)?;
        *self.values.write() = Arc::new(values);
        *self.types.write() = Arc::new(types);
        info!(size, "resolver caches reinitialized");
        Ok(())
    }

    pub fn cache_size(&self) -> usize {
        self.values.read().capacity()
    }

    /// Drops the memoized value of one `(owner, path)` pair.
    pub fn invalidate(&self, owner: &ObjectRef, path: &str) {
        self.values.read().remove(&(owner.id(), path.to_string()));
    }

    pub fn clear(&self) {
        self.values.read().clear();
        self.types.read().clear();
    }

    pub fn value_cache_stats(&self) -> CacheStats {
        self.values.read().stats()
    }

    pub fn type_cache_stats(&self) -> CacheStats {
        self.types.read().stats()
    }
}
