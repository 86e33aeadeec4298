//! Fallback cache for entity lists.
//!
//! The last list successfully fetched for a kind and filter is kept so that a
//! later transport failure can degrade to it instead of an empty list.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use propledger_shared::config::CacheConfig;
use serde_json::Value;

/// Default cache capacity (number of lists).
const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Default time-to-live for a cached list (15 minutes).
const DEFAULT_TTL_SECS: u64 = 900;

/// Cached, already-normalized list items.
pub type CachedItems = Arc<Vec<Value>>;

/// Store of last-known entity lists.
pub trait FallbackCache: Send + Sync {
    /// Last list stored under `key`, unless expired.
    fn get(&self, key: &str) -> Option<CachedItems>;

    /// Stores a list under `key`.
    fn set(&self, key: &str, items: CachedItems);

    /// Drops every list.
    fn clear(&self);
}

/// In-memory cache with a capacity bound and a time-to-live.
///
/// Thread-safe and cheap to clone; clones share entries.
#[derive(Clone)]
pub struct MokaFallbackCache {
    cache: Cache<String, CachedItems>,
}

impl MokaFallbackCache {
    /// Creates a cache with default settings.
    ///
    /// Default: 64 lists max, 15 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of lists to keep
    /// * `ttl_secs` - Time-to-live in seconds for each list
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Number of cached lists.
    ///
    /// Call [`Self::run_pending_tasks`] first for an accurate count.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending maintenance tasks (evictions, counters).
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for MokaFallbackCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackCache for MokaFallbackCache {
    fn get(&self, key: &str) -> Option<CachedItems> {
        self.cache.get(key)
    }

    fn set(&self, key: &str, items: CachedItems) {
        self.cache.insert(key.to_string(), items);
    }

    fn clear(&self) {
        self.cache.invalidate_all();
    }
}

/// Cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl FallbackCache for NoopCache {
    fn get(&self, _key: &str) -> Option<CachedItems> {
        None
    }

    fn set(&self, _key: &str, _items: CachedItems) {}

    fn clear(&self) {}
}

/// Builds the cache described by configuration.
#[must_use]
pub fn from_config(config: &CacheConfig) -> Arc<dyn FallbackCache> {
    if config.enabled {
        Arc::new(MokaFallbackCache::with_config(
            config.max_capacity,
            config.ttl_secs,
        ))
    } else {
        Arc::new(NoopCache)
    }
}
