//! Two-tier read-through cache.
//!
//! [`TieredCache`] composes two [`LruStore`] instances: a small, hot L1 in
//! front of a larger L2. Reads go through [`TieredCache::get_or_fetch`],
//! which consults L1, then L2 (promoting a hit into L1), then the
//! caller-supplied [`Fetcher`]. A successful fetch backfills L2 before L1,
//! so L2 always reflects data before L1 does.
//!
//! The tiers store value copies, never shared references: promotion and
//! backfill clone the payload into each store, and eviction in one tier
//! never disturbs the other.

use serde::{Deserialize, Serialize};
use strata_core::{CacheKey, CacheResult, ConfigError, FetchResult};
use tracing::{debug, trace};

use crate::lru::{CacheCounters, LruStore};

/// Configuration for a two-tier cache.
///
/// Both capacities are fixed once the cache is constructed. L1 is
/// conventionally the smaller, hotter tier, but the capacities are
/// independent and nothing enforces a ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredConfig {
    /// Maximum number of entries in the fast tier.
    pub l1_capacity: usize,
    /// Maximum number of entries in the large tier.
    pub l2_capacity: usize,
}

impl Default for TieredConfig {
    fn default() -> Self {
        Self {
            l1_capacity: 64,
            l2_capacity: 256,
        }
    }
}

impl TieredConfig {
    /// Create a config with the given tier capacities.
    pub fn new(l1_capacity: usize, l2_capacity: usize) -> Self {
        Self {
            l1_capacity,
            l2_capacity,
        }
    }

    /// Set the L1 capacity.
    pub fn with_l1_capacity(mut self, capacity: usize) -> Self {
        self.l1_capacity = capacity;
        self
    }

    /// Set the L2 capacity.
    pub fn with_l2_capacity(mut self, capacity: usize) -> Self {
        self.l2_capacity = capacity;
        self
    }

    /// Check that both capacities are valid (at least 1 each).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for capacity in [self.l1_capacity, self.l2_capacity] {
            if capacity == 0 {
                return Err(ConfigError::CapacityTooSmall { got: capacity });
            }
        }
        Ok(())
    }
}

/// Source fetcher for retrieving values on a full cache miss.
///
/// Implementations must be synchronous and must never fail: any
/// exceptional condition at the underlying resource has to be translated
/// into [`FetchResult::NotFound`] before it reaches the cache. The cache
/// performs no retries and treats the payload as opaque.
///
/// A blanket impl covers plain closures, so `&mut |key: &str| ...` works
/// directly as a fetcher.
pub trait Fetcher<V> {
    /// Fetch a value from the source by key.
    fn fetch(&mut self, key: &str) -> FetchResult<V>;
}

impl<V, F> Fetcher<V> for F
where
    F: FnMut(&str) -> FetchResult<V>,
{
    fn fetch(&mut self, key: &str) -> FetchResult<V> {
        self(key)
    }
}

/// Snapshot of current tier membership for debugging and display.
///
/// Each sequence lists keys in least- to most-recently used order, the
/// same order [`LruStore::keys_by_recency`] uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierStats {
    /// Keys currently present in L1.
    pub l1_keys: Vec<CacheKey>,
    /// Keys currently present in L2.
    pub l2_keys: Vec<CacheKey>,
}

/// Per-tier observability counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounters {
    /// Counters for the fast tier.
    pub l1: CacheCounters,
    /// Counters for the large tier.
    pub l2: CacheCounters,
}

/// Two-tier read-through cache over a slow data source.
///
/// Both stores are private to the cache; there is no external aliasing,
/// and the documented contract is single-threaded.
///
/// # Key lifecycle
///
/// With respect to one cache instance a key is always in exactly one of
/// four states: absent from both tiers, present in L2 only, present in
/// both, or present in L1 only (after L2 evicted it independently). The
/// only transition that removes a key is LRU eviction inside a store.
pub struct TieredCache<V> {
    l1: LruStore<V>,
    l2: LruStore<V>,
}

impl<V> std::fmt::Debug for TieredCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredCache")
            .field("l1", &self.l1)
            .field("l2", &self.l2)
            .finish()
    }
}

impl<V: Clone> TieredCache<V> {
    /// Create a cache with the given tier configuration.
    ///
    /// Both capacities are validated before either store is constructed;
    /// a zero capacity on either tier is a [`ConfigError`].
    pub fn new(config: TieredConfig) -> CacheResult<Self> {
        config.validate()?;
        Ok(Self {
            l1: LruStore::new(config.l1_capacity)?,
            l2: LruStore::new(config.l2_capacity)?,
        })
    }

    /// L1 capacity, fixed at construction.
    pub fn l1_capacity(&self) -> usize {
        self.l1.capacity()
    }

    /// L2 capacity, fixed at construction.
    pub fn l2_capacity(&self) -> usize {
        self.l2.capacity()
    }

    /// Read through the tiers, falling back to the fetcher on a full miss.
    ///
    /// Lookup order:
    ///
    /// 1. L1 hit: return the value. The only path touching a single store.
    /// 2. L2 hit: copy the value into L1 (promotion - may evict from L1,
    ///    never from L2) and return it.
    /// 3. Invoke the fetcher exactly once. On `Found`, write the value to
    ///    L2 first, then L1 (backfill from the source of truth downward),
    ///    and return it. On `NotFound`, return `NotFound` with no mutation
    ///    to either store.
    ///
    /// Every hit bumps the touched key to most-recently used in the store
    /// that served it.
    pub fn get_or_fetch<F>(&mut self, key: &str, fetcher: &mut F) -> FetchResult<V>
    where
        F: Fetcher<V>,
    {
        if let Some(value) = self.l1.get(key) {
            trace!(key, tier = "l1", "cache hit");
            return FetchResult::found(value.clone());
        }

        if let Some(value) = self.l2.get(key) {
            let value = value.clone();
            trace!(key, tier = "l2", "cache hit, promoting to l1");
            if let Some((evicted, _)) = self.l1.put(key, value.clone()) {
                debug!(key = %evicted, tier = "l1", "evicted during promotion");
            }
            return FetchResult::found(value);
        }

        match fetcher.fetch(key) {
            FetchResult::Found(value) => {
                trace!(key, "source hit, backfilling l2 then l1");
                if let Some((evicted, _)) = self.l2.put(key, value.clone()) {
                    debug!(key = %evicted, tier = "l2", "evicted during backfill");
                }
                if let Some((evicted, _)) = self.l1.put(key, value.clone()) {
                    debug!(key = %evicted, tier = "l1", "evicted during backfill");
                }
                FetchResult::found(value)
            }
            FetchResult::NotFound => {
                trace!(key, "miss in both tiers and at source");
                FetchResult::not_found()
            }
        }
    }

    /// Write a value directly into L1, bypassing L2.
    ///
    /// Manual writes are assumed hot and do not warm L2; this asymmetry
    /// with the backfill path is intentional.
    pub fn put(&mut self, key: &str, value: V) {
        if let Some((evicted, _)) = self.l1.put(key, value) {
            debug!(key = %evicted, tier = "l1", "evicted on direct write");
        }
    }

    /// Current key membership of both tiers, without mutating recency.
    pub fn stats(&self) -> TierStats {
        TierStats {
            l1_keys: self.l1.keys_by_recency(),
            l2_keys: self.l2.keys_by_recency(),
        }
    }

    /// Snapshot of per-tier observability counters.
    pub fn counters(&self) -> TierCounters {
        TierCounters {
            l1: self.l1.counters().clone(),
            l2: self.l2.counters().clone(),
        }
    }
}
