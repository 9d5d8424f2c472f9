//! Strata Cache - Bounded LRU store and two-tier read-through cache.
//!
//! This crate shields a slow data source (for example a database) behind
//! two bounded, recency-ordered caches:
//!
//! - [`LruStore`]: a fixed-capacity key/value container with strict
//!   least-recently-used ordering and O(1) get/put/evict.
//! - [`TieredCache`]: composes two `LruStore` instances (a small, hot L1
//!   in front of a larger L2) and implements the read-through, promotion,
//!   and backfill policy.
//!
//! # Read path
//!
//! [`TieredCache::get_or_fetch`] checks L1, then L2 (promoting a hit into
//! L1), then invokes the caller-supplied [`Fetcher`] exactly once. A
//! successful fetch backfills L2 first, then L1, so L2 always reflects
//! data before L1 does.
//!
//! # Execution model
//!
//! Single-threaded and synchronous: operations run to completion and the
//! fetcher is invoked inline. Any I/O latency lives entirely inside the
//! fetcher, which the cache treats as an opaque synchronous function.
//!
//! # Example
//!
//! ```
//! use strata_cache::{Fetcher, TieredCache, TieredConfig};
//! use strata_core::FetchResult;
//!
//! let config = TieredConfig::new(2, 3);
//! let mut cache: TieredCache<String> = TieredCache::new(config).unwrap();
//!
//! let mut fetch = |key: &str| {
//!     if key == "user:1" {
//!         FetchResult::found("alice".to_string())
//!     } else {
//!         FetchResult::not_found()
//!     }
//! };
//!
//! let result = cache.get_or_fetch("user:1", &mut fetch);
//! assert_eq!(result.into_data().as_deref(), Some("alice"));
//!
//! let miss = cache.get_or_fetch("user:404", &mut fetch);
//! assert!(miss.is_not_found());
//! ```

pub mod lru;
pub mod tiered;

pub use lru::{CacheCounters, LruStore};
pub use tiered::{Fetcher, TierCounters, TierStats, TieredCache, TieredConfig};
