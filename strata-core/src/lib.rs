//! Strata Core - Data Types
//!
//! Pure data structures shared by the strata cache crates. This crate
//! contains ONLY data types and errors - no caching logic.

pub mod error;
pub mod fetch;

pub use error::{CacheError, CacheResult, ConfigError};
pub use fetch::FetchResult;

/// Cache key: an immutable string identifier.
///
/// A store holds at most one entry per key. The cache never interprets
/// key contents beyond equality and hashing.
pub type CacheKey = String;
