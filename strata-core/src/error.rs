//! Error types for strata cache operations.
//!
//! Construction is the only fallible boundary: every runtime outcome of a
//! cache read is represented as a value (see [`crate::FetchResult`]), never
//! as an error. In particular, "key does not exist" is an expected result,
//! not a failure.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A store capacity below the minimum was supplied at construction.
    ///
    /// Capacity 0 is rejected rather than clamped or given "always evicts
    /// immediately" semantics, so misconfiguration cannot masquerade as a
    /// working cache.
    #[error("Cache capacity must be at least 1: got {got}")]
    CapacityTooSmall { got: usize },
}

/// Master error type for all strata cache errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for strata cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
