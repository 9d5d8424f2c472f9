//! Discriminated result type for cache reads and source fetches.
//!
//! This module replaces the "None means not found" sentinel with an
//! explicit discriminated result, eliminating the ambiguity between
//! "found a value that happens to be empty" and "not found". The same
//! type flows through the fetch callback and the tiered read path, so
//! callers always receive a deterministic, structured outcome.

use serde::{Deserialize, Serialize};

/// Outcome of a cache read or source fetch.
///
/// A miss is an expected, structured outcome - never an error. Callers
/// that wrap a fallible resource must translate its failures into
/// [`FetchResult::NotFound`] before handing results to the cache; the
/// cache itself never retries and never inspects the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchResult<V> {
    /// The value exists, in a cache tier or at the source.
    Found(V),
    /// The key does not exist anywhere.
    NotFound,
}

impl<V> FetchResult<V> {
    /// Create a found result carrying the given payload.
    pub fn found(data: V) -> Self {
        Self::Found(data)
    }

    /// Create a not-found result.
    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Returns true if a value was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns true if no value was found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Get a reference to the payload, if found.
    pub fn data(&self) -> Option<&V> {
        match self {
            Self::Found(data) => Some(data),
            Self::NotFound => None,
        }
    }

    /// Consume the result and return the payload, if found.
    pub fn into_data(self) -> Option<V> {
        match self {
            Self::Found(data) => Some(data),
            Self::NotFound => None,
        }
    }

    /// Map the payload to a new type, preserving the found/not-found state.
    pub fn map<U, F>(self, f: F) -> FetchResult<U>
    where
        F: FnOnce(V) -> U,
    {
        match self {
            Self::Found(data) => FetchResult::Found(f(data)),
            Self::NotFound => FetchResult::NotFound,
        }
    }
}

impl<V> From<Option<V>> for FetchResult<V> {
    fn from(opt: Option<V>) -> Self {
        match opt {
            Some(data) => Self::Found(data),
            None => Self::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_carries_payload() {
        let result = FetchResult::found("value".to_string());
        assert!(result.is_found());
        assert!(!result.is_not_found());
        assert_eq!(result.data(), Some(&"value".to_string()));
        assert_eq!(result.into_data(), Some("value".to_string()));
    }

    #[test]
    fn test_not_found_has_no_payload() {
        let result: FetchResult<String> = FetchResult::not_found();
        assert!(result.is_not_found());
        assert!(!result.is_found());
        assert_eq!(result.data(), None);
        assert_eq!(result.into_data(), None);
    }

    #[test]
    fn test_map_transforms_payload() {
        let result = FetchResult::found(42i32);
        let mapped = result.map(|v| v.to_string());
        assert_eq!(mapped, FetchResult::Found("42".to_string()));

        let miss: FetchResult<i32> = FetchResult::not_found();
        assert_eq!(miss.map(|v| v.to_string()), FetchResult::NotFound);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(FetchResult::from(Some(1)), FetchResult::Found(1));
        assert_eq!(FetchResult::<i32>::from(None), FetchResult::NotFound);
    }

    #[test]
    fn test_found_empty_payload_is_still_found() {
        // An empty value is distinct from not-found.
        let result = FetchResult::found(String::new());
        assert!(result.is_found());
    }

    #[test]
    fn test_serde_roundtrip() {
        let result = FetchResult::found("data".to_string());
        let json = serde_json::to_string(&result).expect("serialize");
        let back: FetchResult<String> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(result, back);
    }
}
