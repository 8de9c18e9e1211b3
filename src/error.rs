//! Error types for the content cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::cache::CacheKey;

// == Store Error Enum ==
/// Failure raised by a persistent key-value backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Writing the value would exceed the backend's storage quota
    #[error("Storage quota exceeded writing '{key}' (limit {limit} bytes)")]
    QuotaExceeded { key: String, limit: usize },

    /// Backing file could not be read or written
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file exists but does not hold a valid document
    #[error("Storage corrupt: {0}")]
    Corrupt(String),
}

// == Cache Error Enum ==
/// Unified error type for cache-internal operations.
///
/// None of these escape the public [`ContentCache`](crate::cache::ContentCache)
/// operations; they are logged and degraded to a miss or a no-op.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Underlying store raised
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Stored record is not valid JSON for its kind
    #[error("Failed to parse record '{key}': {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored record carries a different cache key than it is stored under
    #[error("Record '{key}' belongs to key '{found}'")]
    KeyMismatch { key: String, found: CacheKey },

    /// Entry could not be serialized
    #[error("Failed to serialize entry: {0}")]
    Serialize(#[source] serde_json::Error),
}

// == Generation Error Enum ==
/// Failure reported by the external text/image generation service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Service rejected or failed the request
    #[error("Generation service error: {0}")]
    Service(String),

    /// Service answered without any usable content
    #[error("Generation service returned an empty response")]
    EmptyResponse,

    /// Service did not answer in time
    #[error("Generation service timed out")]
    Timeout,
}

// == Result Type Alias ==
/// Convenience Result type for cache-internal operations.
pub type Result<T> = std::result::Result<T, CacheError>;
