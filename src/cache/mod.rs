//! Cache Module
//!
//! Persistent TTL cache for generated story text and illustrations.

mod entry;
mod expiry;
pub mod index;
mod key;
pub mod records;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CachedEntry, CachedImageEntry, CachedStoryEntry, ContentKind, StoryDraft};
pub use expiry::ExpiryPolicy;
pub use key::{normalize_topic, CacheKey, Fingerprint};
pub use stats::{format_size, CacheHealth, CacheStats, EntryTimestamp};
pub use store::ContentCache;

// == Public Constants ==
/// Story time-to-live in seconds (24 hours)
pub const STORY_TTL_SECS: i64 = 24 * 60 * 60;

/// Image time-to-live in seconds (7 days)
pub const IMAGE_TTL_SECS: i64 = 7 * 24 * 60 * 60;
