//! Story Cache - persistent content cache for a children's story app
//!
//! Caches AI-generated story text and illustrations per reader, character,
//! age and topic, with per-kind TTL expiry and a probabilistic gate that
//! keeps story text fresh.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod policy;
pub mod storage;
pub mod story;
pub mod telemetry;

pub use cache::{CacheStats, ContentCache, Fingerprint};
pub use config::Config;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use story::StoryGenerator;
