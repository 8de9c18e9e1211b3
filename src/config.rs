//! Configuration Module
//!
//! Handles loading cache and generation settings from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;

use crate::cache::{ContentCache, ExpiryPolicy, IMAGE_TTL_SECS, STORY_TTL_SECS};
use crate::error::StoreError;
use crate::generation::GenerationSettings;
use crate::policy::{CacheUsePolicy, DEFAULT_STORY_CACHE_PROBABILITY};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Content cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Story time-to-live in seconds
    pub story_ttl: i64,
    /// Image time-to-live in seconds
    pub image_ttl: i64,
    /// Probability that a story request consults the cache
    pub story_cache_probability: f64,
    /// Backing file for the persistent store; None keeps the cache in memory
    pub store_path: Option<PathBuf>,
    /// Generation service parameters
    pub generation: GenerationSettings,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORY_CACHE_TTL_SECS` - Story TTL in seconds (default: 86400)
    /// - `IMAGE_CACHE_TTL_SECS` - Image TTL in seconds (default: 604800)
    /// - `STORY_CACHE_PROBABILITY` - Chance a story request uses the cache (default: 0.3)
    /// - `CACHE_STORE_PATH` - Path of the persistent store file (default: unset)
    /// - `STORY_TEXT_MODEL` - Text model id (default: gpt-4o-mini)
    /// - `STORY_MAX_TOKENS` / `QUIZ_MAX_TOKENS` - Token limits (default: 1200 / 800)
    /// - `IMAGE_SIZE` / `IMAGE_QUALITY` - Image parameters (default: 1024x1024 / high)
    ///
    /// TTLs that are not positive or do not fit a duration fall back to
    /// their defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source, `lookup` returning the raw
    /// value of a variable if set.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = GenerationSettings::default();

        Self {
            story_ttl: parse_ttl(lookup("STORY_CACHE_TTL_SECS")).unwrap_or(STORY_TTL_SECS),
            image_ttl: parse_ttl(lookup("IMAGE_CACHE_TTL_SECS")).unwrap_or(IMAGE_TTL_SECS),
            story_cache_probability: parse_var::<f64>(&lookup, "STORY_CACHE_PROBABILITY")
                .filter(|p| p.is_finite())
                .map(|p| p.clamp(0.0, 1.0))
                .unwrap_or(DEFAULT_STORY_CACHE_PROBABILITY),
            store_path: lookup("CACHE_STORE_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            generation: GenerationSettings {
                text_model: lookup("STORY_TEXT_MODEL").unwrap_or(defaults.text_model),
                story_max_tokens: parse_var(&lookup, "STORY_MAX_TOKENS")
                    .unwrap_or(defaults.story_max_tokens),
                quiz_max_tokens: parse_var(&lookup, "QUIZ_MAX_TOKENS")
                    .unwrap_or(defaults.quiz_max_tokens),
                image_size: lookup("IMAGE_SIZE").unwrap_or(defaults.image_size),
                image_quality: lookup("IMAGE_QUALITY").unwrap_or(defaults.image_quality),
            },
        }
    }

    /// TTLs as durations; an unusable TTL maps to its kind's default.
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        let defaults = ExpiryPolicy::default();
        ExpiryPolicy {
            story_max_age: ttl_duration(self.story_ttl).unwrap_or(defaults.story_max_age),
            image_max_age: ttl_duration(self.image_ttl).unwrap_or(defaults.image_max_age),
        }
    }

    pub fn cache_use_policy(&self) -> CacheUsePolicy {
        CacheUsePolicy::new(self.story_cache_probability)
    }

    /// Opens the configured store: a [`FileStore`] when `store_path` is set,
    /// otherwise an empty [`MemoryStore`].
    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let store: Box<dyn KeyValueStore> = match &self.store_path {
            Some(path) => Box::new(FileStore::open(path)?),
            None => Box::new(MemoryStore::new()),
        };
        Ok(store)
    }

    /// Opens the configured store and wraps it in a cache using the
    /// configured TTLs.
    pub fn open_cache(&self) -> Result<ContentCache<Box<dyn KeyValueStore>>, StoreError> {
        Ok(ContentCache::new(self.open_store()?).with_policy(self.expiry_policy()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            story_ttl: STORY_TTL_SECS,
            image_ttl: IMAGE_TTL_SECS,
            story_cache_probability: DEFAULT_STORY_CACHE_PROBABILITY,
            store_path: None,
            generation: GenerationSettings::default(),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse().ok())
}

fn parse_ttl(raw: Option<String>) -> Option<i64> {
    let secs = raw?.trim().parse().ok()?;
    ttl_duration(secs).map(|_| secs)
}

/// Positive durations only; `None` past chrono's range.
fn ttl_duration(secs: i64) -> Option<Duration> {
    Duration::try_seconds(secs).filter(|d| *d > Duration::zero())
}
