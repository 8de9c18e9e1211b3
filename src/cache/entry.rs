//! Cache Entry Module
//!
//! Defines the cached story and image records and the content kinds that
//! namespace them in the store.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;
use crate::models::QuizQuestion;

// == Content Kind ==
/// Namespace a cached record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Story,
    Image,
}

impl ContentKind {
    pub const ALL: [ContentKind; 2] = [ContentKind::Story, ContentKind::Image];

    /// Storage-key prefix for records of this kind.
    pub fn record_prefix(self) -> &'static str {
        match self {
            ContentKind::Story => "story_cache_",
            ContentKind::Image => "image_cache_",
        }
    }

    /// Storage key of this kind's index list.
    pub fn index_key(self) -> &'static str {
        match self {
            ContentKind::Story => "story_cache_list",
            ContentKind::Image => "image_cache_list",
        }
    }

    /// Storage key of the record cached under `key`.
    pub fn record_key(self, key: &CacheKey) -> String {
        format!("{}{}", self.record_prefix(), key)
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Story => "story",
            ContentKind::Image => "image",
        }
    }
}

// == Cached Entry ==
/// A record the entry store can persist under a content kind.
pub trait CachedEntry: Serialize + DeserializeOwned {
    const KIND: ContentKind;

    fn created_at(&self) -> DateTime<Utc>;

    fn cache_key(&self) -> &CacheKey;
}

// == Story Draft ==
/// A generated story as handed to the cache, before it is keyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDraft {
    pub id: String,
    pub title: String,
    /// Full story text
    pub content: String,
    pub science_topic: String,
    pub story_number: u32,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
}

// == Cached Story Entry ==
/// A story record as stored, carrying the key it was stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedStoryEntry {
    #[serde(flatten)]
    pub story: StoryDraft,
    pub cache_key: CacheKey,
}

impl CachedStoryEntry {
    pub fn new(story: StoryDraft, cache_key: CacheKey) -> Self {
        Self { story, cache_key }
    }
}

impl CachedEntry for CachedStoryEntry {
    const KIND: ContentKind = ContentKind::Story;

    fn created_at(&self) -> DateTime<Utc> {
        self.story.created_at
    }

    fn cache_key(&self) -> &CacheKey {
        &self.cache_key
    }
}

// == Cached Image Entry ==
/// A generated illustration as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedImageEntry {
    pub url: String,
    /// Prompt the image was generated from
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub cache_key: CacheKey,
}

impl CachedEntry for CachedImageEntry {
    const KIND: ContentKind = ContentKind::Image;

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn cache_key(&self) -> &CacheKey {
        &self.cache_key
    }
}
