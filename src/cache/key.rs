//! Cache Key Module
//!
//! Derives the deterministic key a request is cached under.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between fingerprint components.
const KEY_SEPARATOR: char = '_';

// == Fingerprint ==
/// The request attributes a cached entry is keyed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub owner: String,
    pub character: String,
    pub age: u32,
    pub topic: String,
}

impl Fingerprint {
    pub fn new(
        owner: impl Into<String>,
        character: impl Into<String>,
        age: u32,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            character: character.into(),
            age,
            topic: topic.into(),
        }
    }

    pub fn key(&self) -> CacheKey {
        CacheKey::derive(&self.owner, &self.character, self.age, &self.topic)
    }
}

// == Cache Key ==
/// Deterministic key for one (owner, character, age, topic) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    // == Derive ==
    /// Builds `owner_character_age_topic` with the topic normalized.
    ///
    /// Pure: identical arguments always yield an identical key.
    pub fn derive(owner: &str, character: &str, age: u32, topic: &str) -> Self {
        let topic = normalize_topic(topic);
        Self(format!(
            "{owner}{sep}{character}{sep}{age}{sep}{topic}",
            sep = KEY_SEPARATOR
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CacheKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

// == Topic Normalization ==
/// Collapses each whitespace run to one underscore and lower-cases.
///
/// Leading and trailing runs are collapsed too, not trimmed.
pub fn normalize_topic(topic: &str) -> String {
    let mut out = String::with_capacity(topic.len());
    let mut in_space = false;

    for ch in topic.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(KEY_SEPARATOR);
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }

    out.to_lowercase()
}
