//! Story outcome model

use serde::Serialize;

use crate::models::QuizQuestion;

// == Story Outcome ==
/// Result of one pass through the story flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryOutcome {
    pub title: String,
    pub science_topic: String,
    /// Story text, or a placeholder when generation failed
    pub content: String,
    pub questions: Vec<QuizQuestion>,
    pub image_url: Option<String>,
    /// Text came from the cache
    pub story_from_cache: bool,
    /// Illustration came from the cache
    pub image_from_cache: bool,
    /// Generation failed and `content` is the placeholder story
    pub fallback: bool,
}

impl StoryOutcome {
    /// Label shown when any part was served from the cache.
    pub fn cache_badge(&self) -> Option<&'static str> {
        match (self.story_from_cache, self.image_from_cache) {
            (true, true) => Some("Instant Load"),
            (true, false) => Some("Story Cached"),
            (false, true) => Some("Image Cached"),
            (false, false) => None,
        }
    }
}
