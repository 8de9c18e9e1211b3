//! Generation Module
//!
//! Contract of the external text/image generation service the story flow
//! falls back to on a cache miss.
//!
//! The service is slow and fallible and may answer with content that does
//! not match what was asked for; callers validate what comes back.

pub mod prompts;

use async_trait::async_trait;

use crate::error::GenerationError;

// == Requests ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    pub prompt: String,
    /// Model identifier, e.g. `gpt-4o-mini`
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    /// Pixel dimensions, e.g. `1024x1024`
    pub size: String,
    pub quality: String,
    /// Number of images requested
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
}

// == Generation Service ==
/// External AI generation backend.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate_text(&self, request: TextRequest) -> Result<String, GenerationError>;

    async fn generate_image(
        &self,
        request: ImageRequest,
    ) -> Result<Vec<GeneratedImage>, GenerationError>;
}

// == Generation Settings ==
/// Model and image parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    pub text_model: String,
    pub story_max_tokens: u32,
    pub quiz_max_tokens: u32,
    pub image_size: String,
    pub image_quality: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            text_model: "gpt-4o-mini".to_string(),
            story_max_tokens: 1200,
            quiz_max_tokens: 800,
            image_size: "1024x1024".to_string(),
            image_quality: "high".to_string(),
        }
    }
}
