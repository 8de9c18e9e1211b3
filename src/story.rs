//! Story Flow
//!
//! Produces one story for a reader: picks a topic, decides whether to reuse
//! cached content, falls back to the generation service and writes fresh
//! content back to the cache.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{error, info, warn};

use crate::cache::{ContentCache, ContentKind, Fingerprint, StoryDraft};
use crate::clock::{Clock, SystemClock};
use crate::error::GenerationError;
use crate::generation::prompts::{self, StoryFlavor, STORY_SETTINGS, STORY_VARIATIONS};
use crate::generation::{GenerationService, GenerationSettings, ImageRequest, TextRequest};
use crate::models::{fallback_quiz, parse_quiz, QuizQuestion, StoryOutcome, StoryRequest};
use crate::policy::CacheUsePolicy;
use crate::storage::KeyValueStore;

/// Built-in science topics stories are drawn from.
pub const SCIENCE_TOPICS: &[&str] = &[
    "Plants and How They Grow",
    "Amazing Animals and Their Homes",
    "Weather and Clouds",
    "The Solar System and Stars",
    "Ocean Life and Water Cycle",
    "Simple Machines and How They Work",
    "Butterflies and Their Life Cycle",
    "Rocks, Minerals and Fossils",
    "Light and Shadows",
    "Sound and Music",
    "Magnets and Their Magic",
    "Seasons and Why They Change",
];

/// How many of the most recent topics are skipped when picking a new one.
pub const RECENT_TOPIC_WINDOW: usize = 3;

// == Story Title ==
/// `"<name> and the <topic>"`, with the first `and` of the topic shortened to `&`.
pub fn story_title(character_name: &str, topic: &str) -> String {
    format!("{} and the {}", character_name, topic.replacen("and", "&", 1))
}

// == Story Generator ==
/// Runs the story flow against a content cache and a generation service.
///
/// Topic choice avoids recently read topics, but the cache key carries no
/// such variation: a reused topic can hit a story the reader just finished.
pub struct StoryGenerator<S, G, C = SystemClock, R = StdRng> {
    cache: ContentCache<S, C>,
    service: G,
    policy: CacheUsePolicy,
    settings: GenerationSettings,
    topics: Vec<String>,
    rng: R,
}

impl<S: KeyValueStore, G: GenerationService> StoryGenerator<S, G> {
    // == Constructor ==
    /// Creates a generator with default policy, settings and an entropy-seeded rng.
    pub fn new(cache: ContentCache<S>, service: G) -> Self {
        Self::with_rng(cache, service, StdRng::from_entropy())
    }
}

impl<S, G, C, R> StoryGenerator<S, G, C, R>
where
    S: KeyValueStore,
    G: GenerationService,
    C: Clock,
    R: Rng,
{
    /// Creates a generator drawing every random choice from `rng`.
    pub fn with_rng(cache: ContentCache<S, C>, service: G, rng: R) -> Self {
        Self {
            cache,
            service,
            policy: CacheUsePolicy::default(),
            settings: GenerationSettings::default(),
            topics: SCIENCE_TOPICS.iter().map(|t| t.to_string()).collect(),
            rng,
        }
    }

    pub fn with_policy(mut self, policy: CacheUsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replaces the topic pool; an empty pool keeps the current one.
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        if !topics.is_empty() {
            self.topics = topics;
        }
        self
    }

    pub fn cache(&self) -> &ContentCache<S, C> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ContentCache<S, C> {
        &mut self.cache
    }

    pub fn service(&self) -> &G {
        &self.service
    }

    // == Pick Topic ==
    /// Picks a random topic not among the last few in `recent`.
    ///
    /// Falls back to the whole pool when every topic was read recently.
    pub fn pick_topic(&mut self, recent: &[String]) -> String {
        let window = &recent[recent.len().saturating_sub(RECENT_TOPIC_WINDOW)..];
        let available: Vec<&String> = self.topics.iter().filter(|t| !window.contains(*t)).collect();

        let chosen = if available.is_empty() {
            self.topics.choose(&mut self.rng)
        } else {
            available.choose(&mut self.rng).copied()
        };

        // The pool is never empty
        chosen.cloned().unwrap_or_else(|| SCIENCE_TOPICS[0].to_string())
    }

    // == Generate ==
    /// Produces a story for `request`, reusing cached content when allowed.
    ///
    /// Never fails: if the request does not validate or story text cannot be
    /// generated, the outcome carries a placeholder story with no quiz and
    /// nothing is cached.
    pub async fn generate(&mut self, request: &StoryRequest) -> StoryOutcome {
        let topic = self.pick_topic(&request.recent_topics);
        let title = story_title(&request.character.name, &topic);

        if let Some(reason) = request.validate() {
            warn!("Rejecting story request: {}", reason);
            return placeholder_outcome(request, topic, title);
        }

        let fp = request.fingerprint(&topic);
        let cached_story = if self.policy.consult(ContentKind::Story, &mut self.rng) {
            self.cache.lookup_story(&fp)
        } else {
            None
        };
        let cached_image = if self.policy.consult(ContentKind::Image, &mut self.rng) {
            self.cache.lookup_image(&fp)
        } else {
            None
        };

        let (content, questions, story_from_cache) = match cached_story {
            Some(hit) => {
                info!("Using cached story for: {}", topic);
                (hit.story.content, hit.story.questions, true)
            }
            None => match self.fresh_story(request, &topic, &title, &fp).await {
                Ok((content, questions)) => (content, questions, false),
                Err(e) => {
                    error!("Error generating story for {}: {}", topic, e);
                    return placeholder_outcome(request, topic, title);
                }
            },
        };

        let (image_url, image_from_cache) = match cached_image {
            Some(hit) => {
                info!("Using cached image for: {}", topic);
                (Some(hit.url), true)
            }
            None => (self.fresh_image(&topic, &fp).await, false),
        };

        StoryOutcome {
            title,
            science_topic: topic,
            content,
            questions,
            image_url,
            story_from_cache,
            image_from_cache,
            fallback: false,
        }
    }

    async fn fresh_story(
        &mut self,
        request: &StoryRequest,
        topic: &str,
        title: &str,
        fp: &Fingerprint,
    ) -> Result<(String, Vec<QuizQuestion>), GenerationError> {
        info!("Generating new story for: {}", topic);

        let started = self.cache.clock().now().timestamp_millis();
        let unique_id = format!("{:x}{}", started, self.random_suffix(5));
        let flavor = StoryFlavor {
            variation: STORY_VARIATIONS.choose(&mut self.rng).copied().unwrap_or_default(),
            setting: STORY_SETTINGS.choose(&mut self.rng).copied().unwrap_or_default(),
            unique_id: &unique_id,
        };

        let content = self
            .service
            .generate_text(TextRequest {
                prompt: prompts::story_prompt(request, topic, flavor),
                model: self.settings.text_model.clone(),
                max_tokens: self.settings.story_max_tokens,
            })
            .await?;
        if content.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let quiz = self
            .service
            .generate_text(TextRequest {
                prompt: prompts::quiz_prompt(request, topic, &content),
                model: self.settings.text_model.clone(),
                max_tokens: self.settings.quiz_max_tokens,
            })
            .await;
        let questions = match quiz {
            Ok(text) => parse_quiz(&text),
            Err(e) => {
                warn!("Quiz generation failed for {}: {}", topic, e);
                None
            }
        }
        .unwrap_or_else(|| {
            warn!("Using fallback quiz for: {}", topic);
            fallback_quiz(&request.character.name, topic)
        });

        // Stamped at write time, after both generation calls
        let created_at = self.cache.clock().now();
        let story = StoryDraft {
            id: format!("story_{}_{}", created_at.timestamp_millis(), self.random_suffix(9)),
            title: title.to_string(),
            content: content.clone(),
            science_topic: topic.to_string(),
            story_number: request.story_number,
            questions: questions.clone(),
            created_at,
        };
        self.cache.store_story(fp, story);

        Ok((content, questions))
    }

    async fn fresh_image(&mut self, topic: &str, fp: &Fingerprint) -> Option<String> {
        info!("Generating new image for: {}", topic);

        let prompt = prompts::image_prompt(topic);
        let result = self
            .service
            .generate_image(ImageRequest {
                prompt: prompt.clone(),
                size: self.settings.image_size.clone(),
                quality: self.settings.image_quality.clone(),
                count: 1,
            })
            .await;

        match result {
            Ok(images) => {
                let url = images.into_iter().map(|i| i.url).find(|u| !u.is_empty())?;
                self.cache.store_image(fp, url.clone(), prompt);
                Some(url)
            }
            Err(e) => {
                warn!("Error generating mood image for {}: {}", topic, e);
                None
            }
        }
    }

    fn random_suffix(&mut self, len: usize) -> String {
        (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(len)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect()
    }
}

fn placeholder_outcome(request: &StoryRequest, topic: String, title: String) -> StoryOutcome {
    let name = &request.character.name;
    let content = format!(
        "Once upon a time, {name} discovered something amazing about {topic}! \
         This is where an exciting adventure would unfold, teaching us wonderful things about science and nature. \
         The story would be perfectly crafted for a {age}-year-old {gender} who loves to learn and explore!",
        age = request.age,
        gender = request.gender,
    );

    StoryOutcome {
        title,
        science_topic: topic,
        content,
        questions: Vec::new(),
        image_url: None,
        story_from_cache: false,
        image_from_cache: false,
        fallback: true,
    }
}
