//! Cache-use decision made at the call site before a lookup.
//!
//! Stories are only looked up some of the time so repeat visits to a topic
//! still get fresh text; images are always looked up.

use rand::Rng;

use crate::cache::ContentKind;

/// Default probability that a story request consults the cache.
pub const DEFAULT_STORY_CACHE_PROBABILITY: f64 = 0.3;

// == Should Consult Cache ==
/// Draws once from `rng`; true with the given probability.
///
/// A probability of 0 never consults, 1 always does.
pub fn should_consult_cache<R: Rng + ?Sized>(probability: f64, rng: &mut R) -> bool {
    rng.gen::<f64>() < probability
}

// == Cache Use Policy ==
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheUsePolicy {
    pub story_probability: f64,
}

impl Default for CacheUsePolicy {
    fn default() -> Self {
        Self {
            story_probability: DEFAULT_STORY_CACHE_PROBABILITY,
        }
    }
}

impl CacheUsePolicy {
    pub fn new(story_probability: f64) -> Self {
        Self {
            story_probability: story_probability.clamp(0.0, 1.0),
        }
    }

    /// Whether a request for `kind` should look in the cache.
    ///
    /// Only story requests consume a random draw.
    pub fn consult<R: Rng + ?Sized>(&self, kind: ContentKind, rng: &mut R) -> bool {
        match kind {
            ContentKind::Story => should_consult_cache(self.story_probability, rng),
            ContentKind::Image => true,
        }
    }
}
