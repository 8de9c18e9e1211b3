//! Expiry Policy Module
//!
//! Per-kind time-to-live evaluation.

use chrono::{DateTime, Duration, Utc};

use crate::cache::{ContentKind, IMAGE_TTL_SECS, STORY_TTL_SECS};

// == Expiry Policy ==
/// Maximum age per content kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub story_max_age: Duration,
    pub image_max_age: Duration,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            story_max_age: Duration::seconds(STORY_TTL_SECS),
            image_max_age: Duration::seconds(IMAGE_TTL_SECS),
        }
    }
}

impl ExpiryPolicy {
    pub fn max_age(&self, kind: ContentKind) -> Duration {
        match kind {
            ContentKind::Story => self.story_max_age,
            ContentKind::Image => self.image_max_age,
        }
    }

    // == Is Expired ==
    /// True once the entry is strictly older than its kind's max age.
    ///
    /// An entry exactly `max_age` old is still live.
    pub fn is_expired(
        &self,
        kind: ContentKind,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        now - created_at > self.max_age(kind)
    }
}
