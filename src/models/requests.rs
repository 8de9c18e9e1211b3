//! Story request model
//!
//! Describes who a story is for and what they recently read.

use crate::cache::Fingerprint;

// == Character ==
/// Story companion the reader picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    /// Stable identifier used in cache keys
    pub id: String,
    /// Name used in titles and prompts
    pub name: String,
}

impl Character {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Looks up one of the built-in characters by id.
    pub fn builtin(id: &str) -> Option<Self> {
        match id {
            "sia" => Some(Self::new("sia", "Sia")),
            "raghav" => Some(Self::new("raghav", "Raghav")),
            _ => None,
        }
    }
}

// == Story Request ==
/// Everything the story flow needs to produce one story.
#[derive(Debug, Clone)]
pub struct StoryRequest {
    /// Reader's account identifier
    pub owner: String,
    pub character: Character,
    pub age: u32,
    pub gender: String,
    /// Position of this story in the reader's progression
    pub story_number: u32,
    /// Topics of previously read stories, oldest first
    pub recent_topics: Vec<String>,
}

impl StoryRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.owner.trim().is_empty() {
            return Some("Owner cannot be empty".to_string());
        }
        if self.character.id.trim().is_empty() {
            return Some("Character id cannot be empty".to_string());
        }
        if self.age == 0 {
            return Some("Age must be positive".to_string());
        }
        None
    }

    /// Cache fingerprint for this request on `topic`.
    pub fn fingerprint(&self, topic: &str) -> Fingerprint {
        Fingerprint::new(self.owner.clone(), self.character.id.clone(), self.age, topic)
    }
}
