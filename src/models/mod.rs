//! Story models
//!
//! Types exchanged between the story flow and its callers: the request for
//! a story, the quiz embedded in it and the outcome handed back.

pub mod quiz;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use quiz::{fallback_quiz, parse_quiz, score, QuizQuestion, QUIZ_LENGTH};
pub use requests::{Character, StoryRequest};
pub use responses::StoryOutcome;
