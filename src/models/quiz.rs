//! Quiz model
//!
//! Multiple-choice questions embedded in a story, parsing of the quiz the
//! generation service returns, and the fallback set used when that fails.

use serde::{Deserialize, Serialize};

/// Questions per story.
pub const QUIZ_LENGTH: usize = 3;

/// Answer options per question.
pub const OPTION_COUNT: usize = 4;

// == Quiz Question ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn is_well_formed(&self) -> bool {
        !self.question.trim().is_empty()
            && self.options.len() == OPTION_COUNT
            && self.correct_answer < OPTION_COUNT
    }
}

// == Parse Quiz ==
/// Parses service output into exactly [`QUIZ_LENGTH`] well-formed questions.
///
/// Surrounding prose or code fences around the JSON array are ignored.
/// Returns None for anything else.
pub fn parse_quiz(text: &str) -> Option<Vec<QuizQuestion>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }

    let questions: Vec<QuizQuestion> = serde_json::from_str(&text[start..=end]).ok()?;
    if questions.len() != QUIZ_LENGTH || !questions.iter().all(QuizQuestion::is_well_formed) {
        return None;
    }
    Some(questions)
}

// == Fallback Quiz ==
/// Generic questions used when the generated quiz is unusable.
pub fn fallback_quiz(character_name: &str, topic: &str) -> Vec<QuizQuestion> {
    let options = |opts: [&str; OPTION_COUNT]| -> Vec<String> {
        opts.iter().map(|o| o.to_string()).collect()
    };

    vec![
        QuizQuestion {
            question: format!("What did {} discover about {}?", character_name, topic),
            options: options([
                "Something amazing",
                "Nothing special",
                "It was boring",
                "It was scary",
            ]),
            correct_answer: 0,
            explanation: format!(
                "{} always discovers amazing things about science!",
                character_name
            ),
        },
        QuizQuestion {
            question: "Why is it important to learn about science?".to_string(),
            options: options([
                "It's not important",
                "To understand our world",
                "Only for adults",
                "It's too hard",
            ]),
            correct_answer: 1,
            explanation: "Science helps us understand the amazing world around us!".to_string(),
        },
        QuizQuestion {
            question: format!("What should you do when you're curious about {}?", topic),
            options: options([
                "Ignore it",
                "Ask questions and explore",
                "Be afraid",
                "Give up",
            ]),
            correct_answer: 1,
            explanation: "Being curious and asking questions is how we learn new things!"
                .to_string(),
        },
    ]
}

// == Score ==
/// Counts answers matching each question's correct option.
///
/// Answers beyond the last question are ignored.
pub fn score(questions: &[QuizQuestion], answers: &[usize]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| q.correct_answer == **a)
        .count()
}
