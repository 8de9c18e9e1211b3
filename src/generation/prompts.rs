//! Prompt builders for story text, quiz and illustration requests.

use crate::models::{StoryRequest, QUIZ_LENGTH};

/// Adventure themes mixed into story prompts for variety.
pub const STORY_VARIATIONS: &[&str] = &[
    "a magical discovery adventure",
    "an exciting exploration journey",
    "a mysterious science quest",
    "a thrilling outdoor expedition",
    "a fascinating investigation",
    "an amazing learning adventure",
];

/// Settings mixed into story prompts for variety.
pub const STORY_SETTINGS: &[&str] = &[
    "in a beautiful forest",
    "near a sparkling lake",
    "in a colorful garden",
    "on a sunny hillside",
    "by the ocean shore",
    "in a peaceful meadow",
    "near a babbling brook",
    "in their backyard",
];

/// Randomized ingredients of one story prompt.
#[derive(Debug, Clone, Copy)]
pub struct StoryFlavor<'a> {
    pub variation: &'a str,
    pub setting: &'a str,
    /// Token asking the model for a story unlike any earlier one
    pub unique_id: &'a str,
}

pub fn story_prompt(request: &StoryRequest, topic: &str, flavor: StoryFlavor<'_>) -> String {
    let age = request.age;
    let name = &request.character.name;
    let StoryFlavor {
        variation,
        setting,
        unique_id,
    } = flavor;

    format!(
        "Write a unique 500-1000 word educational adventure story for a {age}-year-old {gender} about {topic}.\n\n\
         This should be {variation} {setting}. The main character is {name}, a curious and brave young explorer.\n\n\
         Story ID: {unique_id} (make this story completely unique and different from any previous stories)\n\n\
         The story should:\n\
         - Be age-appropriate for {age}-year-olds\n\
         - Teach about {topic} in a fun, engaging way\n\
         - Include simple scientific facts woven naturally into the adventure\n\
         - Have an exciting plot with discovery and wonder\n\
         - Use vocabulary suitable for ages 6-10\n\
         - End with {name} learning something amazing about science\n\
         - Be between 500-1000 words\n\
         - Include the setting: {setting}\n\
         - Follow the theme: {variation}\n\n\
         Make it exciting, educational, and full of wonder! Ensure this story is completely unique and different from other stories about {topic}.",
        gender = request.gender,
    )
}

pub fn quiz_prompt(request: &StoryRequest, topic: &str, story: &str) -> String {
    let age = request.age;
    let name = &request.character.name;

    format!(
        "Based on the following story about {topic}, create exactly {QUIZ_LENGTH} multiple-choice questions that test a {age}-year-old's understanding of the science concepts presented.\n\n\
         Story: {story}\n\n\
         For each question, provide:\n\
         1. A clear question suitable for ages 6-10\n\
         2. 4 multiple choice options (A, B, C, D)\n\
         3. The correct answer (0 for A, 1 for B, 2 for C, 3 for D)\n\
         4. A simple explanation of why the answer is correct\n\n\
         Format your response as a JSON array like this:\n\
         [\n  {{\n    \"question\": \"What did {name} learn about...?\",\n    \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],\n    \"correctAnswer\": 1,\n    \"explanation\": \"Simple explanation suitable for kids\"\n  }}\n]\n\n\
         Make sure the questions focus on the key science concepts from the story and are appropriate for a {age}-year-old."
    )
}

pub fn image_prompt(topic: &str) -> String {
    format!(
        "A black and white atmospheric illustration showing the environment for a children's science story about \"{topic}\". \
         The scene should be mysterious and educational, suitable for kids aged 6-10. \
         Style: black and white sketch, atmospheric, child-friendly, educational mood. \
         No text or characters, just the environment and setting."
    )
}
