//! Operation inputs and the structured artifacts they produce.
//!
//! Inputs know how to fill their operation's prompt template. Artifacts are
//! plain serde values; optional fields default so that a sparse but valid
//! answer still deserializes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Values for a prompt template's placeholders.
pub trait PromptValues {
    /// Placeholder name to value.
    fn prompt_values(&self) -> HashMap<&'static str, String>;
}

impl PromptValues for HashMap<&'static str, String> {
    fn prompt_values(&self) -> HashMap<&'static str, String> {
        self.clone()
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Input for outline generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineInput {
    /// Course topic.
    pub topic: String,
    /// Free-form description from the author.
    #[serde(default)]
    pub description: String,
    /// Who the course is for.
    pub audience: String,
    /// Number of modules to plan.
    pub module_count: u32,
}

impl OutlineInput {
    /// Create an outline input with an empty description.
    pub fn new(topic: impl Into<String>, audience: impl Into<String>, module_count: u32) -> Self {
        Self {
            topic: topic.into(),
            description: String::new(),
            audience: audience.into(),
            module_count,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl PromptValues for OutlineInput {
    fn prompt_values(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("topic", self.topic.clone()),
            ("description", self.description.clone()),
            ("audience", self.audience.clone()),
            ("module_count", self.module_count.to_string()),
        ])
    }
}

/// Input for lesson expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonInput {
    /// Course title.
    pub course_title: String,
    /// Module the lesson belongs to.
    pub module_title: String,
    /// Lesson title.
    pub lesson_title: String,
    /// One-line summary from the outline.
    #[serde(default)]
    pub lesson_summary: String,
    /// Who the course is for.
    pub audience: String,
}

impl PromptValues for LessonInput {
    fn prompt_values(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("course_title", self.course_title.clone()),
            ("module_title", self.module_title.clone()),
            ("lesson_title", self.lesson_title.clone()),
            ("lesson_summary", self.lesson_summary.clone()),
            ("audience", self.audience.clone()),
        ])
    }
}

/// Input for quiz generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizInput {
    /// Lesson title.
    pub lesson_title: String,
    /// Lesson body the quiz covers.
    pub lesson_content: String,
    /// Number of questions.
    pub question_count: u32,
}

impl PromptValues for QuizInput {
    fn prompt_values(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("lesson_title", self.lesson_title.clone()),
            ("lesson_content", self.lesson_content.clone()),
            ("question_count", self.question_count.to_string()),
        ])
    }
}

/// Input for summary generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryInput {
    /// Title of the material.
    pub title: String,
    /// Material to summarize.
    pub content: String,
    /// Word limit for the summary.
    pub max_words: u32,
}

impl PromptValues for SummaryInput {
    fn prompt_values(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("title", self.title.clone()),
            ("content", self.content.clone()),
            ("max_words", self.max_words.to_string()),
        ])
    }
}

/// Input for a content rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteInput {
    /// Content to rewrite.
    pub content: String,
    /// What to change, e.g. "simplify for beginners".
    pub instruction: String,
}

impl PromptValues for RewriteInput {
    fn prompt_values(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("content", self.content.clone()),
            ("instruction", self.instruction.clone()),
        ])
    }
}

// ============================================================================
// Artifacts
// ============================================================================

/// A planned course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOutline {
    /// Course title.
    pub title: String,
    /// Course description.
    #[serde(default)]
    pub description: String,
    /// Modules in order.
    #[serde(default)]
    pub modules: Vec<OutlineModule>,
}

impl CourseOutline {
    /// Total number of lessons across all modules.
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}

/// One module of an outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineModule {
    /// Module title.
    pub title: String,
    /// What the module covers.
    #[serde(default)]
    pub summary: String,
    /// Lessons in order.
    #[serde(default)]
    pub lessons: Vec<OutlineLesson>,
}

/// One lesson entry of an outline module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineLesson {
    /// Lesson title.
    pub title: String,
    /// One-line summary.
    #[serde(default)]
    pub summary: String,
}

/// A fully written lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Lesson title.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Takeaways.
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Estimated reading time.
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
}

/// A multiple-choice quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Quiz title.
    #[serde(default)]
    pub title: String,
    /// Questions in order.
    pub questions: Vec<QuizQuestion>,
}

/// One quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question text.
    pub question: String,
    /// Answer options.
    pub options: Vec<String>,
    /// 0-based index of the correct option.
    pub correct_index: usize,
    /// Why the answer is correct.
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    /// The correct option, if the index is in range.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

/// A summary of course material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Summary text.
    pub summary: String,
    /// Takeaways.
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Rewritten content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    /// The rewritten text.
    pub content: String,
    /// What changed.
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_minimal_outline_deserializes() {
        let outline: CourseOutline =
            serde_json::from_value(json!({"title": "X", "modules": []})).unwrap();
        assert_eq!(outline.title, "X");
        assert!(outline.modules.is_empty());
        assert_eq!(outline.description, "");
    }

    #[test]
    fn test_outline_lesson_count() {
        let outline: CourseOutline = serde_json::from_value(json!({
            "title": "Knots",
            "modules": [
                {"title": "Basics", "lessons": [{"title": "Bowline"}, {"title": "Reef"}]},
                {"title": "Advanced", "lessons": [{"title": "Splicing"}]}
            ]
        }))
        .unwrap();
        assert_eq!(outline.lesson_count(), 3);
    }

    #[test]
    fn test_quiz_correct_option() {
        let question = QuizQuestion {
            question: "2 + 2?".into(),
            options: vec!["3".into(), "4".into()],
            correct_index: 1,
            explanation: None,
        };
        assert_eq!(question.correct_option(), Some("4"));

        let out_of_range = QuizQuestion {
            correct_index: 7,
            ..question
        };
        assert_eq!(out_of_range.correct_option(), None);
    }

    #[test]
    fn test_input_values_cover_numbers() {
        let values = OutlineInput::new("Sailing", "beginners", 4)
            .description("From zero to harbour")
            .prompt_values();
        assert_eq!(values["module_count"], "4");
        assert_eq!(values["description"], "From zero to harbour");
    }
}
