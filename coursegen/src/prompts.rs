//! Prompt templates for each generation operation.
//!
//! Every user template is fixed at compile time and lists the placeholders
//! it expects; the tests below keep the two in sync. JSON examples in the
//! text use quoted keys, so the interpolator copies them through verbatim.

use coursegen_core::PromptTemplate;

/// System prompt shared by every operation.
pub const SYSTEM_PROMPT: &str = "You are an expert instructional designer who builds clear, \
well-structured online courses. Always answer with a single JSON object and nothing else.";

/// Course outline.
pub const OUTLINE: PromptTemplate = PromptTemplate::new(
    r#"Create a course outline.

Topic: {topic}
Description: {description}
Target audience: {audience}
Number of modules: {module_count}

Return JSON shaped like:
{"title": "Course title", "description": "One paragraph", "modules": [{"title": "Module title", "summary": "What the module covers", "lessons": [{"title": "Lesson title", "summary": "One sentence"}]}]}"#,
    &["topic", "description", "audience", "module_count"],
);

/// Lesson body for one outline entry.
pub const LESSON: PromptTemplate = PromptTemplate::new(
    r#"Write the full lesson "{lesson_title}" for the module "{module_title}" of the course "{course_title}".

Lesson summary: {lesson_summary}
Target audience: {audience}

Use markdown in the content field. Return JSON shaped like:
{"title": "Lesson title", "content": "Markdown body", "key_points": ["..."], "estimated_minutes": 15}"#,
    &[
        "lesson_title",
        "module_title",
        "course_title",
        "lesson_summary",
        "audience",
    ],
);

/// Multiple-choice quiz over a lesson.
pub const QUIZ: PromptTemplate = PromptTemplate::new(
    r#"Write a multiple-choice quiz with {question_count} questions for the lesson "{lesson_title}".

Lesson content:
{lesson_content}

Each question has exactly four options; correct_index is 0-based. Return JSON shaped like:
{"title": "Quiz title", "questions": [{"question": "...", "options": ["a", "b", "c", "d"], "correct_index": 0, "explanation": "..."}]}"#,
    &["question_count", "lesson_title", "lesson_content"],
);

/// Short summary of arbitrary course content.
pub const SUMMARY: PromptTemplate = PromptTemplate::new(
    r#"Summarize the following material titled "{title}" in at most {max_words} words.

{content}

Return JSON shaped like:
{"summary": "...", "key_points": ["..."]}"#,
    &["title", "max_words", "content"],
);

/// Rewrite of existing content following an instruction.
pub const REWRITE: PromptTemplate = PromptTemplate::new(
    r#"Rewrite the content below. Instruction: {instruction}

Content:
{content}

Return JSON shaped like:
{"content": "Rewritten text", "notes": "What changed"}"#,
    &["instruction", "content"],
);

/// All user templates, for bulk checks.
pub const ALL: [(&str, PromptTemplate); 5] = [
    ("outline", OUTLINE),
    ("lesson", LESSON),
    ("quiz", QUIZ),
    ("summary", SUMMARY),
    ("rewrite", REWRITE),
];
