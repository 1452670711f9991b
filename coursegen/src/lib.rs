//! # coursegen
//!
//! Resilient generation of structured course artifacts (outlines, lessons,
//! quizzes, summaries, rewrites) from a large-language-model completion
//! endpoint that is rate limited, latency variable, and occasionally down.
//!
//! ## Quick Start
//!
//! ```ignore
//! use coursegen::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     coursegen::telemetry::init_tracing();
//!
//!     let generator = Generator::from_env()?;
//!     let outline = generator
//!         .generate_outline(
//!             &OutlineInput::new("Knot tying", "new sailors", 4),
//!             GenerationOptions::default(),
//!         )
//!         .await?;
//!
//!     println!("{}: {} modules", outline.title, outline.modules.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Failure handling
//!
//! | Failure | Retried | Surfaces as |
//! |---------|---------|-------------|
//! | HTTP 429, 500, 502, 503, 529 | yes | [`GenerationError::Transient`] once exhausted |
//! | connection failure / timeout | yes | [`GenerationError::Transient`] once exhausted |
//! | any other HTTP status | no | [`GenerationError::Permanent`] |
//! | empty completion content | no | [`GenerationError::Permanent`] |
//! | no JSON / malformed JSON | no | [`GenerationError::Extraction`] |
//! | missing template value | no | [`GenerationError::MissingPlaceholder`] |
//! | missing API key | no | [`GenerationError::Configuration`] |
//! | cancellation token fired | no | [`GenerationError::Cancelled`] |
//!
//! ## Architecture
//!
//! - [`coursegen_core`] - template interpolation, per-call options
//! - [`coursegen_retries`] - failure classification and retry executor
//! - [`coursegen_models`] - completion and image clients
//! - [`coursegen_output`] - JSON extraction from completion text

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod artifacts;
pub mod error;
pub mod generate;
pub mod prompts;
pub mod shared;
pub mod telemetry;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Template interpolation and per-call options.
pub use coursegen_core as core;

/// Completion and image clients.
pub use coursegen_models as models;

/// JSON extraction.
pub use coursegen_output as output;

/// Failure classification and retries.
pub use coursegen_retries as retries;

// ============================================================================
// Flat Re-exports
// ============================================================================

pub use artifacts::{
    CourseOutline, Lesson, LessonInput, OutlineInput, OutlineLesson, OutlineModule, PromptValues,
    Quiz, QuizInput, QuizQuestion, Rewrite, RewriteInput, Summary, SummaryInput,
};
pub use coursegen_core::{
    AsyncFnSink, CancellationToken, FnSink, GenerationOptions, ResultSink, TemplateError,
};
pub use coursegen_models::{AspectRatio, ClientConfig, ImageResult, ModelError};
pub use coursegen_output::OutputParseError;
pub use error::{GenerationError, GenerationResult, USER_FAILURE_MESSAGE};
pub use generate::{Generator, OperationKind, OperationSpec, OPERATIONS};
pub use shared::shared_generator;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AspectRatio, CancellationToken, ClientConfig, CourseOutline, GenerationError,
        GenerationOptions, Generator, Lesson, LessonInput, OperationKind, OutlineInput, Quiz,
        QuizInput, Rewrite, RewriteInput, Summary, SummaryInput,
    };
}

/// Version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
