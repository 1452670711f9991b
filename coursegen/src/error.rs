//! The error returned by every generation operation.

use coursegen_core::TemplateError;
use coursegen_models::ModelError;
use coursegen_output::OutputParseError;
use coursegen_retries::{ClassifiedError, TransientCause};
use std::error::Error as StdError;
use thiserror::Error;

/// Message shown to end users for any non-cancellation failure.
pub const USER_FAILURE_MESSAGE: &str = "Generation failed, please try again.";

/// Failure of a generation operation.
///
/// Callers show [`user_message`](Self::user_message) to end users, log
/// [`diagnostic`](Self::diagnostic), and stay silent on cancellation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Credentials or endpoint settings are missing or invalid. Never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A prompt placeholder had no value. A bug at the call site.
    #[error(transparent)]
    MissingPlaceholder(#[from] TemplateError),

    /// A transient failure persisted through every retry.
    #[error("Generation failed after retries ({cause}): {source}")]
    Transient {
        /// What made the last failure transient.
        cause: TransientCause,
        /// The last failure.
        #[source]
        source: ModelError,
    },

    /// A failure that retrying cannot fix.
    #[error("Generation failed: {0}")]
    Permanent(#[source] ModelError),

    /// The completion text held no usable JSON.
    #[error("Could not extract result: {0}")]
    Extraction(#[from] OutputParseError),

    /// The caller cancelled the operation.
    #[error("Generation cancelled")]
    Cancelled,
}

impl GenerationError {
    /// Whether the caller cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether retries were exhausted on a transient failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// HTTP status of the underlying failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transient { source, .. } | Self::Permanent(source) => source.status(),
            _ => None,
        }
    }

    /// Message for end users; `None` for cancellation.
    pub fn user_message(&self) -> Option<&'static str> {
        (!self.is_cancelled()).then_some(USER_FAILURE_MESSAGE)
    }

    /// Full error chain, for logs and support.
    pub fn diagnostic(&self) -> String {
        let mut out = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            let text = err.to_string();
            if !out.contains(&text) {
                out.push_str(": ");
                out.push_str(&text);
            }
            source = err.source();
        }
        out
    }
}

impl From<ClassifiedError<ModelError>> for GenerationError {
    fn from(err: ClassifiedError<ModelError>) -> Self {
        match err {
            ClassifiedError::Transient { cause, source } => Self::Transient { cause, source },
            ClassifiedError::Permanent(ModelError::Configuration(message)) => {
                Self::Configuration(message)
            }
            ClassifiedError::Permanent(ModelError::Cancelled) | ClassifiedError::Cancelled => {
                Self::Cancelled
            }
            ClassifiedError::Permanent(source) => Self::Permanent(source),
        }
    }
}

impl From<ModelError> for GenerationError {
    /// Single-shot calls (no retry loop) map through here.
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Configuration(message) => Self::Configuration(message),
            ModelError::Cancelled => Self::Cancelled,
            other => Self::Permanent(other),
        }
    }
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
