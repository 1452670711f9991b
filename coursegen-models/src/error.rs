//! Model-related error types.

use coursegen_retries::Classify;
use thiserror::Error;

/// Errors from the completion and image endpoints.
///
/// Each variant is built once at the point of failure and carries the facts
/// the retry classifier needs; no variant decides retryability itself.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Non-success HTTP response.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Diagnostic body (best effort).
        body: String,
    },

    /// Connection-level failure (refused, reset, DNS, dropped body).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timed out.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,

    /// A success response carried no completion text.
    #[error("Completion response contained no content")]
    EmptyContent,

    /// A success response could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The result sink rejected the completion text.
    #[error("Result sink failed: {0}")]
    Sink(#[source] anyhow::Error),

    /// Client configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ModelError {
    /// Create an HTTP error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// HTTP status code, if this is an HTTP error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Classify for ModelError {
    fn status(&self) -> Option<u16> {
        ModelError::status(self)
    }

    fn is_network(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }

    fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelError::Timeout(err.to_string())
        } else if err.is_decode() {
            ModelError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ModelError::http(status.as_u16(), err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_body() {
            ModelError::Connection(err.to_string())
        } else {
            ModelError::Connection(format!("transport failure: {err}"))
        }
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
