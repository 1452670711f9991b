//! Error types for output extraction.

use thiserror::Error;

/// Error while extracting a structured value from completion text.
///
/// Neither variant is retryable: the same text extracts the same way.
#[derive(Debug, Error)]
pub enum OutputParseError {
    /// The text holds no `{ ... }` span.
    #[error("No JSON object found in output")]
    NoJsonFound,

    /// The span was found but did not parse, or did not fit the target type.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl OutputParseError {
    /// Line and column reported by the JSON parser, if any.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::JsonParse(err) => Some((err.line(), err.column())),
            Self::NoJsonFound => None,
        }
    }
}

/// Result type for output parsing.
pub type ParseResult<T> = Result<T, OutputParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            OutputParseError::NoJsonFound.to_string(),
            "No JSON object found in output"
        );

        let err: OutputParseError = serde_json::from_str::<serde_json::Value>("{\"a\":}")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Failed to parse JSON:"));
        assert_eq!(err.position().map(|(line, _)| line), Some(1));
        assert_eq!(OutputParseError::NoJsonFound.position(), None);
    }
}
