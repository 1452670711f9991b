//! Retry error types.

use std::fmt;
use thiserror::Error;

/// Facts about a failure that the classifier inspects.
///
/// Implementors describe what happened; they never decide whether the
/// failure is retryable. That decision belongs to
/// [`RetryCondition`](crate::RetryCondition).
pub trait Classify {
    /// HTTP status code carried by the failure, if any.
    fn status(&self) -> Option<u16> {
        None
    }

    /// Whether the failure is a network/connectivity problem rather than an
    /// HTTP-level error.
    fn is_network(&self) -> bool {
        false
    }

    /// Whether the failure represents a cancellation.
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Classify for reqwest::Error {
    fn status(&self) -> Option<u16> {
        reqwest::Error::status(self).map(|s| s.as_u16())
    }

    fn is_network(&self) -> bool {
        self.status().is_none() && (self.is_connect() || self.is_timeout() || self.is_request())
    }
}

/// Why a failure was judged transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientCause {
    /// Retry-eligible HTTP status code.
    Status(u16),
    /// Network or connectivity failure.
    Network,
}

impl fmt::Display for TransientCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Network => f.write_str("network failure"),
        }
    }
}

/// A failure after classification.
///
/// Built only by [`RetryCondition::classify`](crate::RetryCondition::classify)
/// or by the executor when the cancellation token fires.
#[derive(Debug, Error)]
pub enum ClassifiedError<E> {
    /// Retry-eligible failure; surfaced once retries are exhausted.
    #[error("Transient failure ({cause}): {source}")]
    Transient {
        /// What made the failure transient.
        cause: TransientCause,
        /// The underlying failure.
        source: E,
    },

    /// Failure that will not change on replay.
    #[error("{0}")]
    Permanent(E),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,
}

impl<E> ClassifiedError<E> {
    /// Whether this is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether this is a transient failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Whether this is a permanent failure.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }

    /// The underlying failure, if there is one.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Transient { source, .. } | Self::Permanent(source) => Some(source),
            Self::Cancelled => None,
        }
    }

    /// Borrow the underlying failure, if there is one.
    pub fn inner(&self) -> Option<&E> {
        match self {
            Self::Transient { source, .. } | Self::Permanent(source) => Some(source),
            Self::Cancelled => None,
        }
    }
}

/// General-purpose failure for operations that have no error type of their own.
#[derive(Debug, Error)]
pub enum RetryableError {
    /// HTTP error with status code.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Timeout.
    #[error("Timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Cancelled.
    #[error("Cancelled")]
    Cancelled,

    /// Other error.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RetryableError {
    /// Create an HTTP error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }
}

impl Classify for RetryableError {
    fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn is_network(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connection(_))
    }

    fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for retry operations.
pub type RetryResult<T, E = RetryableError> = Result<T, ClassifiedError<E>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_error_facts() {
        assert_eq!(RetryableError::http(503, "unavailable").status(), Some(503));
        assert!(RetryableError::Timeout.is_network());
        assert!(RetryableError::connection("reset").is_network());
        assert!(!RetryableError::http(500, "").is_network());
        assert!(RetryableError::Cancelled.is_cancelled());
        assert_eq!(RetryableError::Other(anyhow::anyhow!("x")).status(), None);
    }

    #[test]
    fn test_classified_accessors() {
        let err: ClassifiedError<RetryableError> = ClassifiedError::Transient {
            cause: TransientCause::Status(429),
            source: RetryableError::http(429, "slow down"),
        };
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "Transient failure (HTTP 429): HTTP error 429: slow down");
        assert_eq!(err.inner().and_then(Classify::status), Some(429));

        let err: ClassifiedError<RetryableError> = ClassifiedError::Cancelled;
        assert!(err.is_cancelled());
        assert!(err.into_inner().is_none());
    }

    #[tokio::test]
    async fn test_reqwest_connect_error_is_network() {
        // Port 1 is reserved and refuses connections on loopback.
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .unwrap_err();

        assert!(Classify::is_network(&err));
        assert_eq!(Classify::status(&err), None);
    }
}
