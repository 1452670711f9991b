//! Transient-failure classification.

use crate::error::{ClassifiedError, Classify, TransientCause};

/// Status codes worth replaying: rate limited, server error, bad gateway,
/// unavailable, and overloaded.
pub const TRANSIENT_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 529];

/// Decides which failures are retry-eligible.
#[derive(Debug, Clone)]
pub struct RetryCondition {
    /// HTTP status codes to retry on.
    pub on_status_codes: Vec<u16>,
    /// Whether network failures are retried.
    pub on_network: bool,
}

impl Default for RetryCondition {
    fn default() -> Self {
        Self {
            on_status_codes: TRANSIENT_STATUS_CODES.to_vec(),
            on_network: true,
        }
    }
}

impl RetryCondition {
    /// Create the standard condition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a condition that retries nothing.
    pub fn never() -> Self {
        Self {
            on_status_codes: Vec::new(),
            on_network: false,
        }
    }

    /// Add status codes to retry on.
    pub fn on_status(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.on_status_codes.extend(codes);
        self
    }

    /// Set whether network failures are retried.
    pub fn on_network(mut self, retry: bool) -> Self {
        self.on_network = retry;
        self
    }

    /// Check if an error should be retried.
    ///
    /// Cancellations are never transient.
    pub fn is_transient<E: Classify + ?Sized>(&self, error: &E) -> bool {
        self.transient_cause(error).is_some()
    }

    /// Classify an error.
    pub fn classify<E: Classify>(&self, error: E) -> ClassifiedError<E> {
        if error.is_cancelled() {
            return ClassifiedError::Cancelled;
        }

        match self.transient_cause(&error) {
            Some(cause) => ClassifiedError::Transient {
                cause,
                source: error,
            },
            None => ClassifiedError::Permanent(error),
        }
    }

    fn transient_cause<E: Classify + ?Sized>(&self, error: &E) -> Option<TransientCause> {
        if error.is_cancelled() {
            return None;
        }

        // A status code always wins over the network flag.
        if let Some(status) = error.status() {
            return self
                .on_status_codes
                .contains(&status)
                .then_some(TransientCause::Status(status));
        }

        (self.on_network && error.is_network()).then_some(TransientCause::Network)
    }
}
