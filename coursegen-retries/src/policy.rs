//! Retry policy derived from generation options.

use coursegen_core::GenerationOptions;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// The part of [`GenerationOptions`] the retry executor needs.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Token that aborts the attempt loop and backoff sleeps.
    pub cancellation: Option<CancellationToken>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&GenerationOptions::default())
    }
}

impl From<&GenerationOptions> for RetryPolicy {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            max_retries: options.max_retries,
            base_delay: options.base_delay,
            cancellation: options.cancellation.clone(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy that makes a single attempt.
    pub fn no_retry() -> Self {
        Self::new().max_retries(0)
    }

    /// Set max retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the base delay.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Attach a cancellation token.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Total attempts permitted.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether the token (if any) has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Resolve when the token fires; never resolves without a token.
    pub async fn cancelled(&self) {
        match &self.cancellation {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert!(!policy.is_cancelled());
    }

    #[test]
    fn test_from_options() {
        let token = CancellationToken::new();
        let options = GenerationOptions::new()
            .max_retries(7)
            .base_delay(Duration::from_millis(20))
            .cancellation(token.clone());

        let policy = RetryPolicy::from(&options);
        assert_eq!(policy.max_retries, 7);
        assert_eq!(policy.base_delay, Duration::from_millis(20));

        token.cancel();
        assert!(policy.is_cancelled());
    }

    #[test]
    fn test_no_retry() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn test_max_attempts_saturates() {
        let policy = RetryPolicy::new().max_retries(u32::MAX);
        assert_eq!(policy.max_attempts(), u32::MAX);
    }
}
