//! Retry executor for running operations with retries.

use crate::backoff::jittered_delay;
use crate::classifier::RetryCondition;
use crate::error::{ClassifiedError, Classify};
use crate::policy::RetryPolicy;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// State of a retry run.
#[derive(Debug, Clone, Default)]
pub struct RetryState {
    /// Attempts started so far.
    pub attempts: u32,
    /// Total time scheduled for backoff sleeps.
    pub total_wait_time: Duration,
    /// History of attempts.
    pub history: Vec<AttemptInfo>,
}

/// Information about a single attempt.
#[derive(Debug, Clone)]
pub struct AttemptInfo {
    /// Attempt index (0-indexed).
    pub attempt: u32,
    /// Whether it succeeded.
    pub success: bool,
    /// Error message if failed.
    pub error: Option<String>,
    /// Backoff scheduled after this attempt.
    pub wait_time: Duration,
}

/// Execute an operation with retries.
///
/// Makes at most `policy.max_retries + 1` attempts, sequentially. Failures
/// the condition deems permanent, and the failure of the final attempt, are
/// returned immediately. Between attempts the executor sleeps for
/// `base_delay * 2^attempt` scaled by a jitter in `[0.75, 1.25]`.
///
/// The cancellation token is checked before each attempt and raced against
/// both the attempt and the sleep; when it fires the call resolves at once
/// with [`ClassifiedError::Cancelled`].
///
/// # Example
///
/// ```ignore
/// use coursegen_retries::{with_retry, RetryCondition, RetryPolicy, RetryableError};
///
/// let policy = RetryPolicy::new().max_retries(2);
/// let value = with_retry(&policy, &RetryCondition::default(), || async {
///     Ok::<_, RetryableError>(42)
/// })
/// .await?;
/// ```
pub async fn with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    condition: &RetryCondition,
    operation: F,
) -> Result<T, ClassifiedError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify + Display,
{
    with_retry_state(policy, condition, operation).await.0
}

/// Execute with retries and get state information.
pub async fn with_retry_state<F, Fut, T, E>(
    policy: &RetryPolicy,
    condition: &RetryCondition,
    mut operation: F,
) -> (Result<T, ClassifiedError<E>>, RetryState)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify + Display,
{
    let mut state = RetryState::default();
    let mut attempt: u32 = 0;

    loop {
        if policy.is_cancelled() {
            debug!(attempt, "Cancelled before attempt");
            return (Err(ClassifiedError::Cancelled), state);
        }

        state.attempts += 1;
        debug!(
            attempt,
            max_retries = policy.max_retries,
            "Executing retry attempt"
        );

        let outcome = tokio::select! {
            biased;
            _ = policy.cancelled() => {
                debug!(attempt, "Cancelled during attempt");
                return (Err(ClassifiedError::Cancelled), state);
            }
            outcome = operation() => outcome,
        };

        let error = match outcome {
            Ok(value) => {
                state.history.push(AttemptInfo {
                    attempt,
                    success: true,
                    error: None,
                    wait_time: Duration::ZERO,
                });
                return (Ok(value), state);
            }
            Err(error) => error,
        };

        if error.is_cancelled() {
            debug!(attempt, "Operation reported cancellation");
            return (Err(ClassifiedError::Cancelled), state);
        }

        let transient = condition.is_transient(&error);
        if !transient || attempt >= policy.max_retries {
            warn!(
                attempt,
                transient,
                error = %error,
                "Retry exhausted or error not retryable"
            );
            state.history.push(AttemptInfo {
                attempt,
                success: false,
                error: Some(error.to_string()),
                wait_time: Duration::ZERO,
            });
            return (Err(condition.classify(error)), state);
        }

        let wait = jittered_delay(policy.base_delay, attempt);
        state.total_wait_time += wait;
        state.history.push(AttemptInfo {
            attempt,
            success: false,
            error: Some(error.to_string()),
            wait_time: wait,
        });

        warn!(
            attempt,
            wait_ms = wait.as_millis() as u64,
            error = %error,
            "Transient failure, waiting before retry"
        );

        tokio::select! {
            biased;
            _ = policy.cancelled() => {
                debug!(attempt, "Cancelled during backoff");
                return (Err(ClassifiedError::Cancelled), state);
            }
            _ = sleep(wait) => {}
        }

        attempt += 1;
    }
}

/// Builder-style wrapper pairing a policy with a condition.
#[derive(Debug, Clone)]
pub struct Retry<'a> {
    policy: &'a RetryPolicy,
    condition: RetryCondition,
}

impl<'a> Retry<'a> {
    /// Create a new retry runner with the standard condition.
    pub fn new(policy: &'a RetryPolicy) -> Self {
        Self {
            policy,
            condition: RetryCondition::default(),
        }
    }

    /// Replace the retry condition.
    pub fn condition(mut self, condition: RetryCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Run the operation with retries.
    pub async fn run<F, Fut, T, E>(self, operation: F) -> Result<T, ClassifiedError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + Display,
    {
        with_retry(self.policy, &self.condition, operation).await
    }
}
