//! # coursegen-retries
//!
//! Failure classification and retry-with-backoff for coursegen.
//!
//! This crate decides which failures of the completion endpoint are worth
//! replaying and drives the replay loop.
//!
//! ## Core Concepts
//!
//! - **[`Classify`]**: facts an error exposes (status code, network, cancelled)
//! - **[`RetryCondition`]**: the one place that turns those facts into a
//!   retry decision
//! - **[`RetryPolicy`]**: attempt budget, base delay, and cancellation token
//! - **[`with_retry`]**: execute an async operation with cancellable backoff
//!
//! ## Classification
//!
//! | Failure | Retried |
//! |---------|---------|
//! | HTTP 429, 500, 502, 503, 529 | yes |
//! | any other HTTP status | no |
//! | connection failure / timeout | yes |
//! | cancellation | never |
//! | anything else | no |
//!
//! ## Example
//!
//! ```ignore
//! use coursegen_retries::{with_retry, RetryCondition, RetryPolicy, RetryableError};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new()
//!     .max_retries(3)
//!     .base_delay(Duration::from_millis(500));
//!
//! let result = with_retry(&policy, &RetryCondition::default(), || async {
//!     Ok::<_, RetryableError>("success")
//! }).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backoff;
pub mod classifier;
pub mod error;
pub mod executor;
pub mod policy;

// Re-exports
pub use backoff::{backoff_delay, delay_bounds, jittered_delay, JITTER_MAX, JITTER_MIN};
pub use classifier::{RetryCondition, TRANSIENT_STATUS_CODES};
pub use error::{ClassifiedError, Classify, RetryResult, RetryableError, TransientCause};
pub use executor::{with_retry, with_retry_state, AttemptInfo, Retry, RetryState};
pub use policy::RetryPolicy;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        with_retry, ClassifiedError, Classify, RetryCondition, RetryPolicy, RetryResult,
        RetryableError,
    };
}
