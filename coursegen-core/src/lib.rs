//! # coursegen-core
//!
//! Foundational types shared by the coursegen crates:
//!
//! - **Templates**: `{name}` placeholder interpolation for prompt text
//! - **Options**: per-call retry, cancellation, and result-sink settings
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::time::Duration;
//! use coursegen_core::{interpolate, GenerationOptions};
//!
//! let prompt = interpolate(
//!     "Outline a course on {topic}",
//!     &HashMap::from([("topic", "knots")]),
//! ).unwrap();
//! assert_eq!(prompt, "Outline a course on knots");
//!
//! let options = GenerationOptions::new()
//!     .max_retries(5)
//!     .base_delay(Duration::from_millis(250));
//! assert_eq!(options.max_retries, 5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod options;
pub mod template;

pub use options::{
    AsyncFnSink, FnSink, GenerationOptions, ResultSink, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES,
};
pub use template::{interpolate, placeholders, PromptTemplate, TemplateError};
pub use tokio_util::sync::CancellationToken;

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::options::{GenerationOptions, ResultSink};
    pub use crate::template::{interpolate, PromptTemplate, TemplateError};
    pub use tokio_util::sync::CancellationToken;
}
