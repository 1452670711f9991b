//! # coursegen-output
//!
//! Extraction of structured artifacts from completion text.
//!
//! ## Example
//!
//! ```rust
//! use coursegen_output::{extract_json, parse_json_from_text, OutputParseError};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Outline {
//!     title: String,
//! }
//!
//! let text = "Here you go: {\"title\": \"Knots 101\"} Let me know!";
//! let outline: Outline = parse_json_from_text(text).unwrap();
//! assert_eq!(outline.title, "Knots 101");
//!
//! assert!(matches!(extract_json("nothing"), Err(OutputParseError::NoJsonFound)));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod parser;

// Re-exports
pub use error::{OutputParseError, ParseResult};
pub use parser::{extract_json, find_json_span, looks_like_json, parse_json_from_text, parse_json_value};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{extract_json, parse_json_from_text, OutputParseError};
}
