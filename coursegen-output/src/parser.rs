//! Extraction of a JSON object from free-form completion text.
//!
//! Completion text carries no schema guarantee: models wrap the object in
//! prose, markdown fences, or trailing commentary. The extractor takes the
//! span from the first `{` to the last `}` and parses exactly that.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::OutputParseError;

/// Locate the candidate JSON span: first `{` through last `}`, inclusive.
///
/// # Example
///
/// ```rust
/// use coursegen_output::parser::find_json_span;
///
/// assert_eq!(find_json_span("noise {\"a\":1} noise").unwrap(), "{\"a\":1}");
/// assert!(find_json_span("no braces here").is_err());
/// ```
pub fn find_json_span(text: &str) -> Result<&str, OutputParseError> {
    let start = text.find('{').ok_or(OutputParseError::NoJsonFound)?;
    let end = text.rfind('}').ok_or(OutputParseError::NoJsonFound)?;

    if end < start {
        return Err(OutputParseError::NoJsonFound);
    }

    // Braces are ASCII, so both indices sit on char boundaries.
    Ok(&text[start..=end])
}

/// Extract and parse the JSON object embedded in `text`.
pub fn extract_json(text: &str) -> Result<JsonValue, OutputParseError> {
    let span = find_json_span(text)?;
    serde_json::from_str(span).map_err(OutputParseError::JsonParse)
}

/// Extract the embedded JSON object and deserialize it into `T`.
///
/// A well-formed object that does not fit `T` is a
/// [`OutputParseError::JsonParse`] as well.
pub fn parse_json_from_text<T: DeserializeOwned>(text: &str) -> Result<T, OutputParseError> {
    let span = find_json_span(text)?;
    serde_json::from_str(span).map_err(OutputParseError::JsonParse)
}

/// Parse a JSON value into a typed value.
pub fn parse_json_value<T: DeserializeOwned>(value: JsonValue) -> Result<T, OutputParseError> {
    serde_json::from_value(value).map_err(OutputParseError::JsonParse)
}

/// Check if text appears to contain a JSON object.
pub fn looks_like_json(text: &str) -> bool {
    find_json_span(text).is_ok()
}
