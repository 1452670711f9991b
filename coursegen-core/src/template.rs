//! Prompt template interpolation.
//!
//! Templates use `{name}` placeholders where `name` is made of ASCII
//! letters, digits, and underscores. Any other brace sequence (for example a
//! JSON example embedded in prompt text) is copied through unchanged.
//!
//! ```rust
//! use std::collections::HashMap;
//! use coursegen_core::template::interpolate;
//!
//! let values = HashMap::from([("name", "Ada")]);
//! assert_eq!(interpolate("Hello {name}", &values).unwrap(), "Hello Ada");
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

/// Error raised while interpolating a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A placeholder had no corresponding value.
    #[error("Missing value for template placeholder '{{{name}}}'")]
    MissingPlaceholder {
        /// Name of the unresolved placeholder.
        name: String,
    },
}

impl TemplateError {
    /// Create a missing placeholder error.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingPlaceholder { name: name.into() }
    }
}

/// A fixed prompt template paired with the placeholder names it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Template text.
    pub text: &'static str,
    /// Placeholder names the template is expected to contain.
    pub placeholders: &'static [&'static str],
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub const fn new(text: &'static str, placeholders: &'static [&'static str]) -> Self {
        Self { text, placeholders }
    }

    /// Render the template with the given values.
    pub fn render<K, V>(&self, values: &HashMap<K, V>) -> Result<String, TemplateError>
    where
        K: Borrow<str> + Hash + Eq,
        V: AsRef<str>,
    {
        interpolate(self.text, values)
    }
}

/// Substitute every `{name}` placeholder in `template`.
///
/// Fails on the first placeholder without a value. Substituted values are
/// not scanned again, so a value containing `{x}` is inserted literally.
pub fn interpolate<K, V>(template: &str, values: &HashMap<K, V>) -> Result<String, TemplateError>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
{
    let mut out = String::with_capacity(template.len());

    for segment in Segments::new(template) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(name) => {
                let value = values.get(name).ok_or_else(|| TemplateError::missing(name))?;
                out.push_str(value.as_ref());
            }
        }
    }

    Ok(out)
}

/// List the placeholder names in `template`, in order of first appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for segment in Segments::new(template) {
        if let Segment::Placeholder(name) = segment {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    fn new(template: &'a str) -> Self {
        Self { rest: template }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let Some(open) = self.rest.find('{') else {
            let literal = self.rest;
            self.rest = "";
            return Some(Segment::Literal(literal));
        };

        if open > 0 {
            let literal = &self.rest[..open];
            self.rest = &self.rest[open..];
            return Some(Segment::Literal(literal));
        }

        // `rest` starts with '{'
        if let Some(close) = self.rest[1..].find('}') {
            let name = &self.rest[1..=close];
            if is_placeholder_name(name) {
                self.rest = &self.rest[close + 2..];
                return Some(Segment::Placeholder(name));
            }
        }

        let literal = &self.rest[..1];
        self.rest = &self.rest[1..];
        Some(Segment::Literal(literal))
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
