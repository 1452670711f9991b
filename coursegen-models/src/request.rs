//! The completion request value object.

use crate::types::{ChatCompletionRequest, ChatMessage};

/// Sampling temperature used for every generation call.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default output token budget.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2000;

/// One logical completion request.
///
/// Built once per operation and re-sent unchanged on every retry.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// System prompt.
    pub system_prompt: String,
    /// User message.
    pub user_message: String,
    /// Maximum output tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl CompletionRequest {
    /// Create a request with the default token budget and temperature.
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            user_message: user_message.into(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the output token budget.
    #[must_use]
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// Set the temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build the wire body.
    pub fn to_wire(&self) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_prompt.as_str()),
                ChatMessage::user(self.user_message.as_str()),
            ],
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = CompletionRequest::new("gpt-4o", "sys", "user");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_output_tokens, 2000);
    }

    #[test]
    fn test_to_wire() {
        let wire = CompletionRequest::new("m", "be terse", "outline knots")
            .max_output_tokens(4000)
            .to_wire();

        assert_eq!(wire.model, "m");
        assert_eq!(wire.max_tokens, 4000);
        assert_eq!(wire.messages.len(), 2);
        assert_eq!(wire.messages[0], ChatMessage::system("be terse"));
        assert_eq!(wire.messages[1], ChatMessage::user("outline knots"));
    }
}
