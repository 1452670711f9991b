//! Wire types for the completion and image endpoints.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// Chat completion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    /// Model to use.
    pub model: String,
    /// Messages in the conversation.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: String,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Image generation request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageGenerationRequest {
    /// Model to use.
    pub model: String,
    /// Image prompt.
    pub prompt: String,
    /// Number of images.
    pub n: u32,
    /// Output resolution, e.g. `1792x1024`.
    pub size: String,
}

// ============================================================================
// Response Types
// ============================================================================

/// Chat completion response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    /// Response ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Model used.
    #[serde(default)]
    pub model: Option<String>,
    /// Response choices.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    /// Token usage.
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Choice index.
    #[serde(default)]
    pub index: u32,
    /// The message.
    pub message: ResponseMessage,
    /// Reason for stopping.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message inside a completion choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    /// Role.
    #[serde(default)]
    pub role: Option<String>,
    /// Text content.
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    /// Prompt tokens.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Completion tokens.
    #[serde(default)]
    pub completion_tokens: u64,
    /// Total tokens.
    #[serde(default)]
    pub total_tokens: u64,
}

/// Image generation response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageGenerationResponse {
    /// Generated images.
    #[serde(default)]
    pub data: Vec<ImageData>,
}

/// A generated image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageData {
    /// Hosted image URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Prompt as rewritten by the provider.
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

/// Error envelope returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Error details.
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error message.
    pub message: String,
    /// Error type.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Error code.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}
