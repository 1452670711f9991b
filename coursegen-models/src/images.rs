//! Image generation client.
//!
//! Cover images are generated one-shot: there is no retry loop around this
//! endpoint, callers decide whether to try again.

use crate::chat::{authorized_post, check_response, read_json, CompletionClient};
use crate::config::ClientConfig;
use crate::error::ModelError;
use crate::model::run_cancellable;
use crate::types::{ImageGenerationRequest, ImageGenerationResponse};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Requested image shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// `16:9`, rendered at 1792x1024.
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    /// `4:3`, rendered at 1024x1024.
    #[serde(rename = "4:3")]
    Standard,
}

impl AspectRatio {
    /// Output resolution sent to the endpoint.
    pub fn size(self) -> &'static str {
        match self {
            Self::Widescreen => "1792x1024",
            Self::Standard => "1024x1024",
        }
    }

    /// Ratio label, e.g. `16:9`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Widescreen => "16:9",
            Self::Standard => "4:3",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(Self::Widescreen),
            "4:3" => Ok(Self::Standard),
            other => Err(ModelError::configuration(format!(
                "unsupported aspect ratio '{other}' (expected 16:9 or 4:3)"
            ))),
        }
    }
}

/// A generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Hosted image URL.
    pub url: String,
    /// Prompt as rewritten by the provider, if it reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

/// Client for the image generation endpoint.
#[derive(Debug, Clone)]
pub struct ImageClient {
    client: Client,
    config: ClientConfig,
}

impl ImageClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create from the process environment.
    pub fn from_env() -> Result<Self, ModelError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Create a client that reuses the completion client's configuration
    /// and connection pool.
    pub fn sharing(completion: &CompletionClient) -> Self {
        Self {
            client: completion.http_client().clone(),
            config: completion.config().clone(),
        }
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Generate one image.
    pub async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        cancellation: Option<&CancellationToken>,
    ) -> Result<ImageResult, ModelError> {
        let body = ImageGenerationRequest {
            model: self.config.image_model().to_string(),
            prompt: prompt.to_string(),
            n: 1,
            size: aspect_ratio.size().to_string(),
        };

        debug!(model = %body.model, size = %body.size, "Sending image request");

        let exchange = async {
            let response = authorized_post(&self.client, &self.config, "images/generations")
                .json(&body)
                .send()
                .await?;
            let response = check_response(response).await?;

            let resp: ImageGenerationResponse = read_json(response).await?;

            let image = resp
                .data
                .into_iter()
                .next()
                .ok_or_else(|| ModelError::invalid_response("image response contained no data"))?;

            let url = image
                .url
                .filter(|url| !url.is_empty())
                .ok_or_else(|| ModelError::invalid_response("image response contained no URL"))?;

            Ok(ImageResult {
                url,
                revised_prompt: image.revised_prompt,
            })
        };

        run_cancellable(cancellation, exchange).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ImageClient {
        let config = ClientConfig::new("sk-img")
            .with_base_url(&server.uri())
            .unwrap();
        ImageClient::new(config)
    }

    #[rstest]
    #[case("16:9", AspectRatio::Widescreen, "1792x1024")]
    #[case("4:3", AspectRatio::Standard, "1024x1024")]
    #[case(" 4:3 ", AspectRatio::Standard, "1024x1024")]
    fn test_aspect_ratio_parse(
        #[case] input: &str,
        #[case] expected: AspectRatio,
        #[case] size: &str,
    ) {
        let ratio: AspectRatio = input.parse().unwrap();
        assert_eq!(ratio, expected);
        assert_eq!(ratio.size(), size);
    }

    #[test]
    fn test_aspect_ratio_rejects_unknown() {
        assert!("1:1".parse::<AspectRatio>().is_err());
        assert_eq!(AspectRatio::default(), AspectRatio::Widescreen);
        assert_eq!(AspectRatio::Standard.to_string(), "4:3");
        assert_eq!(serde_json::to_value(AspectRatio::Widescreen).unwrap(), json!("16:9"));
    }

    #[tokio::test]
    async fn test_generate_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(header("Authorization", "Bearer sk-img"))
            .and(body_json(json!({
                "model": "dall-e-3",
                "prompt": "a lighthouse at dusk",
                "n": 1,
                "size": "1792x1024"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1,
                "data": [{"url": "https://img.example/1.png", "revised_prompt": "a calm lighthouse"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let image = client_for(&server)
            .generate("a lighthouse at dusk", AspectRatio::Widescreen, None)
            .await
            .unwrap();

        assert_eq!(image.url, "https://img.example/1.png");
        assert_eq!(image.revised_prompt.as_deref(), Some("a calm lighthouse"));
    }

    #[tokio::test]
    async fn test_sharing_reuses_completion_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(header("Authorization", "Bearer sk-shared"))
            .and(header("X-Title", "coursegen"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"url": "https://img.example/2.png"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::new("sk-shared")
            .with_base_url(&server.uri())
            .unwrap();
        let completion = CompletionClient::new(config);
        let images = ImageClient::sharing(&completion);

        assert_eq!(images.config().base_url(), completion.config().base_url());
        let image = images
            .generate("a rope", AspectRatio::Standard, None)
            .await
            .unwrap();
        assert_eq!(image.url, "https://img.example/2.png");
        assert_eq!(image.revised_prompt, None);
    }

    #[tokio::test]
    async fn test_missing_url_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{}]})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate("x", AspectRatio::Standard, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_error_status_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate("x", AspectRatio::Standard, None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_precancelled_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        token.cancel();
        let err = client_for(&server)
            .generate("x", AspectRatio::Widescreen, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Cancelled));
    }
}
