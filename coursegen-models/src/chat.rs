//! Chat completions client.

use crate::config::ClientConfig;
use crate::error::ModelError;
use crate::model::{run_cancellable, CompletionModel};
use crate::request::CompletionRequest;
use crate::types::{ApiError, ChatCompletionResponse};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Client for the chat completions endpoint.
///
/// Cheap to clone; clones share the connection pool. Construct one per
/// process and pass it to every operation.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    config: ClientConfig,
}

impl CompletionClient {
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

    /// The underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Start a request with authorization and service-identifying headers.
    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        authorized_post(&self.client, &self.config, path)
    }

    /// Pull the completion text out of a decoded response.
    fn parse_response(resp: ChatCompletionResponse) -> Result<String, ModelError> {
        resp.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ModelError::EmptyContent)
    }
}

#[async_trait]
impl CompletionModel for CompletionClient {
    fn name(&self) -> &str {
        self.config.model()
    }

    async fn request(
        &self,
        request: &CompletionRequest,
        cancellation: Option<&CancellationToken>,
    ) -> Result<String, ModelError> {
        let body = request.to_wire();
        let started = Instant::now();

        debug!(
            model = %body.model,
            max_tokens = body.max_tokens,
            "Sending completion request"
        );

        let exchange = async {
            let response = self.post("chat/completions").json(&body).send().await?;
            let response = check_response(response).await?;

            let resp: ChatCompletionResponse = read_json(response).await?;

            if let Some(usage) = resp.usage {
                debug!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "Completion usage"
                );
            }

            Self::parse_response(resp)
        };

        let result = run_cancellable(cancellation, exchange).await;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Completion request finished"
        );

        result
    }
}

pub(crate) fn authorized_post(client: &Client, config: &ClientConfig, path: &str) -> RequestBuilder {
    let mut request = client
        .post(config.endpoint(path))
        .header("Authorization", format!("Bearer {}", config.api_key()))
        .header("Content-Type", "application/json")
        .timeout(config.timeout());

    if let Some(url) = config.app_url() {
        request = request.header("HTTP-Referer", url);
    }
    if let Some(title) = config.app_title() {
        request = request.header("X-Title", title);
    }

    request
}

/// Turn a non-success response into [`ModelError::Http`].
///
/// The body is read best effort; an unreadable body yields a generic
/// message instead of a second error.
pub(crate) async fn check_response(response: Response) -> Result<Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(text) => diagnostic_message(&text),
        Err(_) => None,
    }
    .unwrap_or_else(|| {
        format!(
            "request failed with status {}",
            status.canonical_reason().unwrap_or("unknown")
        )
    });

    debug!(status = status.as_u16(), body = %body, "Endpoint returned error status");
    Err(ModelError::http(status.as_u16(), body))
}

/// Read a success body and decode it.
///
/// A failure while reading is a transport failure (timeout or dropped
/// connection); only a body that arrived whole and does not decode is an
/// [`ModelError::InvalidResponse`].
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ModelError> {
    let body = response.bytes().await.map_err(body_read_error)?;
    serde_json::from_slice(&body).map_err(|e| ModelError::invalid_response(e.to_string()))
}

fn body_read_error(err: reqwest::Error) -> ModelError {
    if err.is_timeout() {
        ModelError::Timeout(err.to_string())
    } else {
        ModelError::connection(format!("failed to read response body: {err}"))
    }
}

/// Prefer the API's own error message; fall back to the raw text.
fn diagnostic_message(text: &str) -> Option<String> {
    if let Ok(err) = serde_json::from_str::<ApiError>(text) {
        return Some(err.error.message);
    }
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
