//! Core completion trait.
//!
//! [`CompletionModel`] is the seam between the generation pipeline and the
//! endpoint: [`CompletionClient`](crate::CompletionClient) talks HTTP,
//! [`MockModel`](crate::MockModel) replays scripted outcomes in tests.

use async_trait::async_trait;
use coursegen_core::{GenerationOptions, ResultSink};
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::ModelError;
use crate::request::CompletionRequest;

/// Per-call options for a single completion.
#[derive(Clone, Copy, Default)]
pub struct CallOptions<'a> {
    /// Token that aborts the in-flight call.
    pub cancellation: Option<&'a CancellationToken>,
    /// Sink receiving the completed text.
    pub sink: Option<&'a dyn ResultSink>,
}

impl<'a> CallOptions<'a> {
    /// Options with neither token nor sink.
    pub fn none() -> Self {
        Self::default()
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Attach a result sink.
    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn ResultSink) -> Self {
        self.sink = Some(sink);
        self
    }
}

impl<'a> From<&'a GenerationOptions> for CallOptions<'a> {
    fn from(options: &'a GenerationOptions) -> Self {
        Self {
            cancellation: options.cancellation.as_ref(),
            sink: options.on_result.as_deref(),
        }
    }
}

/// A completion endpoint.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Model identifier sent with each request.
    fn name(&self) -> &str;

    /// Perform one exchange with the endpoint and return the raw text.
    ///
    /// Implementations abort promptly when `cancellation` fires, returning
    /// [`ModelError::Cancelled`].
    async fn request(
        &self,
        request: &CompletionRequest,
        cancellation: Option<&CancellationToken>,
    ) -> Result<String, ModelError>;

    /// Perform one exchange and hand the text to the sink, if any.
    ///
    /// The sink is awaited before this call completes; its failure is this
    /// call's failure.
    async fn complete(
        &self,
        request: &CompletionRequest,
        call: CallOptions<'_>,
    ) -> Result<String, ModelError> {
        let text = self.request(request, call.cancellation).await?;

        if let Some(sink) = call.sink {
            sink.deliver(&text).await.map_err(ModelError::Sink)?;
        }

        Ok(text)
    }
}

/// Run `future` unless `cancellation` fires first.
///
/// An already-cancelled token wins without polling `future`, so no request
/// is sent.
pub async fn run_cancellable<F, T>(
    cancellation: Option<&CancellationToken>,
    future: F,
) -> Result<T, ModelError>
where
    F: Future<Output = Result<T, ModelError>>,
{
    match cancellation {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(ModelError::Cancelled),
                result = future => result,
            }
        }
        None => future.await,
    }
}
