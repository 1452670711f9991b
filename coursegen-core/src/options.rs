//! Per-call generation options and result sinks.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay for exponential backoff.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Receiver for the completed text of a successful completion call.
///
/// A sink is invoked exactly once per successful call, with the full text.
/// Incremental (token-by-token) delivery is not part of this contract.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Receive the completed text. An error fails the surrounding call.
    async fn deliver(&self, text: &str) -> anyhow::Result<()>;
}

/// Sink backed by a synchronous closure.
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: Fn(&str) -> anyhow::Result<()> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> ResultSink for FnSink<F>
where
    F: Fn(&str) -> anyhow::Result<()> + Send + Sync,
{
    async fn deliver(&self, text: &str) -> anyhow::Result<()> {
        (self.0)(text)
    }
}

/// Sink backed by an asynchronous closure.
pub struct AsyncFnSink<F>(F);

impl<F, Fut> AsyncFnSink<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    /// Wrap an async closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> ResultSink for AsyncFnSink<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn deliver(&self, text: &str) -> anyhow::Result<()> {
        (self.0)(text.to_string()).await
    }
}

/// Options for a single generation call.
///
/// Options are resolved once when an operation starts and are not changed
/// while it runs.
#[derive(Clone)]
pub struct GenerationOptions {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Cancellation token for the whole call.
    pub cancellation: Option<CancellationToken>,
    /// Sink receiving the raw completion text.
    pub on_result: Option<Arc<dyn ResultSink>>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            cancellation: None,
            on_result: None,
        }
    }
}

impl fmt::Debug for GenerationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationOptions")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("cancellation", &self.cancellation)
            .field("on_result", &self.on_result.is_some())
            .finish()
    }
}

impl GenerationOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max retries.
    #[must_use]
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the base backoff delay.
    #[must_use]
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Attach a result sink.
    #[must_use]
    pub fn on_result(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.on_result = Some(sink);
        self
    }

    /// Attach a synchronous closure as the result sink.
    #[must_use]
    pub fn on_result_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_result(Arc::new(FnSink::new(f)))
    }

    /// Whether the attached token (if any) has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}
