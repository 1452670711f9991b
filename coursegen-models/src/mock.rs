//! Scripted model for testing.
//!
//! ```rust
//! use coursegen_models::{MockModel, ModelError};
//!
//! let model = MockModel::new("test")
//!     .with_error(ModelError::http(429, "slow down"))
//!     .with_text_response(r#"{"title": "Knots"}"#);
//! assert_eq!(model.remaining(), 2);
//! ```

use crate::error::ModelError;
use crate::model::{run_cancellable, CompletionModel};
use crate::request::CompletionRequest;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct Scripted {
    outcome: Result<String, ModelError>,
    delay: Option<Duration>,
}

/// A model that replays a queue of scripted outcomes.
///
/// Each call pops the next outcome and records the request. Once the queue
/// is empty every call fails with an `InvalidResponse` naming the mock.
/// Clones share the queue and the recording.
#[derive(Debug, Clone)]
pub struct MockModel {
    name: String,
    outcomes: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockModel {
    /// Create a new mock model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful text response.
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()), None)
    }

    /// Queue a failure.
    pub fn with_error(self, error: ModelError) -> Self {
        self.push(Err(error), None)
    }

    /// Queue a text response delivered after `delay`.
    pub fn with_delayed_response(self, text: impl Into<String>, delay: Duration) -> Self {
        self.push(Ok(text.into()), Some(delay))
    }

    fn push(self, outcome: Result<String, ModelError>, delay: Option<Duration>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Scripted { outcome, delay });
        self
    }

    /// Requests received so far, in order.
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl CompletionModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn request(
        &self,
        request: &CompletionRequest,
        cancellation: Option<&CancellationToken>,
    ) -> Result<String, ModelError> {
        let next = {
            self.requests.lock().unwrap().push(request.clone());
            self.outcomes.lock().unwrap().pop_front()
        };

        let Some(Scripted { outcome, delay }) = next else {
            return Err(ModelError::invalid_response(format!(
                "mock model '{}' has no scripted response left",
                self.name
            )));
        };

        run_cancellable(cancellation, async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            outcome
        })
        .await
    }
}
