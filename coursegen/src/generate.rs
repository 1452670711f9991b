//! Generation operations.
//!
//! Every operation runs the same four stages:
//!
//! 1. resolve [`GenerationOptions`] into a retry policy and call options;
//! 2. interpolate the operation's fixed prompt template with the input;
//! 3. run exactly one completion per attempt inside the retry executor;
//! 4. extract the JSON artifact from the completion text.
//!
//! Operations differ only in the row they read from [`OPERATIONS`].

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use coursegen_core::{CancellationToken, GenerationOptions, PromptTemplate};
use coursegen_models::{
    AspectRatio, CallOptions, ClientConfig, CompletionClient, CompletionModel, CompletionRequest,
    ImageClient, ImageResult,
};
use coursegen_output::{extract_json, parse_json_from_text};
use coursegen_retries::{with_retry_state, RetryCondition, RetryPolicy};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::artifacts::{
    CourseOutline, Lesson, LessonInput, OutlineInput, PromptValues, Quiz, QuizInput, Rewrite,
    RewriteInput, Summary, SummaryInput,
};
use crate::error::GenerationError;
use crate::prompts;

/// The generation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Course outline.
    Outline,
    /// Lesson expansion.
    Lesson,
    /// Quiz.
    Quiz,
    /// Summary.
    Summary,
    /// Content rewrite.
    Rewrite,
}

impl OperationKind {
    /// All operations, in table order.
    pub const ALL: [OperationKind; 5] = [
        Self::Outline,
        Self::Lesson,
        Self::Quiz,
        Self::Summary,
        Self::Rewrite,
    ];

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// The operation's table row.
    pub fn spec(self) -> &'static OperationSpec {
        let index = match self {
            Self::Outline => 0,
            Self::Lesson => 1,
            Self::Quiz => 2,
            Self::Summary => 3,
            Self::Rewrite => 4,
        };
        &OPERATIONS[index]
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What distinguishes one operation from another.
#[derive(Debug, Clone, Copy)]
pub struct OperationSpec {
    /// Operation kind.
    pub kind: OperationKind,
    /// Name used in logs.
    pub name: &'static str,
    /// System prompt.
    pub system_prompt: &'static str,
    /// User message template.
    pub template: PromptTemplate,
    /// Output token budget.
    pub max_output_tokens: u32,
}

/// Per-operation settings, indexed by [`OperationKind`].
pub static OPERATIONS: [OperationSpec; 5] = [
    OperationSpec {
        kind: OperationKind::Outline,
        name: "outline",
        system_prompt: prompts::SYSTEM_PROMPT,
        template: prompts::OUTLINE,
        max_output_tokens: 4000,
    },
    OperationSpec {
        kind: OperationKind::Lesson,
        name: "lesson",
        system_prompt: prompts::SYSTEM_PROMPT,
        template: prompts::LESSON,
        max_output_tokens: 4000,
    },
    OperationSpec {
        kind: OperationKind::Quiz,
        name: "quiz",
        system_prompt: prompts::SYSTEM_PROMPT,
        template: prompts::QUIZ,
        max_output_tokens: 2000,
    },
    OperationSpec {
        kind: OperationKind::Summary,
        name: "summary",
        system_prompt: prompts::SYSTEM_PROMPT,
        template: prompts::SUMMARY,
        max_output_tokens: 1000,
    },
    OperationSpec {
        kind: OperationKind::Rewrite,
        name: "rewrite",
        system_prompt: prompts::SYSTEM_PROMPT,
        template: prompts::REWRITE,
        max_output_tokens: 2000,
    },
];

/// Handle for running generation operations.
///
/// Construct one at startup and share it; clones share the underlying
/// HTTP connection pool. Concurrent calls are independent.
///
/// ```rust,ignore
/// use coursegen::{Generator, GenerationOptions, OutlineInput};
///
/// let generator = Generator::from_env()?;
/// let outline = generator
///     .generate_outline(&OutlineInput::new("Knots", "sailors", 3), GenerationOptions::default())
///     .await?;
/// ```
#[derive(Clone)]
pub struct Generator {
    model: Arc<dyn CompletionModel>,
    images: Option<Arc<ImageClient>>,
    condition: RetryCondition,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("model", &self.model.name())
            .field("images", &self.images.is_some())
            .field("condition", &self.condition)
            .finish()
    }
}

impl Generator {
    /// Create a generator with completion and image clients built from `config`.
    ///
    /// Both clients share one connection pool.
    pub fn new(config: ClientConfig) -> Self {
        let completion = CompletionClient::new(config);
        let images = ImageClient::sharing(&completion);
        Self::with_model(Arc::new(completion)).with_images(images)
    }

    /// Create a generator from the process environment.
    pub fn from_env() -> Result<Self, GenerationError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Create a generator over any completion model, without image support.
    pub fn with_model(model: Arc<dyn CompletionModel>) -> Self {
        Self {
            model,
            images: None,
            condition: RetryCondition::default(),
        }
    }

    /// Attach an image client.
    #[must_use]
    pub fn with_images(mut self, images: ImageClient) -> Self {
        self.images = Some(Arc::new(images));
        self
    }

    /// Replace the transient-failure condition.
    #[must_use]
    pub fn with_retry_condition(mut self, condition: RetryCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Name of the completion model.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Generate a course outline.
    pub async fn generate_outline(
        &self,
        input: &OutlineInput,
        options: GenerationOptions,
    ) -> Result<CourseOutline, GenerationError> {
        self.run(OperationKind::Outline, input, options).await
    }

    /// Write the full body of one lesson.
    pub async fn expand_lesson(
        &self,
        input: &LessonInput,
        options: GenerationOptions,
    ) -> Result<Lesson, GenerationError> {
        self.run(OperationKind::Lesson, input, options).await
    }

    /// Generate a quiz over a lesson.
    pub async fn generate_quiz(
        &self,
        input: &QuizInput,
        options: GenerationOptions,
    ) -> Result<Quiz, GenerationError> {
        self.run(OperationKind::Quiz, input, options).await
    }

    /// Summarize course material.
    pub async fn generate_summary(
        &self,
        input: &SummaryInput,
        options: GenerationOptions,
    ) -> Result<Summary, GenerationError> {
        self.run(OperationKind::Summary, input, options).await
    }

    /// Rewrite content following an instruction.
    pub async fn rewrite_content(
        &self,
        input: &RewriteInput,
        options: GenerationOptions,
    ) -> Result<Rewrite, GenerationError> {
        self.run(OperationKind::Rewrite, input, options).await
    }

    /// Run an operation and deserialize its artifact into `T`.
    pub async fn run<I, T>(
        &self,
        kind: OperationKind,
        input: &I,
        options: GenerationOptions,
    ) -> Result<T, GenerationError>
    where
        I: PromptValues + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.complete(kind, input, &options).await?;
        Ok(parse_json_from_text(&text)?)
    }

    /// Run an operation and return the extracted JSON untyped.
    pub async fn run_raw<I>(
        &self,
        kind: OperationKind,
        input: &I,
        options: GenerationOptions,
    ) -> Result<JsonValue, GenerationError>
    where
        I: PromptValues + ?Sized,
    {
        let text = self.complete(kind, input, &options).await?;
        Ok(extract_json(&text)?)
    }

    /// Build the request for `kind` and run it through the retry executor.
    async fn complete<I>(
        &self,
        kind: OperationKind,
        input: &I,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>
    where
        I: PromptValues + ?Sized,
    {
        let spec = kind.spec();
        let user_message = spec.template.render(&input.prompt_values())?;

        let request = CompletionRequest::new(self.model.name(), spec.system_prompt, user_message)
            .max_output_tokens(spec.max_output_tokens);
        let policy = RetryPolicy::from(options);
        let call = CallOptions::from(options);
        let model: &dyn CompletionModel = self.model.as_ref();
        let request = &request;

        debug!(operation = spec.name, max_retries = policy.max_retries, "Starting generation");
        let started = Instant::now();

        let (result, state) = with_retry_state(&policy, &self.condition, move || {
            model.complete(request, call)
        })
        .await;

        match result {
            Ok(text) => {
                info!(
                    operation = spec.name,
                    attempts = state.attempts,
                    wait_ms = state.total_wait_time.as_millis() as u64,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Generation completed"
                );
                Ok(text)
            }
            Err(err) => {
                let err = GenerationError::from(err);
                if err.is_cancelled() {
                    debug!(operation = spec.name, attempts = state.attempts, "Generation cancelled");
                } else {
                    warn!(
                        operation = spec.name,
                        attempts = state.attempts,
                        error = %err,
                        "Generation failed"
                    );
                }
                Err(err)
            }
        }
    }

    /// Generate a cover image. One-shot; no retry.
    pub async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        cancellation: Option<&CancellationToken>,
    ) -> Result<ImageResult, GenerationError> {
        let images = self.images.as_ref().ok_or_else(|| {
            GenerationError::Configuration("no image client configured".to_string())
        })?;

        let image = images.generate(prompt, aspect_ratio, cancellation).await?;
        info!(aspect_ratio = %aspect_ratio, "Image generated");
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegen_models::{MockModel, ModelError};
    use coursegen_output::OutputParseError;
    use coursegen_retries::TransientCause;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    fn generator(model: &MockModel) -> Generator {
        Generator::with_model(Arc::new(model.clone()))
    }

    fn fast() -> GenerationOptions {
        GenerationOptions::new().base_delay(Duration::from_millis(100))
    }

    fn outline_input() -> OutlineInput {
        OutlineInput::new("Knots", "sailors", 3)
    }

    #[tokio::test]
    async fn test_outline_first_attempt() {
        let model = MockModel::new("mock").with_text_response(r#"{"title":"X","modules":[]}"#);

        let outline = generator(&model)
            .generate_outline(&outline_input(), fast())
            .await
            .unwrap();

        assert_eq!(outline.title, "X");
        assert!(outline.modules.is_empty());
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_operation_settings() {
        let model = MockModel::new("gpt-test").with_text_response(r#"{"title":"X"}"#);

        generator(&model)
            .generate_outline(&outline_input(), fast())
            .await
            .unwrap();

        let request = &model.recorded_requests()[0];
        assert_eq!(request.model, "gpt-test");
        assert_eq!(request.max_output_tokens, 4000);
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.system_prompt, prompts::SYSTEM_PROMPT);
        assert!(request.user_message.contains("Topic: Knots"));
        assert!(request.user_message.contains("Number of modules: 3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_then_success_sends_identical_requests() {
        let model = MockModel::new("mock")
            .with_error(ModelError::http(429, "slow down"))
            .with_error(ModelError::http(429, "slow down"))
            .with_text_response(r#"{"title":"X","modules":[]}"#);

        let started = tokio::time::Instant::now();
        let outline = generator(&model)
            .generate_outline(&outline_input(), fast())
            .await
            .unwrap();

        assert_eq!(outline.title, "X");
        let requests = model.recorded_requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| *r == requests[0]));

        // 100ms * (1 + 2) with jitter in [0.75, 1.25]
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(225), "{elapsed:?}");
        assert!(elapsed <= Duration::from_millis(380), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted_is_transient() {
        let mut model = MockModel::new("mock");
        for _ in 0..3 {
            model = model.with_error(ModelError::http(503, "busy"));
        }

        let err = generator(&model)
            .generate_outline(&outline_input(), fast().max_retries(2))
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert!(matches!(
            err,
            GenerationError::Transient {
                cause: TransientCause::Status(503),
                ..
            }
        ));
        assert_eq!(model.call_count(), 3);
    }

    #[tokio::test]
    async fn test_permanent_status_not_retried() {
        let model = MockModel::new("mock")
            .with_error(ModelError::http(404, "no such model"))
            .with_text_response("unused");

        let err = generator(&model)
            .generate_outline(&outline_input(), fast())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Permanent(_)));
        assert_eq!(err.status(), Some(404));
        assert_eq!(model.call_count(), 1);
    }

    /// Empty content is permanent: a success response without content is a
    /// contract violation, not a condition that changes on replay.
    #[tokio::test]
    async fn test_empty_content_is_permanent() {
        let model = MockModel::new("mock")
            .with_error(ModelError::EmptyContent)
            .with_text_response("unused");

        let err = generator(&model)
            .generate_summary(
                &SummaryInput {
                    title: "t".into(),
                    content: "c".into(),
                    max_words: 50,
                },
                fast(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Permanent(ModelError::EmptyContent)));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_extraction_failures_are_not_retried() {
        let model = MockModel::new("mock")
            .with_text_response("Sorry, I cannot help with that.")
            .with_text_response(r#"{"title":"X"}"#);

        let err = generator(&model)
            .generate_outline(&outline_input(), fast())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GenerationError::Extraction(OutputParseError::NoJsonFound)
        ));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_precancelled_makes_no_call() {
        let model = MockModel::new("mock").with_text_response(r#"{"title":"X"}"#);
        let token = CancellationToken::new();
        token.cancel();

        let err = generator(&model)
            .generate_outline(&outline_input(), fast().cancellation(token))
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(err.user_message(), None);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let model = MockModel::new("mock")
            .with_error(ModelError::http(500, "oops"))
            .with_text_response(r#"{"title":"X"}"#);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let started = tokio::time::Instant::now();
        let err = generator(&model)
            .generate_outline(
                &outline_input(),
                GenerationOptions::new()
                    .base_delay(Duration::from_secs(60))
                    .cancellation(token),
            )
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(45));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_placeholder_fails_before_any_call() {
        let model = MockModel::new("mock").with_text_response(r#"{"title":"X"}"#);
        let values: HashMap<&'static str, String> = HashMap::from([("topic", "x".to_string())]);

        let err = generator(&model)
            .run_raw(OperationKind::Outline, &values, fast())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::MissingPlaceholder(_)));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_sink_receives_text_once() {
        let model = MockModel::new("mock")
            .with_error(ModelError::connection("reset"))
            .with_text_response(r#"{"content": "Simpler.", "notes": "shorter"}"#);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let rewrite = generator(&model)
            .rewrite_content(
                &RewriteInput {
                    content: "Complicated.".into(),
                    instruction: "simplify".into(),
                },
                GenerationOptions::new()
                    .base_delay(Duration::from_millis(1))
                    .on_result_fn(move |text| {
                        seen_clone.lock().unwrap().push(text.to_string());
                        Ok(())
                    }),
            )
            .await
            .unwrap();

        assert_eq!(rewrite.content, "Simpler.");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("Simpler."));
    }

    #[tokio::test]
    async fn test_run_raw_returns_value() {
        let model = MockModel::new("mock").with_text_response("Here: {\"anything\": [1, 2]} ok");

        let value = generator(&model)
            .run_raw(
                OperationKind::Rewrite,
                &RewriteInput {
                    content: "a".into(),
                    instruction: "b".into(),
                },
                fast(),
            )
            .await
            .unwrap();

        assert_eq!(value, serde_json::json!({"anything": [1, 2]}));
    }

    #[test]
    fn test_operation_table() {
        let budgets: Vec<(&str, u32)> = OperationKind::ALL
            .iter()
            .map(|kind| (kind.name(), kind.spec().max_output_tokens))
            .collect();
        assert_eq!(
            budgets,
            vec![
                ("outline", 4000),
                ("lesson", 4000),
                ("quiz", 2000),
                ("summary", 1000),
                ("rewrite", 2000),
            ]
        );
        for kind in OperationKind::ALL {
            assert_eq!(kind.spec().kind, kind);
        }
    }

    fn sample_input(kind: OperationKind) -> HashMap<&'static str, String> {
        kind.spec()
            .template
            .placeholders
            .iter()
            .map(|name| (*name, format!("<{name}>")))
            .collect()
    }

    /// The five operations are the same pipeline over different table rows:
    /// each retries the same way, sends its own budget, and extracts the same way.
    #[tokio::test(start_paused = true)]
    async fn test_all_operations_share_the_pipeline() {
        for kind in OperationKind::ALL {
            let model = MockModel::new("mock")
                .with_error(ModelError::http(529, "overloaded"))
                .with_text_response(format!("Result for {kind}: {{\"kind\": \"{kind}\"}}"));

            let value = generator(&model)
                .run_raw(kind, &sample_input(kind), fast())
                .await
                .unwrap();

            assert_eq!(value, serde_json::json!({"kind": kind.name()}));
            let requests = model.recorded_requests();
            assert_eq!(requests.len(), 2, "{kind}");
            assert_eq!(requests[0], requests[1]);
            assert_eq!(requests[0].max_output_tokens, kind.spec().max_output_tokens);
            for name in kind.spec().template.placeholders {
                assert!(requests[0].user_message.contains(&format!("<{name}>")));
            }
        }
    }

    #[tokio::test]
    async fn test_typed_operations_use_their_table_rows() {
        let model = MockModel::new("mock")
            .with_text_response(r##"{"title": "L", "content": "# Body"}"##)
            .with_text_response(
                r#"{"questions": [{"question": "q", "options": ["a", "b"], "correct_index": 1}]}"#,
            )
            .with_text_response(r#"{"summary": "short"}"#);
        let generator = generator(&model);

        let lesson = generator
            .expand_lesson(
                &LessonInput {
                    course_title: "C".into(),
                    module_title: "M".into(),
                    lesson_title: "L".into(),
                    lesson_summary: String::new(),
                    audience: "all".into(),
                },
                fast(),
            )
            .await
            .unwrap();
        assert_eq!(lesson.content, "# Body");

        let quiz = generator
            .generate_quiz(
                &QuizInput {
                    lesson_title: "L".into(),
                    lesson_content: "# Body".into(),
                    question_count: 1,
                },
                fast(),
            )
            .await
            .unwrap();
        assert_eq!(quiz.questions[0].correct_option(), Some("b"));

        let summary = generator
            .generate_summary(
                &SummaryInput {
                    title: "L".into(),
                    content: "# Body".into(),
                    max_words: 20,
                },
                fast(),
            )
            .await
            .unwrap();
        assert_eq!(summary.summary, "short");

        let budgets: Vec<u32> = model
            .recorded_requests()
            .iter()
            .map(|r| r.max_output_tokens)
            .collect();
        assert_eq!(budgets, vec![4000, 2000, 1000]);
    }

    #[tokio::test]
    async fn test_image_without_client_is_configuration_error() {
        let model = MockModel::new("mock");
        let err = generator(&model)
            .generate_image("x", AspectRatio::Widescreen, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));
    }

    #[test]
    fn test_map_prompt_values() {
        let values = sample_input(OperationKind::Quiz);
        assert_eq!(values.prompt_values().len(), 3);
    }
}
