//! Quiz generation pipeline: fills the prompt template, calls a completion
//! service under a timeout and retry policy, and hands the text to the parser.

use crate::error::{AIError, QuizError};
use crate::interceptors::Interceptor;
use crate::parser::{self, ParsedQuiz};
use crate::prompt::{PromptTemplate, QuizRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Text-completion backend.
///
/// Implementors provide `complete`, which sends a prompt and returns the raw
/// model text. Timeouts, retries and parsing are handled by `QuizGenerator`.
#[async_trait]
pub trait CompletionService: Send + Sync + Debug {
    async fn complete(&self, prompt: String) -> Result<String, AIError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn CompletionService>;
}

impl Clone for Box<dyn CompletionService> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl CompletionService for Box<dyn CompletionService> {
    async fn complete(&self, prompt: String) -> Result<String, AIError> {
        self.as_ref().complete(prompt).await
    }

    fn clone_box(&self) -> Box<dyn CompletionService> {
        self.as_ref().clone_box()
    }
}

/// Timeout and retry policy for completion calls.
///
/// `max_retries` is keyed by error kind (`rate_limit`, `http_error`,
/// `api_error`, `timeout`); kinds not listed use `default_max_retries`.
/// Authentication failures are never retried.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: HashMap<String, usize>,
    pub default_max_retries: usize,
    pub timeout: Duration,
    /// Delay before the first retry; doubles on each further retry.
    pub initial_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let mut max_retries = HashMap::new();
        max_retries.insert("rate_limit".to_string(), 2);
        max_retries.insert("api_error".to_string(), 1);
        max_retries.insert("http_error".to_string(), 2);
        max_retries.insert("timeout".to_string(), 1);

        Self {
            max_retries,
            default_max_retries: 1,
            timeout: Duration::from_secs(60),
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryConfig {
    /// No retries at all, same timeout.
    pub fn none() -> Self {
        Self {
            max_retries: HashMap::new(),
            default_max_retries: 0,
            ..Default::default()
        }
    }

    pub fn retries_for(&self, kind: &str) -> usize {
        self.max_retries.get(kind).copied().unwrap_or(self.default_max_retries)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Use the same budget for every retryable kind.
    pub fn with_uniform_retries(mut self, retries: usize) -> Self {
        for budget in self.max_retries.values_mut() {
            *budget = retries;
        }
        self.default_max_retries = retries;
        self
    }

    pub fn backoff_for(&self, retry: u32) -> Duration {
        self.initial_backoff.saturating_mul(2u32.saturating_pow(retry))
    }
}

/// Turns a `QuizRequest` into raw quiz text through a completion service.
#[derive(Clone)]
pub struct QuizGenerator<C: CompletionService> {
    client: C,
    config: RetryConfig,
    template: PromptTemplate,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl<C: CompletionService> Debug for QuizGenerator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizGenerator")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("interceptor", &self.interceptor)
            .finish()
    }
}

impl<C: CompletionService> QuizGenerator<C> {
    pub fn new(client: C, config: RetryConfig) -> Self {
        info!(
            timeout_ms = config.timeout.as_millis() as u64,
            default_max_retries = config.default_max_retries,
            "Creating new QuizGenerator"
        );
        Self {
            client,
            config,
            template: PromptTemplate::default(),
            interceptor: None,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn build_prompt(&self, request: &QuizRequest) -> String {
        self.template.render(request)
    }

    /// Prompt the completion service and return its text unchanged.
    #[instrument(target = "quizsmith::generator", skip(self, request), fields(level = %request.level(), num_questions = request.num_questions()))]
    pub async fn generate(&self, request: &QuizRequest) -> Result<String, QuizError> {
        let prompt = self.build_prompt(request);
        info!(prompt_len = prompt.len(), "Generating quiz");

        let response = self.complete_with_retry(&prompt).await?;

        if let Some(interceptor) = &self.interceptor {
            if let Err(e) = interceptor.save(&prompt, &response).await {
                warn!(error = %e, "Failed to save quiz transcript");
            }
        }

        info!(response_len = response.len(), "Quiz text received");
        Ok(response)
    }

    /// `generate` followed by the marker split.
    pub async fn generate_quiz(&self, request: &QuizRequest) -> Result<ParsedQuiz, QuizError> {
        let raw = self.generate(request).await?;
        let parsed = parser::parse(&raw).map_err(|e| {
            error!(target = "quizsmith::generator", error = %e, "Completion did not follow the quiz format");
            e
        })?;
        Ok(parsed)
    }

    async fn complete_with_retry(&self, prompt: &str) -> Result<String, QuizError> {
        let mut attempts: HashMap<&'static str, usize> = HashMap::new();
        let mut retries: u32 = 0;

        loop {
            debug!(attempt = retries + 1, "Calling completion service");
            let outcome = match tokio::time::timeout(self.config.timeout, self.client.complete(prompt.to_string())).await {
                Ok(Ok(text)) => return Ok(text),
                Ok(Err(e)) => QuizError::Ai(e),
                Err(_) => QuizError::Timeout { after: self.config.timeout },
            };

            let Some(kind) = outcome.retry_kind() else {
                error!(error = %outcome, "Completion failed, not retryable");
                return Err(outcome);
            };

            let used = attempts.entry(kind).or_insert(0);
            if *used >= self.config.retries_for(kind) {
                error!(error = %outcome, kind, retries = *used, "Completion failed, retries exhausted");
                return Err(outcome);
            }
            *used += 1;

            let delay = self.config.backoff_for(retries);
            warn!(error = %outcome, kind, delay_ms = delay.as_millis() as u64, "Completion failed, retrying");
            tokio::time::sleep(delay).await;
            retries += 1;
        }
    }
}
