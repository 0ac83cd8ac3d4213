use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("AI error: {0}")]
    Ai(#[from] AIError),
    #[error("Completion timed out after {after:?}")]
    Timeout { after: Duration },
    #[error("Quiz format error: {0}")]
    Format(#[from] ParseError),
    #[error("Invalid quiz request: {0}")]
    InvalidRequest(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuizError {
    /// Retry bucket for this error, or `None` if it must never be retried.
    pub fn retry_kind(&self) -> Option<&'static str> {
        match self {
            QuizError::Ai(e) => e.kind(),
            QuizError::Timeout { .. } => Some("timeout"),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AIError {
    #[error("OpenAI API error: {0}")]
    OpenAI(ProviderError),
    #[error("DeepSeek API error: {0}")]
    DeepSeek(ProviderError),
    #[error("Mock error: {0}")]
    Mock(ProviderError),
}

impl AIError {
    pub fn provider_error(&self) -> &ProviderError {
        match self {
            AIError::OpenAI(e) | AIError::DeepSeek(e) | AIError::Mock(e) => e,
        }
    }

    /// Classify for `RetryConfig` lookups. Authentication failures are terminal.
    pub fn kind(&self) -> Option<&'static str> {
        match self.provider_error() {
            ProviderError::Http(_) => Some("http_error"),
            ProviderError::Api(_) => Some("api_error"),
            ProviderError::RateLimit => Some("rate_limit"),
            ProviderError::Authentication => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The `Answers:` marker never appears.
    MissingMarker,
    /// The marker appears more than once, so the split is ambiguous.
    DuplicateMarker { count: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} (near: {context:?})", describe(.kind))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Short excerpt of the offending text.
    pub context: String,
}

fn describe(kind: &ParseErrorKind) -> String {
    match kind {
        ParseErrorKind::MissingMarker => "no \"Answers:\" marker in completion".to_string(),
        ParseErrorKind::DuplicateMarker { count } => {
            format!("expected one \"Answers:\" marker, found {}", count)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please generate a quiz and answer the questions first.")]
    PrematureSubmission,
    #[error("No quiz has been generated yet.")]
    NoQuiz,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API key {0} not found in environment or .env")]
    MissingKey(&'static str),
    #[error("Invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
