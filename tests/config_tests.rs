use quizsmith::clients::{ClientType, DeepSeekModel, OpenAIModel};
use quizsmith::config::{KeyFromEnv, QuizConfig};
use quizsmith::core::RetryConfig;
use quizsmith::error::{AIError, ConfigError, ProviderError, QuizError};
use std::time::Duration;

struct UnsetKey;

impl KeyFromEnv for UnsetKey {
    const KEY_NAME: &'static str = "QUIZSMITH_TEST_KEY_THAT_IS_NEVER_SET";
}

#[test]
fn client_type_parsing() {
    assert_eq!("openai".parse::<ClientType>(), Ok(ClientType::OpenAI));
    assert_eq!("DeepSeek".parse::<ClientType>(), Ok(ClientType::DeepSeek));
    assert_eq!("MOCK".parse::<ClientType>(), Ok(ClientType::Mock));
    assert!("claude".parse::<ClientType>().is_err());
}

#[test]
fn missing_key_is_reported_by_name() {
    assert!(UnsetKey::find_key().is_none());
    match UnsetKey::require_key() {
        Err(ConfigError::MissingKey(name)) => assert_eq!(name, UnsetKey::KEY_NAME),
        other => panic!("expected missing key, got {:?}", other),
    }
}

#[test]
fn retry_budgets_by_kind() {
    let config = RetryConfig::default();
    assert_eq!(config.retries_for("rate_limit"), 2);
    assert_eq!(config.retries_for("something_else"), config.default_max_retries);

    let none = RetryConfig::none();
    assert_eq!(none.retries_for("rate_limit"), 0);
    assert_eq!(none.retries_for("timeout"), 0);

    let uniform = RetryConfig::default().with_uniform_retries(4);
    assert_eq!(uniform.retries_for("api_error"), 4);
    assert_eq!(uniform.retries_for("unknown"), 4);
}

#[test]
fn backoff_doubles() {
    let config = RetryConfig::default().with_backoff(Duration::from_millis(100));
    assert_eq!(config.backoff_for(0), Duration::from_millis(100));
    assert_eq!(config.backoff_for(1), Duration::from_millis(200));
    assert_eq!(config.backoff_for(3), Duration::from_millis(800));
}

#[test]
fn error_kinds_drive_retry_classification() {
    let rate = QuizError::Ai(AIError::OpenAI(ProviderError::RateLimit));
    let auth = QuizError::Ai(AIError::DeepSeek(ProviderError::Authentication));
    let timeout = QuizError::Timeout { after: Duration::from_secs(1) };
    let bad_request = QuizError::InvalidRequest("zero questions".into());

    assert_eq!(rate.retry_kind(), Some("rate_limit"));
    assert_eq!(auth.retry_kind(), None);
    assert_eq!(timeout.retry_kind(), Some("timeout"));
    assert_eq!(bad_request.retry_kind(), None);
}

const QUIZ_VARS: [&str; 6] = [
    "QUIZ_CLIENT",
    "QUIZ_MODEL",
    "QUIZ_TIMEOUT_SECS",
    "QUIZ_MAX_RETRIES",
    "QUIZ_BACKOFF_MS",
    "QUIZ_TRANSCRIPT_DIR",
];

fn clear_quiz_vars() {
    for name in QUIZ_VARS {
        std::env::remove_var(name);
    }
}

// One test owns the QUIZ_* variables so parallel tests never race on them.
#[test]
fn quiz_config_from_env() {
    clear_quiz_vars();
    std::env::set_var("QUIZ_CLIENT", "mock");

    let defaults = QuizConfig::from_env().unwrap();
    assert_eq!(defaults.client, ClientType::Mock);
    assert_eq!(defaults.model, None);
    assert_eq!(defaults.timeout, Duration::from_secs(60));
    assert_eq!(defaults.max_retries, 2);
    assert_eq!(defaults.initial_backoff, Duration::from_millis(500));
    assert_eq!(defaults.transcript_dir, None);

    std::env::set_var("QUIZ_MODEL", "deepseek-reasoner");
    std::env::set_var("QUIZ_TIMEOUT_SECS", " 15 ");
    std::env::set_var("QUIZ_MAX_RETRIES", "0");
    std::env::set_var("QUIZ_BACKOFF_MS", "25");
    std::env::set_var("QUIZ_TRANSCRIPT_DIR", "/tmp/quiz-transcripts");

    let overridden = QuizConfig::from_env().unwrap();
    assert_eq!(overridden.model.as_deref(), Some("deepseek-reasoner"));
    assert_eq!(overridden.timeout, Duration::from_secs(15));
    assert_eq!(overridden.max_retries, 0);
    assert_eq!(overridden.initial_backoff, Duration::from_millis(25));
    assert_eq!(overridden.transcript_dir, Some(std::path::PathBuf::from("/tmp/quiz-transcripts")));

    let retry = overridden.retry_config();
    assert_eq!(retry.timeout, Duration::from_secs(15));
    assert_eq!(retry.retries_for("rate_limit"), 0);
    assert_eq!(retry.backoff_for(1), Duration::from_millis(50));

    std::env::set_var("QUIZ_TIMEOUT_SECS", "soon");
    match QuizConfig::from_env() {
        Err(ConfigError::InvalidValue { name, value }) => {
            assert_eq!(name, "QUIZ_TIMEOUT_SECS");
            assert_eq!(value, "soon");
        }
        other => panic!("expected invalid value, got {:?}", other),
    }

    std::env::set_var("QUIZ_TIMEOUT_SECS", "15");
    std::env::set_var("QUIZ_CLIENT", "claude");
    assert!(matches!(
        QuizConfig::from_env(),
        Err(ConfigError::InvalidValue { name: "QUIZ_CLIENT", .. })
    ));

    clear_quiz_vars();
}

#[test]
fn model_ids_map_to_known_variants() {
    assert_eq!(OpenAIModel::default(), OpenAIModel::Gpt35Turbo);
    assert_eq!(OpenAIModel::from_id("gpt-4o-mini"), OpenAIModel::Gpt4oMini);
    assert_eq!(OpenAIModel::from_id("gpt-4.1").id(), "gpt-4.1");

    assert_eq!(DeepSeekModel::default(), DeepSeekModel::Chat);
    assert_eq!(DeepSeekModel::from_id("deepseek-reasoner"), DeepSeekModel::Reasoner);
    assert_eq!(DeepSeekModel::from_id("deepseek-v4"), DeepSeekModel::Override("deepseek-v4".into()));
}
