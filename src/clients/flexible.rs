use crate::clients::{DeepSeekClient, DeepSeekModel, MockClient, OpenAIClient, OpenAIModel};
use crate::config::KeyFromEnv;
use crate::core::CompletionService;
use crate::error::{AIError, ConfigError};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Canned quiz served by `ClientType::Mock` so the app runs without an API key.
pub const DEMO_QUIZ: &str = "\
- Questions:
    1. Which keyword declares an immutable binding in Rust?
        a. var
        b. let
        c. mut
        d. const fn
    2. What does the `?` operator do on an `Err` value?
        a. Panics
        b. Ignores it
        c. Returns it early from the function
        d. Converts it to `None`
    3. Which type owns a heap-allocated, growable string?
        a. String
        b. &str
        c. char
        d. [u8; 4]
Answers:
1: b
2: c
3: a";

/// Backend selection for the completion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientType {
    OpenAI,
    DeepSeek,
    Mock,
}

impl Default for ClientType {
    /// First backend with a configured key, else the mock.
    fn default() -> Self {
        if OpenAIClient::find_key().is_some() {
            Self::OpenAI
        } else if DeepSeekClient::find_key().is_some() {
            Self::DeepSeek
        } else {
            Self::Mock
        }
    }
}

impl FromStr for ClientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "deepseek" => Ok(Self::DeepSeek),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown client type: '{}'. Supported: openai, deepseek, mock", s)),
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientType::OpenAI => write!(f, "OpenAI"),
            ClientType::DeepSeek => write!(f, "DeepSeek"),
            ClientType::Mock => write!(f, "Mock"),
        }
    }
}

impl ClientType {
    /// Build the backend. `model` is a provider model id; `None` keeps the provider default.
    pub fn into_client(self, model: Option<&str>) -> Result<Box<dyn CompletionService>, ConfigError> {
        let client: Box<dyn CompletionService> = match self {
            ClientType::OpenAI => {
                let client = OpenAIClient::from_env()?;
                Box::new(match model {
                    Some(id) => client.with_model(OpenAIModel::from_id(id)),
                    None => client,
                })
            }
            ClientType::DeepSeek => {
                let client = DeepSeekClient::from_env()?;
                Box::new(match model {
                    Some(id) => client.with_model(DeepSeekModel::from_id(id)),
                    None => client,
                })
            }
            ClientType::Mock => {
                if let Some(id) = model {
                    debug!(model = id, "Mock client ignores the model id");
                }
                let (mock, handle) = MockClient::new();
                handle.set_fallback(DEMO_QUIZ);
                Box::new(mock)
            }
        };
        Ok(client)
    }
}

/// Wraps any boxed completion service behind one concrete, cloneable type
#[derive(Debug, Clone)]
pub struct FlexibleClient {
    inner: Arc<Mutex<Box<dyn CompletionService>>>,
}

impl FlexibleClient {
    pub fn new(client: Box<dyn CompletionService>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    pub fn from_type(client_type: ClientType, model: Option<&str>) -> Result<Self, ConfigError> {
        info!(client = %client_type, model = model.unwrap_or("default"), "Creating completion client");
        Ok(Self::new(client_type.into_client(model)?))
    }

    /// Mock-backed client plus its control handle
    pub fn mock() -> (Self, Arc<crate::clients::MockHandle>) {
        let (mock_client, handle) = MockClient::new();
        (Self::new(Box::new(mock_client)), handle)
    }

    fn snapshot(&self) -> Box<dyn CompletionService> {
        let inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.clone_box()
    }
}

#[async_trait]
impl CompletionService for FlexibleClient {
    async fn complete(&self, prompt: String) -> Result<String, AIError> {
        // Clone out so the mutex is not held across the await
        let client = self.snapshot();
        client.complete(prompt).await
    }

    fn clone_box(&self) -> Box<dyn CompletionService> {
        Box::new(self.clone())
    }
}
