pub mod models;

use crate::config::KeyFromEnv;
use crate::core::CompletionService;
use crate::error::{AIError, ConfigError, ProviderError};
use async_trait::async_trait;
use models::OpenAIModel;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: OpenAIModel,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: OpenAIModel::default(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OpenAIClient {
    config: OpenAIConfig,
    http: reqwest::Client,
}

impl KeyFromEnv for OpenAIClient {
    const KEY_NAME: &'static str = "OPENAI_API_KEY";
}

impl OpenAIClient {
    pub fn new(config: OpenAIConfig) -> Self {
        info!(model = %config.model.id(), "Creating new OpenAI client");
        Self { config, http: reqwest::Client::new() }
    }

    /// Key from the environment or `.env`, prompting on the terminal if absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = Self::find_key_with_user()?;
        Ok(Self::new(OpenAIConfig { api_key, ..Default::default() }))
    }

    pub fn with_model(mut self, model: OpenAIModel) -> Self {
        self.config.model = model;
        self
    }

    fn messages_body(&self, prompt: String) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model.id(),
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        })
    }
}

#[async_trait]
impl CompletionService for OpenAIClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model.id()))]
    async fn complete(&self, prompt: String) -> Result<String, AIError> {
        let body = self.messages_body(prompt);
        let resp = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                AIError::OpenAI(ProviderError::Http(e.to_string()))
            })?;

        debug!(status = %resp.status(), "Received response from OpenAI API");

        if resp.status() == 401 {
            error!("OpenAI API authentication failed");
            return Err(AIError::OpenAI(ProviderError::Authentication));
        }
        if resp.status() == 429 {
            warn!("OpenAI API rate limit exceeded");
            return Err(AIError::OpenAI(ProviderError::RateLimit));
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let txt = resp.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %txt, "OpenAI API error");
            return Err(AIError::OpenAI(ProviderError::Api(txt)));
        }

        let parsed: ChatResponse = resp.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse OpenAI response JSON");
            AIError::OpenAI(ProviderError::Http(e.to_string()))
        })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                error!("No choices in OpenAI response");
                AIError::OpenAI(ProviderError::Api("No choices in response".to_string()))
            })?;

        info!(response_len = content.len(), "Successfully received OpenAI response");
        Ok(content)
    }

    fn clone_box(&self) -> Box<dyn CompletionService> {
        Box::new(self.clone())
    }
}
