pub mod models;

use crate::config::KeyFromEnv;
use crate::core::CompletionService;
use crate::error::{AIError, ConfigError, ProviderError};
use async_trait::async_trait;
use models::DeepSeekModel;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Serialize)]
struct DeepSeekRequest<'a> {
    model: &'a str,
    messages: Vec<DeepSeekMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct DeepSeekMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct DeepSeekResponse {
    choices: Vec<DeepSeekChoice>,
}

#[derive(Debug, Deserialize)]
struct DeepSeekChoice {
    message: DeepSeekResponseMessage,
}

#[derive(Debug, Deserialize)]
struct DeepSeekResponseMessage {
    content: String,
}

/// Configuration for DeepSeek client
#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    pub api_key: String,
    pub model: DeepSeekModel,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DeepSeekModel::default(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DeepSeekClient {
    config: DeepSeekConfig,
    client: Client,
}

impl KeyFromEnv for DeepSeekClient {
    const KEY_NAME: &'static str = "DEEPSEEK_API_KEY";
}

impl DeepSeekClient {
    pub fn new(config: DeepSeekConfig) -> Self {
        info!(model = %config.model.id(), "Creating new DeepSeek client");
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = Self::find_key_with_user()?;
        Ok(Self::new(DeepSeekConfig { api_key, ..Default::default() }))
    }

    pub fn with_model(mut self, model: DeepSeekModel) -> Self {
        self.config.model = model;
        self
    }
}

#[async_trait]
impl CompletionService for DeepSeekClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model.id()))]
    async fn complete(&self, prompt: String) -> Result<String, AIError> {
        let request = DeepSeekRequest {
            model: self.config.model.id(),
            messages: vec![DeepSeekMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to DeepSeek API");
        let response = self
            .client
            .post("https://api.deepseek.com/v1/chat/completions")
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                AIError::DeepSeek(ProviderError::Http(e.to_string()))
            })?;

        debug!(status = %response.status(), "Received response from DeepSeek API");

        if response.status() == 429 {
            warn!("DeepSeek API rate limit exceeded");
            return Err(AIError::DeepSeek(ProviderError::RateLimit));
        }

        if response.status() == 401 {
            error!("DeepSeek API authentication failed");
            return Err(AIError::DeepSeek(ProviderError::Authentication));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "DeepSeek API error");
            return Err(AIError::DeepSeek(ProviderError::Api(error_text)));
        }

        let deepseek_response: DeepSeekResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse DeepSeek response JSON");
            AIError::DeepSeek(ProviderError::Http(e.to_string()))
        })?;

        let text = deepseek_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                error!("No choices in DeepSeek response");
                AIError::DeepSeek(ProviderError::Api("No choices in response".to_string()))
            })?;

        info!(response_len = text.len(), "Successfully received DeepSeek response");
        Ok(text)
    }

    fn clone_box(&self) -> Box<dyn CompletionService> {
        Box::new(self.clone())
    }
}
