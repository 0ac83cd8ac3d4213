use crate::core::CompletionService;
use crate::error::{AIError, ProviderError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// One scripted reply from a `MockClient`.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(ProviderError),
    /// Reply with the text after sleeping, for exercising timeouts.
    Delayed(Duration, String),
}

impl MockResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<MockResponse>,
    fallback: Option<String>,
    prompts: Vec<String>,
}

/// Controls a `MockClient` from the outside: queue replies, inspect prompts.
#[derive(Debug, Default)]
pub struct MockHandle {
    state: Mutex<MockState>,
}

impl MockHandle {
    pub fn push(&self, response: MockResponse) {
        self.lock().queue.push_back(response);
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(MockResponse::Text(text.into()));
    }

    /// Reply used once the queue is empty. Without one, an empty queue is an API error.
    pub fn set_fallback(&self, text: impl Into<String>) {
        self.lock().fallback = Some(text.into());
    }

    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().prompts.len()
    }

    pub fn remaining(&self) -> usize {
        self.lock().queue.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_response(&self, prompt: String) -> Result<MockResponse, AIError> {
        let mut state = self.lock();
        state.prompts.push(prompt);
        match state.queue.pop_front() {
            Some(response) => Ok(response),
            None => state
                .fallback
                .clone()
                .map(MockResponse::Text)
                .ok_or_else(|| AIError::Mock(ProviderError::Api("no scripted response".to_string()))),
        }
    }
}

/// Scripted completion service for tests and offline runs
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (Self { handle: handle.clone() }, handle)
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (client, handle) = Self::new();
        for response in responses {
            handle.push(response);
        }
        (client, handle)
    }
}

#[async_trait]
impl CompletionService for MockClient {
    async fn complete(&self, prompt: String) -> Result<String, AIError> {
        let response = self.handle.next_response(prompt)?;
        debug!(?response, "Mock completion");
        match response {
            MockResponse::Text(text) => Ok(text),
            MockResponse::Error(e) => Err(AIError::Mock(e)),
            MockResponse::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }

    fn clone_box(&self) -> Box<dyn CompletionService> {
        Box::new(self.clone())
    }
}
