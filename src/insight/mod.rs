pub mod client;
pub mod prompt;

use std::sync::Arc;

use async_trait::async_trait;

use crate::http_probe::result::ProbeResult;
use prompt::{
    insight_prompt, summary_prompt, SummaryInput, CHAT_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT,
};

const SUMMARY_MAX_TOKENS: u32 = 150;
const SUMMARY_TEMPERATURE: f32 = 0.7;

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("authentication with the text generation service failed")]
    Auth,
    #[error("text generation service rate limit reached")]
    RateLimited,
    #[error("text generation service unavailable: {0}")]
    Unavailable(String),
    #[error("text generation failed: {0}")]
    Api(String),
    #[error("text generation service returned an empty response")]
    EmptyResponse,
}

/// A single system + user exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: None,
            temperature: None,
        }
    }
}

/// External text generation. Swapped for a stub in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, InsightError>;
}

/// Turns probe results and user questions into LLM requests.
#[derive(Clone)]
pub struct InsightService {
    generator: Arc<dyn TextGenerator>,
}

impl InsightService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn insight(&self, result: &ProbeResult) -> Result<String, InsightError> {
        let request = CompletionRequest {
            max_tokens: Some(SUMMARY_MAX_TOKENS),
            temperature: Some(SUMMARY_TEMPERATURE),
            ..CompletionRequest::new(SUMMARY_SYSTEM_PROMPT, insight_prompt(result))
        };
        self.generator.complete(request).await
    }

    pub async fn chat(&self, message: &str) -> Result<String, InsightError> {
        self.generator
            .complete(CompletionRequest::new(CHAT_SYSTEM_PROMPT, message))
            .await
    }

    pub async fn summarize(&self, input: &SummaryInput) -> Result<String, InsightError> {
        let request = CompletionRequest {
            max_tokens: Some(SUMMARY_MAX_TOKENS),
            temperature: Some(SUMMARY_TEMPERATURE),
            ..CompletionRequest::new(SUMMARY_SYSTEM_PROMPT, summary_prompt(input))
        };
        self.generator.complete(request).await
    }
}

#[cfg(test)]
pub mod test_support {
    use std::sync::Mutex;

    use super::*;

    /// Answers every request with a fixed reply, or fails, and remembers
    /// what it was asked.
    pub struct StubGenerator {
        reply: Result<String, String>,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl StubGenerator {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn complete(&self, request: CompletionRequest) -> Result<String, InsightError> {
            self.requests.lock().unwrap().push(request);
            self.reply.clone().map_err(InsightError::Unavailable)
        }
    }
}
