use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

use super::{CompletionRequest, InsightError, TextGenerator};

/// OpenAI call timeout
const OPENAI_TIMEOUT: Duration = Duration::from_secs(25);

pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Maps an OpenAI error onto the categories callers care about.
fn classify_openai_error(error: OpenAIError) -> InsightError {
    match &error {
        OpenAIError::ApiError(api_err) => {
            let err_type = api_err.r#type.as_deref().unwrap_or("");
            let message = &api_err.message;
            let err_code = api_err
                .code
                .as_ref()
                .map(|code| code.to_string())
                .unwrap_or_default();

            if err_code.contains("invalid_api_key") || message.contains("API key") {
                InsightError::Auth
            } else if err_type == "rate_limit_error"
                || err_code.contains("rate_limit_exceeded")
                || message.contains("rate limit")
            {
                InsightError::RateLimited
            } else if err_type == "server_error" {
                InsightError::Unavailable(message.clone())
            } else {
                InsightError::Api(message.clone())
            }
        }
        OpenAIError::Reqwest(req_err) => match req_err.status().map(|s| s.as_u16()) {
            Some(401) => InsightError::Auth,
            Some(429) => InsightError::RateLimited,
            _ if req_err.is_timeout() || req_err.is_connect() => {
                InsightError::Unavailable(req_err.to_string())
            }
            _ => InsightError::Api(req_err.to_string()),
        },
        _ => InsightError::Api(error.to_string()),
    }
}

/// Chat completions against the OpenAI API (or any compatible base URL).
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, api_base: Option<&str>, model: &str) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn build_messages(request: &CompletionRequest) -> Result<Vec<ChatCompletionRequestMessage>, InsightError> {
    let system = ChatCompletionRequestSystemMessageArgs::default()
        .content(request.system.as_str())
        .build()
        .map_err(|e| InsightError::Api(e.to_string()))?;
    let user = ChatCompletionRequestUserMessageArgs::default()
        .content(request.user.as_str())
        .build()
        .map_err(|e| InsightError::Api(e.to_string()))?;

    Ok(vec![
        ChatCompletionRequestMessage::System(system),
        ChatCompletionRequestMessage::User(user),
    ])
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, InsightError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.as_str())
            .messages(build_messages(&request)?);
        if let Some(max_tokens) = request.max_tokens {
            args.max_tokens(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            args.temperature(temperature);
        }
        let chat_request = args.build().map_err(|e| InsightError::Api(e.to_string()))?;

        let response = tokio::time::timeout(OPENAI_TIMEOUT, self.client.chat().create(chat_request))
            .await
            .map_err(|_| InsightError::Unavailable("request timed out".to_string()))?
            .map_err(classify_openai_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(InsightError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_keeps_model() {
        let client = OpenAiClient::new("test-api-key", None, DEFAULT_MODEL);
        assert_eq!(client.model(), "gpt-4o");
    }

    #[test]
    fn test_build_messages() {
        let messages = build_messages(&CompletionRequest::new("system", "user")).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_classify_other_errors() {
        let err = classify_openai_error(OpenAIError::InvalidArgument("bad".to_string()));
        assert!(matches!(err, InsightError::Api(msg) if msg.contains("bad")));
    }
}
