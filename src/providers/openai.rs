use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{build_client, endpoint_url, send_for_text, Provider, RetryPolicy};
use crate::translation::protocol;

/// OpenAI client for interacting with the chat completions API
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, e.g. `https://api.openai.com/v1`
    endpoint: String,
    /// Model name
    model: String,
    temperature: f32,
    retry: RetryPolicy,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated alternatives, the first one is used
    pub choices: Vec<ChatChoice>,
}

/// Individual choice in a chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

impl ChatCompletionRequest {
    /// Create a new chat completion request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the completion length
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keep the key out of logs
        f.debug_struct("OpenAI")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("retry", &self.retry)
            .finish()
    }
}

impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client: build_client(timeout_secs),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            temperature,
            retry,
        }
    }

    /// Complete a chat request
    pub async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse, ProviderError> {
        let url = endpoint_url(&self.endpoint, "chat/completions")?;

        let body = self
            .retry
            .execute("OpenAI", || {
                send_for_text(
                    self.client
                        .post(url.clone())
                        .bearer_auth(&self.api_key)
                        .json(request),
                )
            })
            .await?;

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse OpenAI API response: {}", e)))
    }

    /// Extract text from the first choice of a response
    pub fn extract_text(response: &ChatCompletionResponse) -> String {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for OpenAI {
    fn name(&self) -> String {
        format!("openai:{}", self.model)
    }

    async fn translate_texts(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = ChatCompletionRequest::new(&self.model)
            .add_message("system", protocol::system_prompt(source_language, target_language))
            .add_message("user", protocol::user_prompt(texts))
            .temperature(self.temperature);

        let response = self.complete(&request).await?;
        let lines = protocol::parse_batch_response(&Self::extract_text(&response))?;
        debug!("OpenAI returned {} of {} lines", lines.len(), texts.len());
        Ok(lines)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = ChatCompletionRequest::new(&self.model)
            .add_message("user", "Hello")
            .max_tokens(5);
        self.complete(&request).await.map(|_| ())
    }
}
