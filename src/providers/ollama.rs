use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{build_client, endpoint_url, send_for_text, Provider, RetryPolicy};
use crate::translation::protocol;

/// Ollama client for offline translation through a local LLM server
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model name
    model: String,
    temperature: f32,
    retry: RetryPolicy,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: None,
        }
    }

    /// Set the system message
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }

    /// Disable streaming
    pub fn no_stream(mut self) -> Self {
        self.stream = Some(false);
        self
    }
}

impl Ollama {
    /// Create a new Ollama client
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client: build_client(timeout_secs),
            model: model.into(),
            temperature,
            retry,
        }
    }

    /// Generate text from the Ollama API with retry logic
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = endpoint_url(&self.base_url, "api/generate")?;

        let body = self
            .retry
            .execute("Ollama", || send_for_text(self.client.post(url.clone()).json(request)))
            .await?;

        Self::parse_generation(&body)
    }

    /// Parse a generate response, concatenating the parts of a streamed (JSONL) reply
    pub fn parse_generation(body: &str) -> Result<GenerationResponse, ProviderError> {
        if let Ok(response) = serde_json::from_str::<GenerationResponse>(body) {
            return Ok(response);
        }

        let parts: Vec<GenerationResponse> = body
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        if parts.is_empty() {
            let preview: String = body.chars().take(200).collect();
            return Err(ProviderError::ParseError(format!("Failed to parse Ollama API response: {}", preview)));
        }

        Ok(GenerationResponse {
            model: parts[0].model.clone(),
            response: parts.iter().map(|p| p.response.as_str()).collect(),
            done: parts.iter().any(|p| p.done),
        })
    }
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> String {
        format!("ollama:{}", self.model)
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

        let request = GenerationRequest::new(&self.model, protocol::user_prompt(texts))
            .system(protocol::system_prompt(source_language, target_language))
            .temperature(self.temperature)
            .no_stream();

        let response = self.generate(&request).await?;
        let lines = protocol::parse_batch_response(&response.response)?;
        debug!("Ollama returned {} of {} lines", lines.len(), texts.len());
        Ok(lines)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = endpoint_url(&self.base_url, "api/tags")?;
        send_for_text(self.client.get(url)).await.map(|_| ())
    }
}
