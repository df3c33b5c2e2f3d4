/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported backends:
 * - Simple: offline placeholder that tags each line with the target code
 * - Google: public web translation endpoint, one request per line
 * - OpenAI: chat completions API, one request per batch
 * - Ollama: local LLM server used for offline translation, one request per batch
 *
 * Every provider translates a list of plain strings. Segment timing, batching
 * and fallbacks live in `translation`, so providers only ever see text.
 */

use async_trait::async_trait;
use log::warn;
use rand::Rng;
use reqwest::StatusCode;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the batch translator.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short identifier used in logs and results
    fn name(&self) -> String;

    /// Translate a list of texts
    ///
    /// # Arguments
    /// * `texts` - Lines to translate, in order
    /// * `source_language` - Source language code, or "auto"
    /// * `target_language` - Target language code
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - One string per input line. A
    ///   shorter list is tolerated by the caller, extra strings are ignored.
    ///   A blank string marks a line the provider could not translate.
    async fn translate_texts(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Exponential backoff settings shared by the network providers
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base backoff time in milliseconds, doubled on each retry
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self { max_retries, backoff_base_ms }
    }

    // @returns: Delay before retry number `attempt` (1-based), with up to 10% jitter
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let base = self.backoff_base_ms.saturating_mul(1u64 << shift);
        let jitter = if base >= 10 { rand::rng().random_range(0..=base / 10) } else { 0 };
        Duration::from_millis(base + jitter)
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error, or
    /// the retries are used up
    pub async fn execute<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, ProviderError>> + Send,
        T: Send,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!("{} request failed: {} - retry {}/{}", label, e, attempt, self.max_retries);
                    tokio::time::sleep(self.delay_for(attempt)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000)
    }
}

/// Build the HTTP client used by the network providers
pub(crate) fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .unwrap_or_default()
}

/// Join a base endpoint and a path, validating the result
pub(crate) fn endpoint_url(base: &str, path: &str) -> Result<Url, ProviderError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint {}: {}", joined, e)))
}

/// Map a transport error to a provider error
pub(crate) fn map_request_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() || error.is_connect() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

/// Map a non-success HTTP status to a provider error
pub(crate) fn map_status_error(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(body),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(body),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body,
        },
    }
}

/// Send a request and hand back the body of a successful response
pub(crate) async fn send_for_text(request: reqwest::RequestBuilder) -> Result<String, ProviderError> {
    let response = request.send().await.map_err(map_request_error)?;
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get response text".to_string());

    if status.is_success() {
        Ok(body)
    } else {
        Err(map_status_error(status, body))
    }
}

pub mod google;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod simple;

pub use google::Google;
pub use mock::{MockBehavior, MockProvider};
pub use ollama::Ollama;
pub use openai::OpenAI;
pub use simple::Simple;
