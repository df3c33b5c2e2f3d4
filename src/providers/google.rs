use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{build_client, send_for_text, Provider, RetryPolicy};

/// Client for the public Google web translation endpoint
///
/// The endpoint takes one text per request, so a batch turns into one call
/// per line. A line that cannot be translated comes back blank so the caller
/// keeps its original text and counts it as a fallback.
#[derive(Debug)]
pub struct Google {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint URL without query string
    endpoint: String,
    retry: RetryPolicy,
}

impl Google {
    /// Create a new Google client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64, retry: RetryPolicy) -> Self {
        Self {
            client: build_client(timeout_secs),
            endpoint: endpoint.into(),
            retry,
        }
    }

    fn request_url(&self, text: &str, source_language: &str, target_language: &str) -> Result<Url, ProviderError> {
        let source = if language_utils::is_auto(source_language) { "auto" } else { source_language.trim() };
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target_language.trim()),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint {}: {}", self.endpoint, e)))
    }

    /// Translate a single line
    pub async fn translate_one(&self, text: &str, source_language: &str, target_language: &str) -> Result<String, ProviderError> {
        let url = self.request_url(text, source_language, target_language)?;
        let body = self
            .retry
            .execute("Google", || send_for_text(self.client.get(url.clone())))
            .await?;
        Self::extract_text(&body)
    }

    /// Join the translated fragments of a response (`result[0][*][0]`)
    pub fn extract_text(body: &str) -> Result<String, ProviderError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid Google response: {}", e)))?;

        let fragments = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("Google response has no sentence list".to_string()))?;

        Ok(fragments
            .iter()
            .filter_map(|fragment| fragment.get(0).and_then(Value::as_str))
            .collect())
    }

    /// Turn per-line results into a batch answer
    ///
    /// Failed lines become blank entries so positions stay aligned. When no
    /// line got through the last error is returned instead.
    pub fn collect_lines(results: Vec<Result<String, ProviderError>>) -> Result<Vec<String>, ProviderError> {
        let total = results.len();
        let mut lines = Vec::with_capacity(total);
        let mut failures = 0;
        let mut last_error = None;

        for result in results {
            match result {
                Ok(line) => lines.push(line),
                Err(e) => {
                    warn!("Google translation failed for one line: {}", e);
                    lines.push(String::new());
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if failures == total => Err(e),
            _ => {
                debug!("Google translated {} of {} lines", total - failures, total);
                Ok(lines)
            }
        }
    }
}

#[async_trait]
impl Provider for Google {
    fn name(&self) -> String {
        "google".to_string()
    }

    async fn translate_texts(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate_one(text, source_language, target_language).await);
        }
        Self::collect_lines(results)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate_one("Hello", "en", "fr").await.map(|_| ())
    }
}
