use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Offline placeholder translator
///
/// Prefixes each line with the upper-cased target code, e.g. `[FR] Hello`.
/// Useful for checking a pipeline end to end without a translation backend.
#[derive(Debug, Default, Clone)]
pub struct Simple;

impl Simple {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for Simple {
    fn name(&self) -> String {
        "simple".to_string()
    }

    async fn translate_texts(
        &self,
        texts: &[String],
        _source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let tag = target_language.trim().to_uppercase();
        Ok(texts.iter().map(|text| format!("[{}] {}", tag, text)).collect())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
