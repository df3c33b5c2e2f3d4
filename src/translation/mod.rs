/*!
 * Translation of segment timelines.
 *
 * The pipeline only depends on the [`Translator`] capability: given segments
 * and a language pair, return a [`TranslationResult`] with the same number of
 * segments in the same order. The concrete translator is selected from
 * configuration by [`create_translator`].
 *
 * - `batch`: grouping into requests and reassembly in input order
 * - `protocol`: prompt and response format for LLM-backed providers
 */

use async_trait::async_trait;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslatorKind};
use crate::errors::TranslationError;
use crate::providers::{Google, Ollama, OpenAI, Provider, RetryPolicy, Simple};
use crate::segment::{Segment, TranslationResult};

pub use self::batch::{BatchOptions, BatchTranslator};

pub mod batch;
pub mod protocol;

/// Translator capability used by the processor
#[async_trait]
pub trait Translator: Send + Sync {
    /// Name reported in results and logs
    fn name(&self) -> String;

    /// Translate the text of every segment
    ///
    /// The result holds one segment per input segment, in input order, with
    /// the original timing. Segments that could not be translated keep their
    /// original text.
    async fn translate_segments(
        &self,
        segments: &[Segment],
        target_language: &str,
        source_language: &str,
    ) -> Result<TranslationResult, TranslationError>;

    /// Check that the backend is reachable
    async fn test_connection(&self) -> Result<(), TranslationError>;
}

/// Build the provider selected in the configuration
pub fn create_provider(config: &TranslationConfig) -> Arc<dyn Provider> {
    let common = &config.common;
    let retry = RetryPolicy::new(common.retry_count, common.retry_backoff_ms);

    match config.provider {
        TranslatorKind::Simple => Arc::new(Simple::new()),
        TranslatorKind::Google => Arc::new(Google::new(config.get_endpoint(), common.timeout_secs, retry)),
        TranslatorKind::OpenAI => Arc::new(OpenAI::new(
            config.get_api_key(),
            config.get_endpoint(),
            config.get_model(),
            common.temperature,
            common.timeout_secs,
            retry,
        )),
        TranslatorKind::Offline => Arc::new(Ollama::new(
            config.get_endpoint(),
            config.get_model(),
            common.temperature,
            common.timeout_secs,
            retry,
        )),
    }
}

/// Build the translator selected in the configuration
pub fn create_translator(config: &TranslationConfig) -> Box<dyn Translator> {
    let options = BatchOptions {
        max_chars: config.common.max_batch_chars,
        max_segments: config.common.max_batch_segments,
        max_concurrent_requests: config.common.max_concurrent_requests,
    };
    Box::new(BatchTranslator::new(create_provider(config), options))
}
