/*!
 * Batch translation processing.
 *
 * Segments are grouped into request-sized batches bounded by character and
 * segment count, sent through an ordered stream with a bounded number of
 * batches in flight, and mapped back onto their original indices. A failed
 * batch, or the unanswered tail of a short one, keeps the original text.
 */

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::segment::{Segment, TranslationResult};

use super::Translator;

/// Partitions segment indices into request-sized groups
///
/// Groups are filled greedily in arrival order while the running character
/// count stays within `max_chars` and the group holds fewer than
/// `max_segments` entries. A segment longer than `max_chars` on its own gets a
/// group of its own. Zero limits are treated as 1.
pub fn group(segments: &[Segment], max_chars: usize, max_segments: usize) -> Vec<Vec<usize>> {
    let max_chars = max_chars.max(1);
    let max_segments = max_segments.max(1);

    let mut groups = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut running_chars = 0;

    for (index, segment) in segments.iter().enumerate() {
        let chars = segment.char_count();
        let fits = running_chars + chars <= max_chars && current.len() < max_segments;

        if !current.is_empty() && !fits {
            groups.push(std::mem::take(&mut current));
            running_chars = 0;
        }

        current.push(index);
        running_chars += chars;
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Maps translated strings back onto the segments of one group
///
/// `translated[i]` replaces the text of `segments[group[i]]`. Positions the
/// response did not cover, or answered with a blank line, come back as
/// `None`. Extra strings are ignored.
pub fn apply_group(segments: &[Segment], group: &[usize], translated: &[String]) -> Vec<Option<Segment>> {
    group
        .iter()
        .enumerate()
        .map(|(position, &index)| {
            translated
                .get(position)
                .map(|text| text.trim())
                .filter(|text| !text.is_empty())
                .map(|text| segments[index].with_text(text))
        })
        .collect()
}

/// Limits applied when splitting a job into requests
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub max_chars: usize,
    pub max_segments: usize,
    pub max_concurrent_requests: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_chars: 1000,
            max_segments: 20,
            max_concurrent_requests: 1,
        }
    }
}

/// Translator that drives a provider batch by batch
#[derive(Debug, Clone)]
pub struct BatchTranslator {
    /// The provider answering each batch
    provider: Arc<dyn Provider>,

    options: BatchOptions,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(provider: Arc<dyn Provider>, options: BatchOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }
}

#[async_trait]
impl Translator for BatchTranslator {
    fn name(&self) -> String {
        self.provider.name()
    }

    async fn translate_segments(
        &self,
        segments: &[Segment],
        target_language: &str,
        source_language: &str,
    ) -> Result<TranslationResult, TranslationError> {
        if target_language.trim().is_empty() {
            return Err(TranslationError::Configuration("target language must not be empty".to_string()));
        }

        let groups = group(segments, self.options.max_chars, self.options.max_segments);
        let total_batches = groups.len();
        let start_time = Instant::now();

        debug!(
            "Translating {} segments in {} batches with {}",
            segments.len(),
            total_batches,
            self.provider.name()
        );

        // buffered keeps completion order equal to submission order
        let responses = stream::iter(groups)
            .enumerate()
            .map(|(batch_index, indices)| {
                let provider = Arc::clone(&self.provider);
                let texts: Vec<String> = indices.iter().map(|&i| segments[i].text.clone()).collect();
                async move {
                    let result = provider.translate_texts(&texts, source_language, target_language).await;
                    (batch_index, indices, result)
                }
            })
            .buffered(self.options.max_concurrent_requests.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut translated = segments.to_vec();
        let mut fallback_count = 0;

        for (batch_index, indices, result) in responses {
            let lines = match result {
                Ok(lines) => lines,
                Err(e) => {
                    warn!(
                        "Batch {}/{} failed, keeping original text for {} segments: {}",
                        batch_index + 1,
                        total_batches,
                        indices.len(),
                        e
                    );
                    fallback_count += indices.len();
                    continue;
                }
            };

            if lines.len() > indices.len() {
                debug!("Batch {} returned {} extra lines, ignoring them", batch_index + 1, lines.len() - indices.len());
            }

            let mut kept = 0;
            for (&index, segment) in indices.iter().zip(apply_group(segments, &indices, &lines)) {
                match segment {
                    Some(segment) => translated[index] = segment.with_language(target_language),
                    None => kept += 1,
                }
            }

            if kept > 0 {
                warn!(
                    "Batch {}/{} left {} of {} lines untranslated, keeping original text for them",
                    batch_index + 1,
                    total_batches,
                    kept,
                    indices.len()
                );
                fallback_count += kept;
            }
        }

        info!(
            "Translated {} segments in {} batches ({} kept original) in {:.1}s",
            segments.len(),
            total_batches,
            fallback_count,
            start_time.elapsed().as_secs_f64()
        );

        Ok(TranslationResult {
            segments: translated,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            translator_name: self.provider.name(),
            fallback_count,
        })
    }

    async fn test_connection(&self) -> Result<(), TranslationError> {
        self.provider.test_connection().await.map_err(TranslationError::from)
    }
}
