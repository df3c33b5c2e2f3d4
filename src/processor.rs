/*!
 * Per-job pipeline driver.
 *
 * One `Processor` turns one transcription into one subtitle file:
 * optional merge, optional translation, optional bilingual combination,
 * then the emitter's timing correction and rendering, and the final write.
 * Everything it needs comes from the `Config` it was built with.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::SubtitleError;
use crate::formats::{self, SubtitleFormatter};
use crate::language_utils;
use crate::merger;
use crate::segment::{Segment, TranscriptionResult, TranslationResult};
use crate::translation::{self, Translator};

/// Outcome of one processed job
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// File that was written
    pub output_path: PathBuf,

    /// Transcription the job started from
    pub transcription: TranscriptionResult,

    /// Translation, when one was requested and produced
    pub translation: Option<TranslationResult>,

    /// Cues written after timing correction
    pub cue_count: usize,

    /// Some or all of the output kept the original text instead of a translation
    pub translation_fallback: bool,

    /// Wall time of the job, in seconds
    pub processing_time: f64,
}

/// Pipeline driver for one job at a time
pub struct Processor {
    config: Config,
    translator: Option<Box<dyn Translator>>,
    formatter: Box<dyn SubtitleFormatter>,
}

impl Processor {
    /// Create a processor, building the configured translator when a target language is set
    pub fn new(config: Config) -> Result<Self> {
        let translator = config
            .target_language
            .as_ref()
            .map(|_| translation::create_translator(&config.translation));
        Self::with_translator(config, translator)
    }

    /// Create a processor with an explicit translator
    pub fn with_translator(config: Config, translator: Option<Box<dyn Translator>>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let processing = &config.processing;
        let formatter = formats::formatter_for(
            processing.output_format,
            processing.min_segment_duration,
            &processing.ass_style,
        );

        Ok(Self {
            config,
            translator,
            formatter,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Language tag used in output file names: the target, else the transcription language
    pub fn output_language(&self, transcription: &TranscriptionResult) -> String {
        let tag = match &self.config.target_language {
            Some(target) => target.clone(),
            None => transcription.language.clone(),
        };
        if tag.trim().is_empty() || language_utils::is_auto(&tag) {
            "und".to_string()
        } else {
            tag
        }
    }

    /// Run the whole pipeline and write the result to `output_path`
    pub async fn process(
        &self,
        transcription: TranscriptionResult,
        output_path: &Path,
    ) -> Result<ProcessingResult, SubtitleError> {
        let start_time = Instant::now();
        let processing = &self.config.processing;

        let segments = if processing.merge_segments {
            let merged = merger::merge_with_gap(
                &transcription.segments,
                processing.max_segment_duration,
                processing.max_segment_chars,
                processing.merge_gap,
            );
            debug!("Merged {} segments into {}", transcription.segment_count(), merged.len());
            merged
        } else {
            transcription.segments.clone()
        };

        let (translation, mut translation_fallback) = self.translate(&segments, &transcription).await;

        let rendered = match &translation {
            Some(result) if result.segment_count() == segments.len() => {
                if result.fallback_count > 0 {
                    translation_fallback = true;
                }
                if processing.bilingual {
                    self.formatter.format_bilingual_counted(&segments, &result.segments)
                } else {
                    self.formatter.format_counted(&result.segments)
                }
            }
            Some(result) => {
                warn!(
                    "Translator returned {} segments for {}, writing original text",
                    result.segment_count(),
                    segments.len()
                );
                translation_fallback = true;
                self.formatter.format_counted(&segments)
            }
            None => self.formatter.format_counted(&segments),
        };

        if !self.formatter.save(&rendered.content, output_path) {
            return Err(SubtitleError::SaveFailed {
                path: output_path.to_path_buf(),
            });
        }

        let processing_time = start_time.elapsed().as_secs_f64();
        info!(
            "Wrote {} {} cues to {} in {:.2}s",
            rendered.cue_count,
            self.formatter.output_format().display_name(),
            output_path.display(),
            processing_time
        );

        Ok(ProcessingResult {
            output_path: output_path.to_path_buf(),
            transcription,
            translation,
            cue_count: rendered.cue_count,
            translation_fallback,
            processing_time,
        })
    }

    // @returns: (translation, whether the job fell back to original text)
    async fn translate(
        &self,
        segments: &[Segment],
        transcription: &TranscriptionResult,
    ) -> (Option<TranslationResult>, bool) {
        let (Some(target), Some(translator)) = (&self.config.target_language, &self.translator) else {
            return (None, false);
        };

        let source = self.source_language(transcription);
        if language_utils::language_codes_match(&source, target) {
            info!("Transcription is already in {}, skipping translation", target);
            return (None, false);
        }
        if segments.is_empty() {
            return (None, false);
        }

        info!(
            "Translating {} segments from {} to {} with {}",
            segments.len(),
            source,
            target,
            translator.name()
        );

        match translator.translate_segments(segments, target, &source).await {
            Ok(result) => (Some(result), false),
            Err(e) => {
                warn!("Translation failed, writing original text: {}", e);
                (None, true)
            }
        }
    }

    // Configured source, or the detected one when configured as "auto"
    fn source_language(&self, transcription: &TranscriptionResult) -> String {
        let configured = &self.config.source_language;
        if language_utils::is_auto(configured) && !transcription.language.trim().is_empty() {
            transcription.language.clone()
        } else {
            configured.clone()
        }
    }
}
