/*!
 * End-to-end pipeline tests with mock translators
 */

use async_trait::async_trait;
use std::fs;
use std::sync::Arc;

use srtforge::app_config::Config;
use srtforge::errors::TranslationError;
use srtforge::formats::OutputFormat;
use srtforge::processor::Processor;
use srtforge::providers::MockProvider;
use srtforge::segment::{Segment, TranscriptionResult, TranslationResult};
use srtforge::translation::{BatchOptions, BatchTranslator, Translator};
use crate::common;

/// Translator that answers with one segment fewer than it was given
struct ShortTranslator;

#[async_trait]
impl Translator for ShortTranslator {
    fn name(&self) -> String {
        "short".to_string()
    }

    async fn translate_segments(
        &self,
        segments: &[Segment],
        target_language: &str,
        source_language: &str,
    ) -> Result<TranslationResult, TranslationError> {
        let mut translated: Vec<Segment> = segments.iter().map(|s| s.with_text(format!("T:{}", s.text))).collect();
        translated.pop();
        Ok(TranslationResult {
            segments: translated,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            translator_name: self.name(),
            fallback_count: 0,
        })
    }

    async fn test_connection(&self) -> Result<(), TranslationError> {
        Ok(())
    }
}

fn translating_config(target: &str) -> Config {
    let mut config = Config::default();
    config.target_language = Some(target.to_string());
    config
}

fn batch_translator(provider: MockProvider, max_segments: usize) -> Option<Box<dyn Translator>> {
    let options = BatchOptions {
        max_chars: 1000,
        max_segments,
        max_concurrent_requests: 2,
    };
    Some(Box::new(BatchTranslator::new(Arc::new(provider), options)))
}

/// The documented two-cue scenario: overlap shifted, SRT numbering and timestamps exact
#[tokio::test]
async fn test_process_withOverlappingSegments_shouldWriteFixtureSrt() {
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("out.srt");
    let transcription = TranscriptionResult::from_segments(
        common::segments(&[(0.0, 2.0, "Hello"), (1.5, 3.0, "World")]),
        "en",
        "base",
    );
    let processor = Processor::new(Config::default()).unwrap();

    let result = processor.process(transcription, &output).await.unwrap();

    assert_eq!(result.cue_count, 2);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "1\n00:00:00,000 --> 00:00:02,000\nHello\n\n2\n00:00:02,000 --> 00:00:03,000\nWorld\n"
    );
}

#[tokio::test]
async fn test_process_withWorkingMock_shouldTranslateEveryCue() {
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("talk.fr.srt");
    let provider = MockProvider::working();
    let processor = Processor::with_translator(translating_config("fr"), batch_translator(provider.clone(), 2)).unwrap();

    let result = processor.process(common::sample_transcription(), &output).await.unwrap();
    let content = fs::read_to_string(&output).unwrap();

    assert!(!result.translation_fallback);
    assert_eq!(provider.request_count(), 2);
    assert!(content.contains("[fr] Hello there."));
    assert!(content.contains("[fr] How are you?"));
    assert!(content.contains("[fr] Fine, thanks."));
    // auto source resolves to the detected language
    assert!(provider.requests().iter().all(|r| r.source_language == "en"));
}

#[tokio::test]
async fn test_process_withTruncatingMock_shouldFlagFallbackAndKeepOriginals() {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("talk.de.srt");
    let processor =
        Processor::with_translator(translating_config("de"), batch_translator(MockProvider::truncating(1), 3)).unwrap();

    let result = processor.process(common::sample_transcription(), &output).await.unwrap();
    let content = fs::read_to_string(&output).unwrap();

    assert!(result.translation_fallback);
    assert_eq!(result.cue_count, 3);
    assert!(content.contains("[de] Hello there."));
    assert!(content.contains("\nHow are you?\n"));
    assert!(content.contains("\nFine, thanks.\n"));
}

#[tokio::test]
async fn test_process_withFailingMock_shouldStillWriteOriginalSubtitle() {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("talk.es.vtt");
    let mut config = translating_config("es");
    config.processing.output_format = OutputFormat::Vtt;
    let processor = Processor::with_translator(config, batch_translator(MockProvider::failing(), 20)).unwrap();

    let result = processor.process(common::sample_transcription(), &output).await.unwrap();
    let content = fs::read_to_string(&output).unwrap();

    assert!(result.translation_fallback);
    assert!(content.starts_with("WEBVTT\n\n"));
    assert!(content.contains("Hello there."));
    assert!(!content.contains("[es]"));
}

#[tokio::test]
async fn test_process_withShortTranslator_shouldWriteOriginalText() {
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("talk.it.srt");
    let mut config = translating_config("it");
    config.processing.bilingual = true;
    let processor = Processor::with_translator(config, Some(Box::new(ShortTranslator))).unwrap();

    let result = processor.process(common::sample_transcription(), &output).await.unwrap();
    let content = fs::read_to_string(&output).unwrap();

    assert!(result.translation_fallback);
    assert_eq!(result.cue_count, 3);
    assert!(!content.contains("T:"));
}

#[tokio::test]
async fn test_process_withMergeAndBilingualAss_shouldCombineBeforeTranslating() {
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("talk.fr.ass");
    let mut config = translating_config("fr");
    config.processing.merge_segments = true;
    config.processing.bilingual = true;
    config.processing.output_format = OutputFormat::Ass;
    let provider = MockProvider::working();
    let processor = Processor::with_translator(config, batch_translator(provider.clone(), 20)).unwrap();

    let result = processor.process(common::sample_transcription(), &output).await.unwrap();
    let content = fs::read_to_string(&output).unwrap();

    assert_eq!(result.cue_count, 1);
    assert_eq!(provider.requests()[0].texts, vec!["Hello there. How are you? Fine, thanks."]);
    assert!(content.contains(
        "Dialogue: 0,0:00:00.00,0:00:06.50,Default,,0,0,0,,Hello there. How are you? Fine, thanks.\\N[fr] Hello there. How are you? Fine, thanks.\n"
    ));
}

#[tokio::test]
async fn test_process_withEmptyTranscription_shouldWriteEmptySubtitle() {
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("empty.srt");
    let provider = MockProvider::working();
    let processor = Processor::with_translator(translating_config("fr"), batch_translator(provider.clone(), 20)).unwrap();

    let result = processor
        .process(TranscriptionResult::from_segments(Vec::new(), "en", "base"), &output)
        .await
        .unwrap();

    assert_eq!(result.cue_count, 0);
    assert_eq!(provider.request_count(), 0);
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[tokio::test]
async fn test_process_withBlankTranslatedLine_shouldKeepOriginalCue() {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("talk.fr.srt");
    let transcription = TranscriptionResult::from_segments(
        common::segments(&[(0.0, 1.0, "one"), (1.0, 2.0, "two"), (2.0, 3.0, "three")]),
        "en",
        "base",
    );
    let processor =
        Processor::with_translator(translating_config("fr"), batch_translator(MockProvider::blank_line(1), 20)).unwrap();

    let result = processor.process(transcription, &output).await.unwrap();
    let content = fs::read_to_string(&output).unwrap();

    assert_eq!(result.cue_count, 3);
    assert!(result.translation_fallback);
    assert_eq!(result.translation.as_ref().map(|t| t.fallback_count), Some(1));
    assert_eq!(
        content,
        "1\n00:00:00,000 --> 00:00:01,000\n[fr] one\n\n2\n00:00:01,000 --> 00:00:02,000\ntwo\n\n3\n00:00:02,000 --> 00:00:03,000\n[fr] three\n"
    );
}

#[tokio::test]
async fn test_process_withBilingualAndShortTranslator_shouldCountOriginalCues() {
    let temp_dir = common::create_temp_dir().unwrap();
    let output = temp_dir.path().join("talk.it.vtt");
    let mut config = translating_config("it");
    config.processing.bilingual = true;
    config.processing.output_format = OutputFormat::Vtt;
    let processor = Processor::with_translator(config, Some(Box::new(ShortTranslator))).unwrap();

    let result = processor.process(common::sample_transcription(), &output).await.unwrap();
    let content = fs::read_to_string(&output).unwrap();

    assert_eq!(result.cue_count, 3);
    assert_eq!(content.matches(" --> ").count(), 3);
}

