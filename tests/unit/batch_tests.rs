/*!
 * Tests for batch grouping and ordered batch dispatch
 */

use std::sync::Arc;

use srtforge::providers::MockProvider;
use srtforge::segment::Segment;
use srtforge::translation::batch;
use srtforge::translation::{BatchOptions, BatchTranslator, Translator};
use crate::common;

fn numbered(count: usize) -> Vec<Segment> {
    (0..count)
        .map(|i| Segment::new(i as f64, i as f64 + 0.9, format!("line {}", i)))
        .collect()
}

/// Every index appears exactly once, in order, and no group breaks a limit
#[test]
fn test_group_shouldCoverEveryIndexWithinLimits() {
    let segments = numbered(57);

    let groups = batch::group(&segments, 40, 7);

    let flattened: Vec<usize> = groups.iter().flatten().copied().collect();
    assert_eq!(flattened, (0..57).collect::<Vec<_>>());

    for group in &groups {
        assert!(!group.is_empty());
        assert!(group.len() <= 7);
        let chars: usize = group.iter().map(|&i| segments[i].char_count()).sum();
        assert!(chars <= 40 || group.len() == 1);
    }
}

#[test]
fn test_group_withOversizedSegment_shouldIsolateIt() {
    let segments = common::segments(&[(0.0, 1.0, "ab"), (1.0, 2.0, "this one is far too long"), (2.0, 3.0, "cd")]);

    let groups = batch::group(&segments, 10, 20);

    assert_eq!(groups, vec![vec![0], vec![1], vec![2]]);
}

#[test]
fn test_group_withEmptyInput_shouldReturnNoGroups() {
    assert!(batch::group(&[], 100, 10).is_empty());
}

#[tokio::test]
async fn test_translate_withConcurrentBatches_shouldKeepInputOrder() {
    let provider = MockProvider::working();
    let options = BatchOptions {
        max_chars: 1000,
        max_segments: 3,
        max_concurrent_requests: 4,
    };
    let translator = BatchTranslator::new(Arc::new(provider.clone()), options);
    let segments = numbered(20);

    let result = translator.translate_segments(&segments, "fr", "en").await.unwrap();

    assert_eq!(result.segment_count(), 20);
    assert_eq!(result.fallback_count, 0);
    assert_eq!(provider.request_count(), 7);
    for (original, translated) in segments.iter().zip(&result.segments) {
        assert_eq!(translated.text, format!("[fr] {}", original.text));
        assert_eq!(translated.start, original.start);
        assert_eq!(translated.end, original.end);
        assert_eq!(translated.language.as_deref(), Some("fr"));
    }
}

#[tokio::test]
async fn test_translate_withSlowProvider_shouldStillReturnInOrder() {
    let provider = MockProvider::slow(5);
    let options = BatchOptions {
        max_chars: 1000,
        max_segments: 1,
        max_concurrent_requests: 3,
    };
    let translator = BatchTranslator::new(Arc::new(provider), options);
    let segments = numbered(6);

    let result = translator.translate_segments(&segments, "de", "en").await.unwrap();

    let texts: Vec<&str> = result.segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["[de] line 0", "[de] line 1", "[de] line 2", "[de] line 3", "[de] line 4", "[de] line 5"]
    );
}

#[tokio::test]
async fn test_translate_withTruncatingProvider_shouldKeepOriginalTail() {
    let provider = MockProvider::truncating(2);
    let options = BatchOptions {
        max_chars: 1000,
        max_segments: 4,
        max_concurrent_requests: 1,
    };
    let translator = BatchTranslator::new(Arc::new(provider), options);
    let segments = numbered(4);

    let result = translator.translate_segments(&segments, "es", "en").await.unwrap();

    assert_eq!(result.segments[0].text, "[es] line 0");
    assert_eq!(result.segments[1].text, "[es] line 1");
    assert_eq!(result.segments[2].text, "line 2");
    assert_eq!(result.segments[3].text, "line 3");
    assert_eq!(result.segments[3].language, None);
    assert_eq!(result.fallback_count, 2);
}

#[tokio::test]
async fn test_translate_withBlankLineInEveryBatch_shouldCountEachFallback() {
    let options = BatchOptions {
        max_chars: 1000,
        max_segments: 2,
        max_concurrent_requests: 2,
    };
    let translator = BatchTranslator::new(Arc::new(MockProvider::blank_line(0)), options);
    let segments = numbered(4);

    let result = translator.translate_segments(&segments, "pt", "en").await.unwrap();

    assert_eq!(result.segment_count(), 4);
    assert_eq!(result.fallback_count, 2);
    assert_eq!(result.segments[0], segments[0]);
    assert_eq!(result.segments[1].text, "[pt] line 1");
    assert_eq!(result.segments[2], segments[2]);
    assert_eq!(result.segments[3].language.as_deref(), Some("pt"));
}

#[tokio::test]
async fn test_translate_withFailingProvider_shouldFallBackEverywhere() {
    let translator = BatchTranslator::new(Arc::new(MockProvider::failing()), BatchOptions::default());
    let segments = numbered(3);

    let result = translator.translate_segments(&segments, "it", "en").await.unwrap();

    assert_eq!(result.segments, segments);
    assert_eq!(result.fallback_count, 3);
    assert_eq!(result.translator_name, "mock");
}

#[tokio::test]
async fn test_translate_shouldForwardLanguagesToProvider() {
    let provider = MockProvider::working();
    let translator = BatchTranslator::new(Arc::new(provider.clone()), BatchOptions::default());

    translator.translate_segments(&numbered(2), "ja", "en").await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].source_language, "en");
    assert_eq!(requests[0].target_language, "ja");
    assert_eq!(requests[0].texts, vec!["line 0", "line 1"]);
}

#[test]
fn test_translate_withEmptyInput_shouldSendNothing() {
    let provider = MockProvider::working();
    let translator = BatchTranslator::new(Arc::new(provider.clone()), BatchOptions::default());

    let result = tokio_test::block_on(translator.translate_segments(&[], "fr", "en")).unwrap();

    assert_eq!(result.segment_count(), 0);
    assert_eq!(provider.request_count(), 0);
}
