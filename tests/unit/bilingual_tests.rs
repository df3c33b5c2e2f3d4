/*!
 * Tests for bilingual cue combination
 */

use srtforge::bilingual;
use srtforge::errors::TranslationError;
use srtforge::formats::{SrtFormatter, SubtitleFormatter};
use crate::common;

#[test]
fn test_combine_shouldKeepOriginalTimingForEveryCue() {
    let original = common::segments(&[(0.0, 1.0, "Good morning"), (2.0, 3.5, "See you")]);
    let translated = common::segments(&[(0.0, 1.2, "Buenos días"), (2.1, 3.0, "Hasta luego")]);

    let combined = bilingual::combine(&original, &translated).unwrap();

    assert_eq!(combined.len(), 2);
    for ((cue, orig), trans) in combined.iter().zip(&original).zip(&translated) {
        assert_eq!(cue.start, orig.start);
        assert_eq!(cue.end, orig.end);
        assert_eq!(cue.text, format!("{}\n{}", orig.text, trans.text));
    }
}

#[test]
fn test_combine_withMismatchedLengths_shouldReportCounts() {
    let original = common::segments(&[(0.0, 1.0, "a"), (1.0, 2.0, "b")]);
    let translated = common::segments(&[(0.0, 1.0, "x")]);

    match bilingual::combine(&original, &translated) {
        Err(TranslationError::CardinalityMismatch { original, translated }) => {
            assert_eq!(original, 2);
            assert_eq!(translated, 1);
        }
        other => panic!("expected a cardinality mismatch, got {:?}", other),
    }
}

#[test]
fn test_format_bilingual_withMismatch_shouldWriteOriginalOnly() {
    let formatter = SrtFormatter::new(0.5);
    let original = common::segments(&[(0.0, 1.0, "only original")]);

    let content = formatter.format_bilingual(&original, &[]);

    assert_eq!(content, "1\n00:00:00,000 --> 00:00:01,000\nonly original\n");
}

#[test]
fn test_format_bilingual_shouldStackLinesInSrt() {
    let formatter = SrtFormatter::new(0.5);
    let original = common::segments(&[(0.0, 1.0, "Hello")]);
    let translated = common::segments(&[(0.0, 1.0, "Hallo")]);

    let content = formatter.format_bilingual(&original, &translated);

    assert_eq!(content, "1\n00:00:00,000 --> 00:00:01,000\nHello\nHallo\n");
}
