/*!
 * Tests for segment merging
 */

use srtforge::merger;
use crate::common;

/// Merged cues must cover exactly the span of the input and keep every word
#[test]
fn test_merge_withManySegments_shouldPreserveSpanAndText() {
    let input = common::segments(&[
        (0.0, 1.0, "one"),
        (1.1, 2.0, "two"),
        (2.5, 3.0, "three"),
        (9.0, 10.0, "four"),
        (10.2, 11.0, "five"),
    ]);

    let out = merger::merge(&input, 30.0, 500);

    assert_eq!(out.len(), 2);
    assert_eq!(out.first().map(|s| s.start), Some(0.0));
    assert_eq!(out.last().map(|s| s.end), Some(11.0));

    let words: Vec<String> = out.iter().flat_map(|s| s.text.split(' ').map(str::to_string)).collect();
    assert_eq!(words, vec!["one", "two", "three", "four", "five"]);
}

#[test]
fn test_merge_appliedTwice_shouldBeStableForTightLimits() {
    let input = common::segments(&[(0.0, 1.0, "aaaa"), (1.0, 2.0, "bbbb"), (2.0, 3.0, "cccc")]);

    let once = merger::merge(&input, 30.0, 9);
    let twice = merger::merge(&once, 30.0, 9);

    assert_eq!(once.len(), 2);
    assert_eq!(once, twice);
}

#[test]
fn test_merge_shouldRespectLimitsForEveryCombinedCue() {
    let input = common::segments(&[
        (0.0, 4.0, "a long sentence here"),
        (4.0, 8.0, "and another one"),
        (8.0, 12.0, "and yet another"),
        (12.0, 16.0, "final words"),
    ]);

    let out = merger::merge(&input, 8.0, 40);

    for cue in &out {
        assert!(cue.duration() <= 8.0);
        assert!(cue.char_count() <= 40);
    }
    assert_eq!(out.len(), 2);
}

#[test]
fn test_merge_withSingleSegment_shouldReturnItUnchanged() {
    let input = common::segments(&[(3.0, 4.0, "alone")]);
    assert_eq!(merger::merge(&input, 30.0, 500), input);
}
