use crate::segment::Segment;

// @module: Greedy coalescing of adjacent segments

// @const: Largest silence bridged by a merge, in seconds
pub const DEFAULT_MERGE_GAP: f64 = 2.0;

/// Merges adjacent segments using the default gap threshold
pub fn merge(segments: &[Segment], max_duration: f64, max_chars: usize) -> Vec<Segment> {
    merge_with_gap(segments, max_duration, max_chars, DEFAULT_MERGE_GAP)
}

/// Merges adjacent segments left to right
///
/// A neighbour is folded into the current cue only when the combined cue
/// stays within `max_duration` seconds, `max_chars` characters, and the
/// silence between the two is at most `max_gap` seconds. Single pass, no
/// backtracking.
pub fn merge_with_gap(segments: &[Segment], max_duration: f64, max_chars: usize, max_gap: f64) -> Vec<Segment> {
    let mut iter = segments.iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut merged = Vec::with_capacity(segments.len());
    let mut current = first.clone();

    for next in iter {
        if can_merge(&current, next, max_duration, max_chars, max_gap) {
            current = combine_pair(&current, next);
        } else {
            merged.push(std::mem::replace(&mut current, next.clone()));
        }
    }
    merged.push(current);

    merged
}

fn can_merge(current: &Segment, next: &Segment, max_duration: f64, max_chars: usize, max_gap: f64) -> bool {
    let combined_duration = next.end - current.start;
    // +1 for the joining space
    let combined_chars = current.char_count() + 1 + next.char_count();
    let gap = next.start - current.end;

    combined_duration <= max_duration && combined_chars <= max_chars && gap <= max_gap
}

// @returns: New segment spanning both inputs
fn combine_pair(current: &Segment, next: &Segment) -> Segment {
    let confidence = match (current.confidence, next.confidence) {
        (Some(a), Some(b)) => Some((a + b) / 2.0),
        (a, b) => a.or(b),
    };

    Segment {
        start: current.start,
        end: next.end,
        text: format!("{} {}", current.text, next.text),
        language: current.language.clone().or_else(|| next.language.clone()),
        confidence,
    }
}
