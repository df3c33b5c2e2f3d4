/*!
 * Timing correction for subtitle cues.
 *
 * Every emitter runs this pass before serializing. It takes the recognizer's
 * segments as they come and produces a new sequence that is sorted, free of
 * blank cues, non-overlapping and at least `min_duration` long per cue.
 */

use log::debug;

use crate::segment::Segment;

/// Returns a corrected copy of `segments`
///
/// Blank cues are dropped, negative starts clamped to zero, degenerate or
/// too-short cues stretched to `min_duration`, and overlapping cues pushed
/// forward so each one starts no earlier than the previous one ends. Nothing
/// is dropped for overlapping, and the pass never fails.
pub fn correct(segments: &[Segment], min_duration: f64) -> Vec<Segment> {
    let mut corrected: Vec<Segment> = segments
        .iter()
        .filter_map(|segment| {
            let text = segment.text.trim();
            if text.is_empty() {
                debug!("Dropping blank segment at {:.3}s", segment.start);
                return None;
            }

            let mut fixed = segment.with_text(text);
            if fixed.start < 0.0 {
                fixed.start = 0.0;
            }
            if fixed.end <= fixed.start || fixed.end - fixed.start < min_duration {
                fixed.end = fixed.start + min_duration;
            }
            Some(fixed)
        })
        .collect();

    // Vec::sort_by is stable, equal starts keep arrival order
    corrected.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut last_end = 0.0_f64;
    for segment in corrected.iter_mut() {
        if segment.start < last_end {
            debug!("Shifting overlapping segment from {:.3}s to {:.3}s", segment.start, last_end);
            segment.start = last_end;
            if segment.end - segment.start < min_duration {
                segment.end = segment.start + min_duration;
            }
        }
        last_end = segment.end;
    }

    corrected
}
