use crate::errors::TranslationError;
use crate::segment::Segment;

/// Zips original and translated segments into dual-line cues
///
/// Cue `i` keeps the timing, language and confidence of `original[i]` and
/// shows the original line above the translated one. Lists of different
/// length cannot be aligned and are rejected.
pub fn combine(original: &[Segment], translated: &[Segment]) -> Result<Vec<Segment>, TranslationError> {
    if original.len() != translated.len() {
        return Err(TranslationError::CardinalityMismatch {
            original: original.len(),
            translated: translated.len(),
        });
    }

    Ok(original
        .iter()
        .zip(translated)
        .map(|(orig, trans)| orig.with_text(format!("{}\n{}", orig.text, trans.text)))
        .collect())
}
