use serde::{Deserialize, Serialize};
use std::fmt;

// @module: Timed text segments and recognition/translation results

/// Adjacent segments may overlap by this much before a sequence is rejected
pub const OVERLAP_TOLERANCE_SECS: f64 = 0.1;

// @struct: Single timed utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Utterance text
    pub text: String,

    // @field: Language tag set by the transcriber or translator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    // @field: Recognition confidence in [0, 1], informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Segment {
    /// Creates a segment without language or confidence
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Segment {
            start,
            end,
            text: text.into(),
            language: None,
            confidence: None,
        }
    }

    /// Builder-style language tag
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builder-style confidence score
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Returns a copy carrying `text` instead of the current text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Segment {
            text: text.into(),
            ..self.clone()
        }
    }

    // @validates: start >= 0, end > start, non-blank text
    pub fn is_valid(&self) -> bool {
        self.start >= 0.0 && self.end > self.start && !self.text.trim().is_empty()
    }

    /// Number of Unicode scalar values in the text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{:.3} -> {:.3}] {}", self.start, self.end, self.text)
    }
}

/// Checks that every segment is valid and that the sequence is ordered
///
/// Neighbours may overlap by up to [`OVERLAP_TOLERANCE_SECS`] to absorb
/// recognizer jitter. An empty sequence is valid.
pub fn validate_segments(segments: &[Segment]) -> bool {
    segments.iter().all(Segment::is_valid)
        && segments.windows(2).all(|pair| {
            let (prev, next) = (&pair[0], &pair[1]);
            next.start >= prev.start && prev.end - next.start <= OVERLAP_TOLERANCE_SECS
        })
}

/// Output of one transcription call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Recognized segments in order
    pub segments: Vec<Segment>,

    /// Detected language
    pub language: String,

    /// Concatenated text of all segments
    #[serde(default)]
    pub text: String,

    /// Name of the recognition model
    pub model_name: String,
}

impl TranscriptionResult {
    /// Builds a result and derives the full text from the segments
    pub fn from_segments(segments: Vec<Segment>, language: impl Into<String>, model_name: impl Into<String>) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        TranscriptionResult {
            segments,
            language: language.into(),
            text,
            model_name: model_name.into(),
        }
    }

    /// End time of the last segment, or 0 when empty
    pub fn duration(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.end)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_valid(&self) -> bool {
        !self.language.is_empty() && !self.model_name.is_empty()
    }
}

/// Output of one translation call, index-aligned with its input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Translated segments, same count and order as the input
    pub segments: Vec<Segment>,

    /// Source language code ("auto" when unknown)
    pub source_language: String,

    /// Target language code
    pub target_language: String,

    /// Name of the translator that produced the result
    pub translator_name: String,

    /// Segments that kept their original text after a failed or short batch
    #[serde(default)]
    pub fallback_count: usize,
}

impl TranslationResult {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_valid(&self) -> bool {
        !self.source_language.is_empty() && !self.target_language.is_empty() && !self.translator_name.is_empty()
    }
}
