/*!
 * Subtitle emitters.
 *
 * Three serializers share one contract: run the timing correction pass with
 * the emitter's minimum cue duration, then render the corrected cues in the
 * format's own timestamp and markup conventions.
 *
 * - `srt`: SubRip, `HH:MM:SS,mmm`, numbered blocks
 * - `vtt`: WebVTT, `HH:MM:SS.mmm`, `WEBVTT` header
 * - `ass`: Advanced SubStation Alpha, `H:MM:SS.cc`, script/style/event sections
 */

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::bilingual;
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::segment::Segment;
use crate::timing;

pub mod ass;
pub mod srt;
pub mod vtt;

pub use ass::AssFormatter;
pub use srt::SrtFormatter;
pub use vtt::VttFormatter;

/// Minimum cue duration used when no configuration overrides it
pub const DEFAULT_MIN_DURATION: f64 = 0.5;

// Tolerance, in timestamp units, for products like 0.57 * 1000 = 569.999...
const TIMESTAMP_EPSILON: f64 = 1e-6;

/// Subtitle file format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: SubRip
    #[default]
    Srt,
    // @format: WebVTT
    Vtt,
    // @format: Advanced SubStation Alpha
    Ass,
}

impl OutputFormat {
    // @returns: File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
        }
    }

    // @returns: Human readable format name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Srt => "SubRip",
            Self::Vtt => "WebVTT",
            Self::Ass => "Advanced SubStation Alpha",
        }
    }

    /// Detects the format from a file extension, case-insensitively
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "ass" => Ok(Self::Ass),
            _ => Err(SubtitleError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Serialized subtitle text and the number of cues it holds
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSubtitle {
    pub content: String,
    pub cue_count: usize,
}

/// Common behaviour of the subtitle emitters
pub trait SubtitleFormatter: Send + Sync {
    /// Format produced by this emitter
    fn output_format(&self) -> OutputFormat;

    /// Shortest cue the correction pass will emit, in seconds
    fn min_duration(&self) -> f64;

    /// Serializes cues that already went through timing correction
    fn render(&self, cues: &[Segment]) -> String;

    /// Corrects timing and serializes the result
    fn format_segments(&self, segments: &[Segment]) -> String {
        self.format_counted(segments).content
    }

    /// Serializes dual-line cues, or the original alone when the lists do not align
    fn format_bilingual(&self, original: &[Segment], translated: &[Segment]) -> String {
        self.format_bilingual_counted(original, translated).content
    }

    /// Like `format_segments`, also reporting how many cues survived correction
    fn format_counted(&self, segments: &[Segment]) -> RenderedSubtitle {
        let cues = timing::correct(segments, self.min_duration());
        RenderedSubtitle {
            content: self.render(&cues),
            cue_count: cues.len(),
        }
    }

    /// Like `format_bilingual`, also reporting how many cues survived correction
    fn format_bilingual_counted(&self, original: &[Segment], translated: &[Segment]) -> RenderedSubtitle {
        match bilingual::combine(original, translated) {
            Ok(combined) => self.format_counted(&combined),
            Err(e) => {
                warn!("Bilingual output unavailable ({}), writing original text only", e);
                self.format_counted(original)
            }
        }
    }

    /// Writes `content` to `path`, creating parent directories
    fn save(&self, content: &str, path: &Path) -> bool {
        save_subtitle(content, path)
    }
}

/// Builds the emitter for `format`
pub fn formatter_for(format: OutputFormat, min_duration: f64, style: &crate::app_config::AssStyleConfig) -> Box<dyn SubtitleFormatter> {
    match format {
        OutputFormat::Srt => Box::new(SrtFormatter::new(min_duration)),
        OutputFormat::Vtt => Box::new(VttFormatter::new(min_duration)),
        OutputFormat::Ass => Box::new(AssFormatter::new(style.clone(), min_duration)),
    }
}

/// Writes subtitle text as UTF-8, returning whether the write succeeded
pub fn save_subtitle(content: &str, path: &Path) -> bool {
    match FileManager::write_to_file(path, content) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to save subtitle file {}: {:#}", path.display(), e);
            false
        }
    }
}

// @returns: (hours, minutes, seconds, fraction) with fraction in 1/`units` of a second
// Truncates toward zero after absorbing float error (0.57 s is 570 ms, not 569),
// negatives render as zero.
pub(crate) fn split_timestamp(seconds: f64, units: u64) -> (u64, u64, u64, u64) {
    let total = if seconds > 0.0 {
        (seconds * units as f64 + TIMESTAMP_EPSILON) as u64
    } else {
        0
    };
    let whole_seconds = total / units;

    (whole_seconds / 3600, (whole_seconds % 3600) / 60, whole_seconds % 60, total % units)
}
