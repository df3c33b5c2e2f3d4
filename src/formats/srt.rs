use crate::formats::{split_timestamp, OutputFormat, SubtitleFormatter, DEFAULT_MIN_DURATION};
use crate::segment::Segment;

// @struct: SubRip emitter
#[derive(Debug, Clone)]
pub struct SrtFormatter {
    // @field: Minimum cue duration in seconds
    min_duration: f64,
}

impl SrtFormatter {
    pub fn new(min_duration: f64) -> Self {
        Self { min_duration }
    }

    /// Format seconds as an SRT timestamp (HH:MM:SS,mmm)
    pub fn format_timestamp(seconds: f64) -> String {
        let (h, m, s, ms) = split_timestamp(seconds, 1000);
        format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
    }
}

impl Default for SrtFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DURATION)
    }
}

impl SubtitleFormatter for SrtFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Srt
    }

    fn min_duration(&self) -> f64 {
        self.min_duration
    }

    fn render(&self, cues: &[Segment]) -> String {
        cues.iter()
            .enumerate()
            .map(|(i, cue)| {
                format!(
                    "{}\n{} --> {}\n{}\n",
                    i + 1,
                    Self::format_timestamp(cue.start),
                    Self::format_timestamp(cue.end),
                    cue.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
