use crate::formats::{split_timestamp, OutputFormat, SubtitleFormatter, DEFAULT_MIN_DURATION};
use crate::segment::Segment;

/// WebVTT emitter
#[derive(Debug, Clone)]
pub struct VttFormatter {
    min_duration: f64,
}

impl VttFormatter {
    pub fn new(min_duration: f64) -> Self {
        Self { min_duration }
    }

    /// Format seconds as a WebVTT timestamp (HH:MM:SS.mmm)
    pub fn format_timestamp(seconds: f64) -> String {
        let (h, m, s, ms) = split_timestamp(seconds, 1000);
        format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
    }
}

impl Default for VttFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DURATION)
    }
}

impl SubtitleFormatter for VttFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Vtt
    }

    fn min_duration(&self) -> f64 {
        self.min_duration
    }

    fn render(&self, cues: &[Segment]) -> String {
        let mut out = String::from("WEBVTT\n\n");
        for cue in cues {
            out.push_str(&format!(
                "{} --> {}\n{}\n\n",
                Self::format_timestamp(cue.start),
                Self::format_timestamp(cue.end),
                cue.text
            ));
        }
        out
    }
}
