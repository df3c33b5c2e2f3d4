/*!
 * Advanced SubStation Alpha emitter.
 *
 * Output is a minimal v4.00+ script: a `[Script Info]` block, one style built
 * from [`AssStyleConfig`], and a `Dialogue:` event per corrected cue.
 */

use std::fmt::Write as _;

use crate::app_config::AssStyleConfig;
use crate::formats::{split_timestamp, OutputFormat, SubtitleFormatter, DEFAULT_MIN_DURATION};
use crate::segment::Segment;

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, \
BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, \
Alignment, MarginL, MarginR, MarginV, Encoding";

const EVENT_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// ASS emitter carrying the single style every event uses
#[derive(Debug, Clone)]
pub struct AssFormatter {
    style: AssStyleConfig,
    min_duration: f64,
}

impl AssFormatter {
    pub fn new(style: AssStyleConfig, min_duration: f64) -> Self {
        Self { style, min_duration }
    }

    pub fn style(&self) -> &AssStyleConfig {
        &self.style
    }

    /// Format seconds as an ASS timestamp (H:MM:SS.cc)
    pub fn format_timestamp(seconds: f64) -> String {
        let (h, m, s, cs) = split_timestamp(seconds, 100);
        format!("{}:{:02}:{:02}.{:02}", h, m, s, cs)
    }

    /// Replaces line breaks with the `\N` override, a CRLF pair counting as one break
    pub fn escape_text(text: &str) -> String {
        text.replace("\r\n", "\\N").replace(['\n', '\r'], "\\N")
    }

    fn style_line(&self) -> String {
        let s = &self.style;
        format!(
            "Style: {},{},{},{},&H000000FF,&H00000000,&H3F000000,0,0,0,0,100,100,0,0,1,{},{},{},10,10,10,1",
            s.style_name, s.font_name, s.font_size, s.primary_color, s.outline, s.shadow, s.alignment
        )
    }
}

impl Default for AssFormatter {
    fn default() -> Self {
        Self::new(AssStyleConfig::default(), DEFAULT_MIN_DURATION)
    }
}

impl SubtitleFormatter for AssFormatter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Ass
    }

    fn min_duration(&self) -> f64 {
        self.min_duration
    }

    fn render(&self, cues: &[Segment]) -> String {
        let mut out = String::new();

        out.push_str("[Script Info]\n");
        out.push_str("ScriptType: v4.00+\n");
        out.push_str("WrapStyle: 0\n");
        out.push_str("ScaledBorderAndShadow: yes\n\n");

        out.push_str("[V4+ Styles]\n");
        out.push_str(STYLE_FORMAT);
        out.push('\n');
        out.push_str(&self.style_line());
        out.push_str("\n\n");

        out.push_str("[Events]\n");
        out.push_str(EVENT_FORMAT);
        out.push('\n');

        for cue in cues {
            // Writing into a String cannot fail
            let _ = writeln!(
                out,
                "Dialogue: 0,{},{},{},,0,0,0,,{}",
                Self::format_timestamp(cue.start),
                Self::format_timestamp(cue.end),
                self.style.style_name,
                Self::escape_text(&cue.text)
            );
        }

        out
    }
}
