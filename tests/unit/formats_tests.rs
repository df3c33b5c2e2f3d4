/*!
 * Fixture tests for the SRT, WebVTT and ASS emitters
 */

use srtforge::app_config::AssStyleConfig;
use srtforge::formats::{self, AssFormatter, OutputFormat, SrtFormatter, SubtitleFormatter, VttFormatter};
use crate::common;

#[test]
fn test_srt_format_segments_withOverlap_shouldMatchFixture() {
    let input = common::segments(&[(0.0, 2.0, "Hello"), (1.5, 3.0, "World")]);

    let content = SrtFormatter::new(0.5).format_segments(&input);

    let expected = "1\n00:00:00,000 --> 00:00:02,000\nHello\n\n2\n00:00:02,000 --> 00:00:03,000\nWorld\n";
    assert_eq!(content, expected);
}

#[test]
fn test_vtt_format_segments_shouldMatchFixture() {
    let input = common::segments(&[(0.0, 1.5, "Hi"), (3723.25, 3725.0, "Later")]);

    let content = VttFormatter::new(0.5).format_segments(&input);

    let expected = "WEBVTT\n\n00:00:00.000 --> 00:00:01.500\nHi\n\n01:02:03.250 --> 01:02:05.000\nLater\n\n";
    assert_eq!(content, expected);
}

#[test]
fn test_ass_format_segments_shouldEmitHeaderStyleAndEvents() {
    let input = common::segments(&[(0.0, 1.5, "line one\nline two")]);
    let formatter = AssFormatter::new(AssStyleConfig::default(), 0.5);

    let content = formatter.format_segments(&input);

    assert!(content.starts_with("[Script Info]\nScriptType: v4.00+\n"));
    assert!(content.contains("[V4+ Styles]\n"));
    assert!(content.contains("\nStyle: Default,Arial,36,&H00FFFFFF,"));
    assert!(content.contains("[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n"));
    assert!(content.ends_with("Dialogue: 0,0:00:00.00,0:00:01.50,Default,,0,0,0,,line one\\Nline two\n"));
}

#[test]
fn test_ass_format_segments_withCustomStyle_shouldUseStyleName() {
    let style = AssStyleConfig {
        style_name: "Karaoke".to_string(),
        font_size: 48,
        alignment: 8,
        ..AssStyleConfig::default()
    };
    let formatter = AssFormatter::new(style, 0.5);

    let content = formatter.format_segments(&common::segments(&[(1.0, 2.0, "top")]));

    assert!(content.contains("Style: Karaoke,Arial,48,"));
    assert!(content.contains(",2,0,8,10,10,10,1\n"));
    assert!(content.contains("Dialogue: 0,0:00:01.00,0:00:02.00,Karaoke,,0,0,0,,top\n"));
}

#[test]
fn test_format_segments_withEmptyInput_shouldEmitOnlyHeaders() {
    assert_eq!(SrtFormatter::default().format_segments(&[]), "");
    assert_eq!(VttFormatter::default().format_segments(&[]), "WEBVTT\n\n");
    assert!(!AssFormatter::default().format_segments(&[]).contains("Dialogue:"));
}

#[test]
fn test_format_segments_withBlankCue_shouldRenumberSrt() {
    let input = common::segments(&[(0.0, 1.0, "first"), (1.0, 2.0, "  "), (2.0, 3.0, "second")]);

    let content = SrtFormatter::new(0.5).format_segments(&input);

    assert!(content.contains("2\n00:00:02,000 --> 00:00:03,000\nsecond\n"));
    assert!(!content.contains("\n3\n"));
}

#[test]
fn test_format_segments_withInexactFloatTimes_shouldRenderExactMilliseconds() {
    let input = common::segments(&[(0.57, 1.15, "tick")]);

    let srt = SrtFormatter::new(0.5).format_segments(&input);
    let vtt = VttFormatter::new(0.5).format_segments(&input);

    assert_eq!(srt, "1\n00:00:00,570 --> 00:00:01,150\ntick\n");
    assert_eq!(vtt, "WEBVTT\n\n00:00:00.570 --> 00:00:01.150\ntick\n\n");
}

#[test]
fn test_format_counted_withBlankCue_shouldCountWrittenCuesOnly() {
    let input = common::segments(&[(0.0, 1.0, "first"), (1.0, 2.0, ""), (2.0, 3.0, "second")]);

    let rendered = SrtFormatter::new(0.5).format_counted(&input);

    assert_eq!(rendered.cue_count, 2);
    assert_eq!(rendered.content, SrtFormatter::new(0.5).format_segments(&input));
}

#[test]
fn test_formatter_for_shouldPickEmitterByFormat() {
    let style = AssStyleConfig::default();
    for format in [OutputFormat::Srt, OutputFormat::Vtt, OutputFormat::Ass] {
        let formatter = formats::formatter_for(format, 0.75, &style);
        assert_eq!(formatter.output_format(), format);
        assert_eq!(formatter.min_duration(), 0.75);
    }
}

#[test]
fn test_save_shouldCreateParentDirectories() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("nested").join("deeper").join("out.srt");

    assert!(SrtFormatter::default().save("1\n00:00:00,000 --> 00:00:01,000\nx\n", &path));
    assert!(path.exists());
}

#[test]
fn test_save_withDirectoryInTheWay_shouldReturnFalse() {
    let temp_dir = common::create_temp_dir().unwrap();
    let blocker = common::create_test_file(temp_dir.path(), "blocker", "x").unwrap();

    assert!(!formats::save_subtitle("content", &blocker.join("out.vtt")));
}
