/*!
 * Tests for file utilities
 */

use std::fs;

use srtforge::file_utils::{FileManager, FileType};
use srtforge::formats::OutputFormat;
use crate::common;

#[test]
fn test_find_files_shouldRecurseAndSort() {
    let temp_dir = common::create_temp_dir().unwrap();
    let root = temp_dir.path();
    common::create_test_file(root, "b.json", "{}").unwrap();
    common::create_test_file(root, "a.JSON", "{}").unwrap();
    common::create_test_file(root, "nested/c.json", "{}").unwrap();
    common::create_test_file(root, "notes.txt", "x").unwrap();

    let files = FileManager::find_files(root, "json").unwrap();

    assert_eq!(files, vec![root.join("a.JSON"), root.join("b.json"), root.join("nested/c.json")]);
}

#[test]
fn test_read_transcription_shouldParseJson() {
    let temp_dir = common::create_temp_dir().unwrap();
    let transcription = common::sample_transcription();
    let path = common::create_test_transcription(temp_dir.path(), "talk.json", &transcription).unwrap();

    let loaded = FileManager::read_transcription(&path).unwrap();

    assert_eq!(loaded, transcription);
}

#[test]
fn test_read_transcription_withMinimalJson_shouldDefaultOptionalFields() {
    let temp_dir = common::create_temp_dir().unwrap();
    let json = r#"{"segments":[{"start":0.0,"end":1.0,"text":"hi"}],"language":"en","model_name":"tiny"}"#;
    let path = common::create_test_file(temp_dir.path(), "min.json", json).unwrap();

    let loaded = FileManager::read_transcription(&path).unwrap();

    assert_eq!(loaded.text, "");
    assert_eq!(loaded.segments[0].language, None);
    assert_eq!(loaded.segments[0].confidence, None);
}

#[test]
fn test_detect_file_type_shouldRecognizeEachKind() {
    let temp_dir = common::create_temp_dir().unwrap();
    let root = temp_dir.path();

    let json = common::create_test_transcription(root, "t.json", &common::sample_transcription()).unwrap();
    let srt = common::create_test_subtitle(root, "s.srt").unwrap();
    let srt_no_ext = common::create_test_subtitle(root, "subs.txt").unwrap();
    let vtt_no_ext = common::create_test_file(root, "webvtt.txt", "WEBVTT\n\n").unwrap();
    let unknown = common::create_test_file(root, "readme.txt", "plain text").unwrap();

    assert_eq!(FileManager::detect_file_type(&json).unwrap(), FileType::Transcription);
    assert_eq!(FileManager::detect_file_type(&srt).unwrap(), FileType::Subtitle(OutputFormat::Srt));
    assert_eq!(FileManager::detect_file_type(&srt_no_ext).unwrap(), FileType::Subtitle(OutputFormat::Srt));
    assert_eq!(FileManager::detect_file_type(&vtt_no_ext).unwrap(), FileType::Subtitle(OutputFormat::Vtt));
    assert_eq!(FileManager::detect_file_type(&unknown).unwrap(), FileType::Unknown);
    assert!(FileManager::detect_file_type(root.join("missing.srt")).is_err());
}

#[test]
fn test_write_to_file_shouldCreateParents() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("a/b/c.txt");

    FileManager::write_to_file(&path, "content").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "content");
}
