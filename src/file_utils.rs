use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::formats::OutputFormat;
use crate::segment::TranscriptionResult;

// @module: File and directory utilities

// @const: First SRT block header, used to sniff extension-less files
static SRT_BLOCK_REGEX: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?m)^\d+\s*\r?\n\d{2}:\d{2}:\d{2},\d{3}\s+-->\s+\d{2}:\d{2}:\d{2},\d{3}").ok()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Output path for a subtitle file
    // @params: input_file, output_dir, language tag, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        language: &str,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default().to_string_lossy();
        output_dir
            .as_ref()
            .join(format!("{}.{}.{}", stem, language, extension.trim_start_matches('.')))
    }

    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            let matches = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted));
            if path.is_file() && matches {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load a transcription result serialized as JSON
    pub fn read_transcription<P: AsRef<Path>>(path: P) -> Result<TranscriptionResult> {
        let content = Self::read_to_string(&path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse transcription JSON: {:?}", path.as_ref()))
    }

    /// Detect whether a file is a transcription or an already written subtitle
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
        {
            return Ok(FileType::Transcription);
        }
        if let Some(format) = OutputFormat::from_path(path) {
            return Ok(FileType::Subtitle(format));
        }

        // Fall back to examining file contents
        let Ok(content) = fs::read_to_string(path) else {
            return Ok(FileType::Unknown);
        };
        let head = content.trim_start_matches('\u{feff}').trim_start();

        if head.starts_with('{') && head.contains("\"segments\"") {
            return Ok(FileType::Transcription);
        }
        if head.starts_with("WEBVTT") {
            return Ok(FileType::Subtitle(OutputFormat::Vtt));
        }
        if head.starts_with("[Script Info]") {
            return Ok(FileType::Subtitle(OutputFormat::Ass));
        }
        if SRT_BLOCK_REGEX.as_ref().is_some_and(|re| re.is_match(head)) {
            return Ok(FileType::Subtitle(OutputFormat::Srt));
        }

        // Default to unknown if we couldn't determine the type
        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Recognizer output serialized as JSON
    Transcription,
    /// Subtitle file in one of the emitted formats
    Subtitle(OutputFormat),
    /// Unknown file type
    Unknown,
}
