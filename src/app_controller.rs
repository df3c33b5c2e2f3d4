use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::processor::{ProcessingResult, Processor};

// @module: Application controller for file and folder jobs

/// Counts reported after a folder run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
pub struct Controller {
    // @field: Pipeline driver built from the app configuration
    processor: Processor,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            processor: Processor::new(config)?,
        })
    }

    /// Create a controller around an existing processor
    pub fn with_processor(processor: Processor) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Process one transcription file
    ///
    /// The subtitle lands next to the input unless `output_dir` is given.
    /// Returns `None` when the output exists and `force_overwrite` is off.
    pub async fn run(
        &self,
        input_file: &Path,
        output_dir: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<Option<ProcessingResult>> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        if let FileType::Subtitle(format) = FileManager::detect_file_type(input_file)? {
            return Err(anyhow!("{:?} is already a {} subtitle, expected a transcription JSON file", input_file, format));
        }

        let transcription = FileManager::read_transcription(input_file)?;

        let output_dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input_file.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let output_path = FileManager::generate_output_path(
            input_file,
            &output_dir,
            &self.processor.output_language(&transcription),
            self.processor.config().processing.output_format.extension(),
        );

        if output_path.exists() && !force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_path);
            return Ok(None);
        }

        let result = self.processor.process(transcription, &output_path).await?;
        if result.translation_fallback {
            warn!("Some cues in {:?} kept their original text", output_path);
        }
        Ok(Some(result))
    }

    /// Process every transcription JSON file below `input_dir`
    pub async fn run_folder(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_files(input_dir, "json")?;
        if files.is_empty() {
            return Err(anyhow!("No transcription files found in directory: {:?}", input_dir));
        }

        let progress = Self::folder_progress_bar(files.len() as u64);
        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress.set_message(format!("Processing: {}", file_name));

            // Keep the input's relative layout below the output directory
            let target_dir: Option<PathBuf> = output_dir.map(|out| {
                file.parent()
                    .and_then(|parent| parent.strip_prefix(input_dir).ok())
                    .map(|relative| out.join(relative))
                    .unwrap_or_else(|| out.to_path_buf())
            });

            match self.run(file, target_dir.as_deref(), force_overwrite).await {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            progress.inc(1);
        }

        progress.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            summary.processed,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    fn folder_progress_bar(len: u64) -> ProgressBar {
        let progress = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("█▓▒░"));
        progress
    }

    /// Human readable duration, e.g. `2m 5s` or `4.250s`
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
