// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use srtforge::app_config::{self, Config, TranslatorKind};
use srtforge::app_controller::Controller;
use srtforge::formats::OutputFormat;

/// CLI Wrapper for TranslatorKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslatorKind {
    Simple,
    Google,
    #[value(name = "openai")]
    OpenAI,
    Offline,
}

impl From<CliTranslatorKind> for TranslatorKind {
    fn from(cli_provider: CliTranslatorKind) -> Self {
        match cli_provider {
            CliTranslatorKind::Simple => TranslatorKind::Simple,
            CliTranslatorKind::Google => TranslatorKind::Google,
            CliTranslatorKind::OpenAI => TranslatorKind::OpenAI,
            CliTranslatorKind::Offline => TranslatorKind::Offline,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Srt,
    Vtt,
    Ass,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Srt => OutputFormat::Srt,
            CliOutputFormat::Vtt => OutputFormat::Vtt,
            CliOutputFormat::Ass => OutputFormat::Ass,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write subtitles for a transcription file or a folder of them
    Process(ProcessArgs),

    /// Generate shell completions for srtforge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Transcription JSON file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Directory for the written subtitles (defaults to next to each input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Subtitle format to write
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Source language code, or 'auto' to use the detected one
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr'); enables translation
    #[arg(short, long)]
    target_language: Option<String>,

    /// Write original and translated text in the same cue
    #[arg(short, long)]
    bilingual: bool,

    /// Merge short adjacent segments before translation
    #[arg(short, long)]
    merge: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslatorKind>,

    /// Configuration file path
    #[arg(short, long, env = "SRTFORGE_CONFIG")]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// srtforge - subtitle files from speech-recognition output
#[derive(Parser, Debug)]
#[command(name = "srtforge")]
#[command(version)]
#[command(about = "Turn transcription segments into SRT, WebVTT or ASS subtitles")]
#[command(long_about = "srtforge reads transcription results (JSON), fixes their timing, optionally
translates them, and writes SubRip, WebVTT or Advanced SubStation Alpha subtitles.

EXAMPLES:
    srtforge process talk.json                       # Write talk.en.srt next to the input
    srtforge process -t fr -b talk.json              # Bilingual English/French cues
    srtforge process -t de -p openai --format ass talk.json
    srtforge process -m -o subs/ transcripts/        # Process a whole folder
    srtforge completions bash > srtforge.bash        # Generate bash completions

CONFIGURATION:
    Configuration is read from conf.json in the user's config directory unless
    --config-path is given. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    simple  - Offline placeholder, tags each line with the target code
    google  - Google web translation endpoint
    openai  - OpenAI API (requires API key)
    offline - Local Ollama server (default: llama3.2:3b)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger accepts everything, log::set_max_level does the filtering
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtforge", &mut std::io::stdout());
            Ok(())
        }
        Commands::Process(args) => run_process(args).await,
    }
}

async fn run_process(options: ProcessArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = options.config_path.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    apply_overrides(&mut config, &options);

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        match controller
            .run(&options.input_path, options.output.as_deref(), options.force_overwrite)
            .await?
        {
            Some(result) => info!("Success: {:?} ({} cues)", result.output_path, result.cue_count),
            None => info!("Nothing to do for {:?}", options.input_path),
        }
    } else if options.input_path.is_dir() {
        let summary = controller
            .run_folder(&options.input_path, options.output.as_deref(), options.force_overwrite)
            .await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} of {} files failed", summary.failed, summary.processed + summary.skipped + summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

// CLI flags win over the config file
fn apply_overrides(config: &mut Config, options: &ProcessArgs) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(format) = &options.format {
        config.processing.output_format = format.clone().into();
    }
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = Some(target_lang.clone());
    }
    if options.bilingual {
        config.processing.bilingual = true;
    }
    if options.merge {
        config.processing.merge_segments = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
