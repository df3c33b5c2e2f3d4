use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::formats::OutputFormat;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), or "auto" to let the translator detect it
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO); no translation happens when absent
    #[serde(default)]
    pub target_language: Option<String>,

    /// Timeline and output settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translator variant
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorKind {
    // @provider: Offline placeholder that tags text
    #[default]
    Simple,
    // @provider: Google web translation endpoint
    Google,
    // @provider: OpenAI chat completions
    OpenAI,
    // @provider: Local Ollama server
    Offline,
}

impl TranslatorKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Simple => "Simple",
            Self::Google => "Google",
            Self::OpenAI => "OpenAI",
            Self::Offline => "Offline (Ollama)",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Simple => "simple".to_string(),
            Self::Google => "google".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Offline => "offline".to_string(),
        }
    }

    /// Whether the provider talks to a remote service that needs an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI)
    }
}

impl std::fmt::Display for TranslatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslatorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "google" => Ok(Self::Google),
            "openai" => Ok(Self::OpenAI),
            "offline" | "ollama" => Ok(Self::Offline),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Per-provider connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,
}

impl ProviderConfig {
    // @param kind: Provider enum
    // @returns: Provider config with defaults
    pub fn new(kind: TranslatorKind) -> Self {
        Self {
            provider_type: kind.to_lowercase_string(),
            model: default_model(kind),
            api_key: String::new(),
            endpoint: default_endpoint(kind),
        }
    }
}

/// Style of the single ASS style line
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssStyleConfig {
    #[serde(default = "default_style_name")]
    pub style_name: String,

    #[serde(default = "default_font_name")]
    pub font_name: String,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Primary colour in ASS `&HAABBGGRR` notation
    #[serde(default = "default_primary_color")]
    pub primary_color: String,

    #[serde(default = "default_outline")]
    pub outline: u32,

    #[serde(default)]
    pub shadow: u32,

    /// Numpad-style position, 1 to 9
    #[serde(default = "default_alignment")]
    pub alignment: u8,
}

impl Default for AssStyleConfig {
    fn default() -> Self {
        Self {
            style_name: default_style_name(),
            font_name: default_font_name(),
            font_size: default_font_size(),
            primary_color: default_primary_color(),
            outline: default_outline(),
            shadow: 0,
            alignment: default_alignment(),
        }
    }
}

impl AssStyleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.style_name.trim().is_empty() || self.font_name.trim().is_empty() {
            return Err(anyhow!("ASS style and font names must not be empty"));
        }
        // Commas would shift every following field of the Style line
        if self.style_name.contains(',') || self.font_name.contains(',') {
            return Err(anyhow!("ASS style and font names must not contain commas"));
        }
        if self.font_size == 0 {
            return Err(anyhow!("ASS font size must be greater than 0"));
        }
        if !(1..=9).contains(&self.alignment) {
            return Err(anyhow!("ASS alignment must be between 1 and 9, got {}", self.alignment));
        }
        Ok(())
    }
}

/// Timeline and emission settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProcessingConfig {
    /// Coalesce short adjacent segments before translation
    #[serde(default)]
    pub merge_segments: bool,

    /// Shortest cue written to the output, in seconds
    #[serde(default = "default_min_segment_duration")]
    pub min_segment_duration: f64,

    /// Longest cue the merger may build, in seconds
    #[serde(default = "default_max_segment_duration")]
    pub max_segment_duration: f64,

    /// Longest text the merger may build, in characters
    #[serde(default = "default_max_segment_chars")]
    pub max_segment_chars: usize,

    /// Largest silence the merger bridges, in seconds
    #[serde(default = "default_merge_gap")]
    pub merge_gap: f64,

    #[serde(default)]
    pub output_format: OutputFormat,

    /// Write original and translated text in the same cue
    #[serde(default)]
    pub bilingual: bool,

    #[serde(default)]
    pub ass_style: AssStyleConfig,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            merge_segments: false,
            min_segment_duration: default_min_segment_duration(),
            max_segment_duration: default_max_segment_duration(),
            max_segment_chars: default_max_segment_chars(),
            merge_gap: default_merge_gap(),
            output_format: OutputFormat::default(),
            bilingual: false,
            ass_style: AssStyleConfig::default(),
        }
    }
}

impl ProcessingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_segment_duration > 0.0) {
            return Err(anyhow!("min_segment_duration must be positive"));
        }
        if self.max_segment_duration < self.min_segment_duration {
            return Err(anyhow!(
                "max_segment_duration ({}) must not be below min_segment_duration ({})",
                self.max_segment_duration,
                self.min_segment_duration
            ));
        }
        if self.max_segment_chars == 0 {
            return Err(anyhow!("max_segment_chars must be greater than 0"));
        }
        if self.merge_gap < 0.0 {
            return Err(anyhow!("merge_gap must not be negative"));
        }
        self.ass_style.validate().context("Invalid ASS style")
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslatorKind,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Upper bound of characters sent in one request
    #[serde(default = "default_max_batch_chars")]
    pub max_batch_chars: usize,

    /// Upper bound of segments sent in one request
    #[serde(default = "default_max_batch_segments")]
    pub max_batch_segments: usize,

    /// Batches in flight at the same time for one job
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            max_batch_chars: default_max_batch_chars(),
            max_batch_segments: default_max_batch_segments(),
            max_concurrent_requests: default_max_concurrent_requests(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_min_segment_duration() -> f64 {
    1.0
}

fn default_max_segment_duration() -> f64 {
    30.0
}

fn default_max_segment_chars() -> usize {
    500
}

fn default_merge_gap() -> f64 {
    crate::merger::DEFAULT_MERGE_GAP
}

fn default_style_name() -> String {
    "Default".to_string()
}

fn default_font_name() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    36
}

fn default_primary_color() -> String {
    "&H00FFFFFF".to_string()
}

fn default_outline() -> u32 {
    2
}

fn default_alignment() -> u8 {
    2 // bottom center
}

fn default_max_batch_chars() -> usize {
    1000
}

fn default_max_batch_segments() -> usize {
    20
}

fn default_max_concurrent_requests() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_endpoint(kind: TranslatorKind) -> String {
    match kind {
        TranslatorKind::Simple => String::new(),
        TranslatorKind::Google => "https://translate.googleapis.com/translate_a/single".to_string(),
        TranslatorKind::OpenAI => "https://api.openai.com/v1".to_string(),
        TranslatorKind::Offline => "http://localhost:11434".to_string(),
    }
}

fn default_model(kind: TranslatorKind) -> String {
    match kind {
        TranslatorKind::Simple | TranslatorKind::Google => String::new(),
        TranslatorKind::OpenAI => "gpt-4o-mini".to_string(),
        TranslatorKind::Offline => "llama3.2:3b".to_string(),
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        if !self.source_language.eq_ignore_ascii_case("auto") {
            language_utils::validate_language_code(&self.source_language)
                .context("Invalid source language")?;
        }
        if let Some(target) = &self.target_language {
            language_utils::validate_language_code(target).context("Invalid target language")?;
        }

        self.processing.validate()?;

        let common = &self.translation.common;
        if common.max_batch_chars == 0 || common.max_batch_segments == 0 {
            return Err(anyhow!("Batch limits must be greater than 0"));
        }
        if common.max_concurrent_requests == 0 {
            return Err(anyhow!("max_concurrent_requests must be greater than 0"));
        }

        // Only the providers that are actually used need their key
        if self.target_language.is_some() && self.translation.provider.requires_api_key() {
            if self.translation.get_api_key().is_empty() {
                return Err(anyhow!(
                    "Translation API key is required for {} provider",
                    self.translation.provider.display_name()
                ));
            }
        }

        let endpoint = self.translation.get_endpoint();
        if !endpoint.is_empty() {
            url::Url::parse(&endpoint).with_context(|| format!("Invalid provider endpoint: {}", endpoint))?;
        }

        Ok(())
    }

    /// Load a configuration file, writing the default one when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        crate::file_utils::FileManager::write_to_file(path, &config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Default location of the configuration file in the user's config directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("srtforge").join("conf.json"))
            .unwrap_or_else(|| PathBuf::from("conf.json"))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: None,
            processing: ProcessingConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, kind: &TranslatorKind) -> Option<&ProviderConfig> {
        let provider_str = kind.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, created on demand
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        match self.get_active_provider_config() {
            Some(provider_config) if !provider_config.model.is_empty() => provider_config.model.clone(),
            _ => default_model(self.provider),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        match self.get_active_provider_config() {
            Some(provider_config) if !provider_config.endpoint.is_empty() => provider_config.endpoint.clone(),
            _ => default_endpoint(self.provider),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslatorKind::default(),
            available_providers: vec![
                ProviderConfig::new(TranslatorKind::Simple),
                ProviderConfig::new(TranslatorKind::Google),
                ProviderConfig::new(TranslatorKind::OpenAI),
                ProviderConfig::new(TranslatorKind::Offline),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
