/*!
 * # srtforge - subtitle timelines to SRT, WebVTT and ASS
 *
 * A Rust library that turns speech-recognition output (timed text segments)
 * into subtitle files, optionally machine-translated and optionally bilingual.
 *
 * ## Features
 *
 * - Merge short adjacent segments under duration, length and gap limits
 * - Correct timing defects: overlaps, unsorted input, blank or degenerate cues
 * - Translate in request-sized batches with per-batch fallback:
 *   - Simple (offline placeholder)
 *   - Google web translation
 *   - OpenAI chat completions
 *   - Offline through a local Ollama server
 * - Combine original and translated text into dual-line cues
 * - Emit SubRip, WebVTT and Advanced SubStation Alpha
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `segment`: Segment model and transcription/translation results
 * - `timing`: Timing correction pass shared by the emitters
 * - `merger`: Greedy segment merging
 * - `bilingual`: Original/translated cue combination
 * - `formats`: SRT, WebVTT and ASS emitters
 * - `translation`: Translator capability and batching:
 *   - `translation::batch`: Batch grouping and ordered dispatch
 *   - `translation::protocol`: Prompt and response format for LLM providers
 * - `providers`: Client implementations for the translation backends
 * - `processor`: Per-job pipeline driver
 * - `app_controller`: File and folder jobs
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod bilingual;
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod language_utils;
pub mod merger;
pub mod processor;
pub mod providers;
pub mod segment;
pub mod timing;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
pub use formats::{OutputFormat, SubtitleFormatter};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use processor::{ProcessingResult, Processor};
pub use segment::{Segment, TranscriptionResult, TranslationResult};
pub use translation::{create_translator, Translator};
