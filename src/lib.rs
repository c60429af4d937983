/*!
 * # captionsmith
 *
 * A Rust library turning time-aligned speech transcriptions into lyric, subtitle
 * and caption files.
 *
 * ## Features
 *
 * - Five artifact formats: LRC, SRT, WebVTT, plain text and JSON records
 * - Pause-driven lyric lines and budget-driven subtitle blocks
 * - Balanced two-line layout and hyphen-aware word joining
 * - Block durations derived from word timing or from character counts
 * - Skip / overwrite / rename collision policy with optional language suffixes
 * - Speech recognition through the whisper CLI, translation through Ollama
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `transcript`: Segments, words and translations produced by the collaborators
 * - `timecode`: Timestamp formatting and parsing for each format
 * - `layout`: Line balancing, word grouping, duration balancing, pause segmentation
 * - `formats`: One emitter per artifact format behind `formats::synthesize`
 * - `output`: Output naming, collision policy and atomic writes
 * - `providers`: Recognizer and translator traits with their adapters:
 *   - `providers::whisper`: whisper command line recognizer
 *   - `providers::ollama`: Ollama translation client
 * - `app_controller`: Per-item pipeline and batch driver
 * - `app_config`: Configuration management
 * - `file_utils`: Media discovery
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
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod language_utils;
pub mod layout;
pub mod output;
pub mod providers;
pub mod timecode;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{BatchSummary, Controller, ItemOutcome};
pub use errors::{AppError, CollaboratorError, OutputError, SynthesisError, TimecodeError};
pub use formats::{synthesize, OutputFormat};
pub use layout::{LayoutConfig, TimingStrategy};
pub use output::{resolve_output_path, write_artifact, ExistsPolicy, LanguageTags, OutputLocks, OutputTarget, SkipScope};
pub use providers::{Recognizer, Translator};
pub use transcript::{Segment, TextSource, Transcription, Word};
