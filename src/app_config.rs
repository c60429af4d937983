use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::formats::OutputFormat;
use crate::language_utils::validate_language_code;
use crate::layout::LayoutConfig;
use crate::output::{ExistsPolicy, SkipScope};

/// Application configuration module
/// This module handles loading, validating and saving the configuration.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Source language code (ISO), detected by the recognizer when unset
    #[serde(default)]
    pub source_language: Option<String>,

    /// Target language code (ISO), no translation when unset
    #[serde(default)]
    pub target_language: Option<String>,

    /// Artifact format and collision handling
    #[serde(default)]
    pub output: OutputConfig,

    /// Line, block and duration budgets
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Speech recognizer settings
    #[serde(default)]
    pub recognition: RecognitionConfig,

    /// Translator settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output section
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    // @field: Artifact format
    #[serde(default)]
    pub format: OutputFormat,

    // @field: Collision policy
    #[serde(default)]
    pub exists: ExistsPolicy,

    // @field: Whether a skipped artifact also skips the rest of the item
    #[serde(default)]
    pub skip_scope: SkipScope,

    // @field: Insert the language code before the extension
    #[serde(default)]
    pub language_suffix: bool,

    // @field: Write the transcription next to the translation
    #[serde(default)]
    pub export_all: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            exists: ExistsPolicy::default(),
            skip_scope: SkipScope::default(),
            language_suffix: false,
            export_all: false,
        }
    }
}

/// Recognition section
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecognitionConfig {
    // @field: whisper executable
    #[serde(default = "default_whisper_binary")]
    pub binary: String,

    // @field: whisper model name
    #[serde(default = "default_whisper_model")]
    pub model: String,

    // @field: cpu or cuda
    #[serde(default)]
    pub device: Option<String>,

    // @field: Timeout seconds for one media file
    #[serde(default = "default_recognition_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,

    // @field: Beam search width
    #[serde(default)]
    pub beam_size: Option<u32>,

    // @field: Candidates when sampling
    #[serde(default)]
    pub best_of: Option<u32>,

    // @field: Text guiding the first window
    #[serde(default)]
    pub initial_prompt: Option<String>,

    // @field: Extensions picked up when walking folders
    #[serde(default = "default_media_extensions")]
    pub media_extensions: Vec<String>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            binary: default_whisper_binary(),
            model: default_whisper_model(),
            device: None,
            timeout_secs: default_recognition_timeout_secs(),
            temperature: None,
            beam_size: None,
            best_of: None,
            initial_prompt: None,
            media_extensions: default_media_extensions(),
        }
    }
}

/// Translation section
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    // @field: Ollama service URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    // @field: Model name
    #[serde(default = "default_ollama_model")]
    pub model: String,

    // @field: Timeout seconds per request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Retries after a failed request
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Base backoff, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ollama_endpoint(),
            model: default_ollama_model(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Log level
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
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_whisper_binary() -> String {
    "whisper".to_string()
}

fn default_whisper_model() -> String {
    "tiny".to_string()
}

fn default_recognition_timeout_secs() -> u64 {
    3600
}

fn default_media_extensions() -> Vec<String> {
    ["mp3", "wav", "m4a", "flac", "aac", "ogg", "wma", "mp4", "mkv", "webm", "opus", "mov", "avi"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.3
}

impl Config {
    /// Reads the config file, or writes the defaults there when it does not exist.
    ///
    /// Returns the config and whether it was just created.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let config: Config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok((config, false));
        }

        let config = Config::default();
        config.save(path)?;
        Ok((config, true))
    }

    /// Writes the config as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Whether a translation pass is requested
    pub fn wants_translation(&self) -> bool {
        self.target_language.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        for code in [&self.source_language, &self.target_language].into_iter().flatten() {
            validate_language_code(code)?;
        }

        self.layout.validate()?;

        if self.recognition.binary.trim().is_empty() || self.recognition.model.trim().is_empty() {
            return Err(anyhow!("Recognition binary and model must be set"));
        }
        if self.recognition.timeout_secs == 0 {
            return Err(anyhow!("Recognition timeout must be greater than zero"));
        }
        if self.recognition.media_extensions.is_empty() {
            return Err(anyhow!("At least one media extension is required"));
        }
        if let Some(device) = &self.recognition.device {
            if !matches!(device.as_str(), "cpu" | "cuda") {
                return Err(anyhow!("Invalid device: {} (expected cpu or cuda)", device));
            }
        }

        if self.wants_translation() {
            let endpoint = Url::parse(&self.translation.endpoint)
                .with_context(|| format!("Invalid translation endpoint: {}", self.translation.endpoint))?;
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(anyhow!("Translation endpoint must use http or https: {}", endpoint));
            }
            if self.translation.model.trim().is_empty() {
                return Err(anyhow!("A translation model is required when a target language is set"));
            }
        }

        Ok(())
    }
}
