use async_trait::async_trait;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

use crate::app_config::RecognitionConfig;
use crate::errors::CollaboratorError;
use crate::providers::Recognizer;
use crate::transcript::Transcription;

// @module: Speech recognition through the whisper command line tool

/// Runs `whisper` with word timestamps and reads back its JSON output
#[derive(Debug, Clone)]
pub struct WhisperCli {
    // @field: Executable name or path
    binary: String,
    // @field: Model name (tiny, base, small, ...)
    model: String,
    // @field: cpu or cuda, whisper picks when unset
    device: Option<String>,
    // @field: Decoding settings passed through unchanged
    temperature: Option<f32>,
    beam_size: Option<u32>,
    best_of: Option<u32>,
    initial_prompt: Option<String>,
    // @field: Upper bound for one media file
    timeout: Duration,
}

impl WhisperCli {
    pub fn new(binary: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
            device: None,
            temperature: None,
            beam_size: None,
            best_of: None,
            initial_prompt: None,
            timeout,
        }
    }

    /// Builds the recognizer from the `recognition` config section
    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            model: config.model.clone(),
            device: config.device.clone(),
            temperature: config.temperature,
            beam_size: config.beam_size,
            best_of: config.best_of,
            initial_prompt: config.initial_prompt.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Command line arguments for one run
    pub fn build_args(&self, media_path: &Path, output_dir: &Path, language: Option<&str>) -> Vec<String> {
        let mut args = vec![
            media_path.to_string_lossy().to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--task".to_string(),
            "transcribe".to_string(),
            "--word_timestamps".to_string(),
            "True".to_string(),
            "--output_format".to_string(),
            "json".to_string(),
            "--output_dir".to_string(),
            output_dir.to_string_lossy().to_string(),
            "--verbose".to_string(),
            "False".to_string(),
        ];

        let optional = [
            ("--language", language.map(str::to_string)),
            ("--device", self.device.clone()),
            ("--temperature", self.temperature.map(|t| t.to_string())),
            ("--beam_size", self.beam_size.map(|n| n.to_string())),
            ("--best_of", self.best_of.map(|n| n.to_string())),
            ("--initial_prompt", self.initial_prompt.clone()),
        ];
        for (flag, value) in optional {
            if let Some(value) = value {
                args.push(flag.to_string());
                args.push(value);
            }
        }

        args
    }

    /// Where whisper writes the JSON result for `media_path`
    fn output_file(media_path: &Path, output_dir: &Path) -> PathBuf {
        let mut name = media_path.file_stem().unwrap_or_default().to_os_string();
        name.push(".json");
        output_dir.join(name)
    }
}

#[async_trait]
impl Recognizer for WhisperCli {
    async fn transcribe(&self, media_path: &Path, language: Option<&str>) -> Result<Transcription, CollaboratorError> {
        let failure = |message: String| CollaboratorError::Recognition {
            path: media_path.to_path_buf(),
            message,
        };

        if !media_path.is_file() {
            return Err(failure("media file does not exist".to_string()));
        }

        let output_dir = TempDir::new().map_err(|e| failure(format!("cannot create temp dir: {}", e)))?;
        let args = self.build_args(media_path, output_dir.path(), language);
        debug!("Running {} {}", self.binary, args.join(" "));
        info!("Transcribing {:?} with model {}", media_path, self.model);

        let whisper_future = Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .output();

        let output = tokio::select! {
            result = whisper_future => {
                result.map_err(|e| failure(format!("failed to run {}: {}", self.binary, e)))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(CollaboratorError::Timeout {
                    operation: "Recognition".to_string(),
                    path: media_path.to_path_buf(),
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("unknown error");
            error!("whisper failed for {:?}: {}", media_path, last_line);
            return Err(failure(format!("whisper exited with {}: {}", output.status, last_line)));
        }

        let json_path = Self::output_file(media_path, output_dir.path());
        let content = tokio::fs::read_to_string(&json_path)
            .await
            .map_err(|e| failure(format!("missing whisper output {:?}: {}", json_path, e)))?;

        let transcription = Transcription::from_json(&content)
            .map_err(|e| failure(format!("invalid whisper output: {}", e)))?;

        if transcription.segments.is_empty() {
            return Err(failure("no segments found".to_string()));
        }

        Ok(transcription)
    }
}
