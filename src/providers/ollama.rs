use async_trait::async_trait;
use log::{debug, error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::errors::CollaboratorError;
use crate::language_utils::get_language_name;
use crate::providers::Translator;
use crate::transcript::{interpolate_words, Transcription, TranslatedText};

// @module: Segment translation through a local Ollama server

/// Reasoning blocks some models emit before the answer
static THINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<think>.*?</think>").unwrap()
});

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    stream: bool,
}

/// Sampling options
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Non-streamed generate response
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub model: String,
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: false,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions { temperature: Some(temperature) });
        self
    }
}

/// Translator posting one `/api/generate` request per segment
#[derive(Debug, Clone)]
pub struct OllamaTranslator {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model used for translation
    model: String,
    client: Client,
    /// Retries after the first attempt
    max_retries: u32,
    /// Base backoff time in milliseconds, doubled on every retry
    backoff_base_ms: u64,
    temperature: f32,
}

impl OllamaTranslator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            max_retries: 3,
            backoff_base_ms: 1000,
            temperature: 0.3,
        }
    }

    /// Builds the translator from the `translation` config section
    pub fn from_config(config: &TranslationConfig) -> Self {
        let mut translator = Self::new(&config.endpoint, &config.model, Duration::from_secs(config.timeout_secs));
        translator.max_retries = config.retry_count;
        translator.backoff_base_ms = config.retry_backoff_ms;
        translator.temperature = config.temperature;
        translator
    }

    /// System prompt for one language pair
    pub fn system_prompt(source: &str, target: &str) -> String {
        let name = |code: &str| get_language_name(code).unwrap_or_else(|_| code.to_string());
        format!(
            "You translate subtitles from {} to {}. Reply with the translation of the user's line only, \
             without quotes, notes or explanations.",
            name(source),
            name(target)
        )
    }

    /// Strips reasoning blocks, whitespace and wrapping quotes from a model answer
    pub fn clean_response(raw: &str) -> String {
        let without_thinking = THINK_REGEX.replace_all(raw, "");
        let trimmed = without_thinking.trim();

        let unquoted = ['"', '\u{201C}', '\'']
            .iter()
            .find_map(|q| {
                let closing = if *q == '\u{201C}' { '\u{201D}' } else { *q };
                trimmed
                    .strip_prefix(*q)
                    .and_then(|s| s.strip_suffix(closing))
            })
            .unwrap_or(trimmed);

        unquoted.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Generate text with retry and exponential backoff
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, String> {
        let url = format!("{}/api/generate", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff_ms = self.backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(16));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }

            match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let response_text = response
                            .text()
                            .await
                            .map_err(|e| format!("Failed to get response text from Ollama API: {}", e))?;
                        return serde_json::from_str::<GenerationResponse>(&response_text)
                            .map_err(|e| format!("Failed to parse Ollama API response: {}", e));
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());
                    if status.is_server_error() {
                        warn!("Ollama API error ({}): {} - attempt {}/{}", status, error_text, attempt + 1, self.max_retries + 1);
                        last_error = Some(format!("Ollama API error ({}): {}", status, error_text));
                    } else {
                        error!("Ollama API error ({}): {}", status, error_text);
                        return Err(format!("Ollama API error ({}): {}", status, error_text));
                    }
                }
                Err(e) => {
                    warn!("Ollama API network error: {} - attempt {}/{}", e, attempt + 1, self.max_retries + 1);
                    last_error = Some(format!("Failed to send request to Ollama API: {}", e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| format!("Ollama API request failed after {} attempts", self.max_retries + 1)))
    }
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(
        &self,
        media_path: &Path,
        transcription: &Transcription,
        source: &str,
        target: &str,
    ) -> Result<Transcription, CollaboratorError> {
        let system = Self::system_prompt(source, target);
        let mut translated = transcription.clone();
        let total = translated.segments.len();

        for (index, segment) in translated.segments.iter_mut().enumerate() {
            let text = segment.text.trim();
            if text.is_empty() {
                continue;
            }

            let request = GenerationRequest::new(&self.model, text)
                .system(&system)
                .temperature(self.temperature);
            let response = self.generate(&request).await.map_err(|message| CollaboratorError::Translation {
                path: media_path.to_path_buf(),
                message,
            })?;

            let translated_text = Self::clean_response(&response.response);
            debug!("{}/{}: {} => {}", index + 1, total, text, translated_text);

            let words = interpolate_words(&translated_text, segment.start, segment.end_or_default());
            segment.translation = Some(TranslatedText {
                text: translated_text,
                words,
            });
        }

        Ok(translated)
    }
}
