/*!
 * Mock recognizer and translator for testing
 *
 * The mocks never spawn processes or open connections. They record how often
 * they were called so tests can check which items reached them.
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use captionsmith::errors::CollaboratorError;
use captionsmith::providers::{Recognizer, Translator};
use captionsmith::transcript::{interpolate_words, TranslatedText, Transcription};

/// Returns a fixed transcription, failing for files whose name contains `fail_marker`
#[derive(Debug)]
pub struct MockRecognizer {
    transcription: Transcription,
    fail_marker: Option<String>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockRecognizer {
    /// Create a recognizer answering every file with `transcription`
    pub fn new(transcription: Transcription) -> Self {
        Self {
            transcription,
            fail_marker: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail for files whose name contains `marker`
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Paths passed to `transcribe`, in call order
    pub fn calls(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Recognizer for MockRecognizer {
    async fn transcribe(&self, media_path: &Path, _language: Option<&str>) -> Result<Transcription, CollaboratorError> {
        self.calls.lock().unwrap().push(media_path.to_path_buf());

        let should_fail = self.fail_marker.as_deref().is_some_and(|marker| {
            media_path.file_name().is_some_and(|name| name.to_string_lossy().contains(marker))
        });
        if should_fail {
            return Err(CollaboratorError::Recognition {
                path: media_path.to_path_buf(),
                message: "mock recognition failure".to_string(),
            });
        }

        Ok(self.transcription.clone())
    }
}

/// Prefixes every segment with the target code in brackets
#[derive(Debug, Default)]
pub struct MockTranslator {
    calls: Arc<Mutex<usize>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `translate` calls so far
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        _media_path: &Path,
        transcription: &Transcription,
        _source: &str,
        target: &str,
    ) -> Result<Transcription, CollaboratorError> {
        *self.calls.lock().unwrap() += 1;

        let mut translated = transcription.clone();
        for segment in &mut translated.segments {
            let text = format!("[{}] {}", target, segment.text.trim());
            let words = interpolate_words(&text, segment.start, segment.end_or_default());
            segment.translation = Some(TranslatedText { text, words });
        }
        Ok(translated)
    }
}
