/*!
 * Collaborators producing the transcriptions the emitters consume.
 *
 * Both are black boxes behind a trait so the controller can be driven by any
 * implementation (tests use in-memory fakes):
 * - `whisper`: speech recognition through the external whisper CLI
 * - `ollama`: segment translation through a local Ollama server
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::errors::CollaboratorError;
use crate::transcript::Transcription;

pub mod ollama;
pub mod whisper;

pub use ollama::OllamaTranslator;
pub use whisper::WhisperCli;

/// Speech recognizer producing word-timed segments for one media file
#[async_trait]
pub trait Recognizer: Send + Sync + Debug {
    /// Transcribe a media file
    ///
    /// # Arguments
    /// * `media_path` - The media file to transcribe
    /// * `language` - Forced source language, detected when `None`
    async fn transcribe(&self, media_path: &Path, language: Option<&str>) -> Result<Transcription, CollaboratorError>;
}

/// Translator filling in `Segment::translation`
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate every non-empty segment of a transcription
    ///
    /// # Arguments
    /// * `media_path` - Media item the transcription belongs to, for error context
    /// * `transcription` - Finalized recognizer output
    /// * `source` - Source language code
    /// * `target` - Target language code
    ///
    /// # Returns
    /// * A copy of the transcription whose segments carry a translation with
    ///   word timing spread evenly over each segment
    async fn translate(
        &self,
        media_path: &Path,
        transcription: &Transcription,
        source: &str,
        target: &str,
    ) -> Result<Transcription, CollaboratorError>;
}
