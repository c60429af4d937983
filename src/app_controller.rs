use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::{AppError, CollaboratorError};
use crate::file_utils::FileManager;
use crate::formats::synthesize;
use crate::language_utils::{language_codes_match, normalize_language_code};
use crate::output::{resolve_output_path, write_artifact, LanguageTags, OutputLocks, SkipScope};
use crate::providers::{OllamaTranslator, Recognizer, Translator, WhisperCli};
use crate::transcript::{TextSource, Transcription};

// @module: Batch driver turning media files into caption artifacts

/// Result of processing one media item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// At least one artifact was written
    Written(Vec<PathBuf>),
    /// Every artifact collided with an existing file under the skip policy
    Skipped(PathBuf),
    /// Recognition, translation, synthesis or writing failed
    Failed(String),
}

/// Counts for a batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Set when the run stopped early on a cancellation request
    pub cancelled: bool,
}

impl BatchSummary {
    fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Written(_) => self.written += 1,
            ItemOutcome::Skipped(_) => self.skipped += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.written + self.skipped + self.failed
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Speech recognizer
    recognizer: Arc<dyn Recognizer>,
    // @field: Translator, present when a target language is configured
    translator: Option<Arc<dyn Translator>>,
    // @field: Paths reserved by in-flight writes
    locks: OutputLocks,
    // @field: Set to stop the batch before the next item
    cancel: Arc<AtomicBool>,
}

impl Controller {
    // @method: Create a controller with the whisper and Ollama collaborators
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let recognizer: Arc<dyn Recognizer> = Arc::new(WhisperCli::from_config(&config.recognition));
        let translator: Option<Arc<dyn Translator>> = if config.wants_translation() {
            Some(Arc::new(OllamaTranslator::from_config(&config.translation)))
        } else {
            None
        };

        Ok(Self::with_collaborators(config, recognizer, translator))
    }

    // @method: Create a controller around the given collaborators
    pub fn with_collaborators(
        config: Config,
        recognizer: Arc<dyn Recognizer>,
        translator: Option<Arc<dyn Translator>>,
    ) -> Self {
        Self {
            config,
            recognizer,
            translator,
            locks: OutputLocks::new(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flag checked between items; setting it stops the batch cooperatively
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Process a single media file
    pub async fn run(&self, media_path: &Path) -> Result<ItemOutcome> {
        if !FileManager::file_exists(media_path) {
            return Err(anyhow!("Input file does not exist: {:?}", media_path));
        }
        Ok(self.process_item(media_path).await)
    }

    /// Process every media file under `input_path`, one at a time.
    ///
    /// Failures stay local to their item; the batch goes on with the next one.
    pub async fn run_folder(&self, input_path: &Path, source_type: Option<&str>) -> Result<BatchSummary> {
        let start_time = Instant::now();
        let media_files = FileManager::find_media_files(input_path, &self.config.recognition.media_extensions, source_type)?;

        if media_files.is_empty() {
            return Err(anyhow!("No media files found in: {:?}", input_path));
        }
        info!("Found {} media file(s) to process", media_files.len());

        let folder_pb = ProgressBar::new(media_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = BatchSummary::default();

        for media_file in &media_files {
            if self.is_cancelled() {
                warn!("Cancellation requested, stopping before {:?}", media_file);
                summary.cancelled = true;
                break;
            }

            let file_name = media_file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let outcome = self.process_item(media_file).await;
            summary.record(&outcome);
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {} written, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.written,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    /// Recognize, optionally translate, synthesize and write one media item
    pub async fn process_item(&self, media_path: &Path) -> ItemOutcome {
        match self.try_process_item(media_path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error processing {:?}: {}", media_path, e);
                ItemOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_process_item(&self, media_path: &Path) -> Result<ItemOutcome, AppError> {
        let source_language = self.config.source_language.as_deref().map(Self::normalized);
        let transcription = self.recognizer.transcribe(media_path, source_language.as_deref()).await?;
        info!("Transcription completed for {:?}", media_path);

        let tags = LanguageTags {
            source: source_language,
            detected: transcription.language.as_deref().map(Self::normalized),
            target: self.config.target_language.as_deref().map(Self::normalized),
        };
        if let Some(detected) = &tags.detected {
            debug!("Detected language: {}", detected);
        }

        let transcription = self.translate_if_needed(media_path, transcription, &tags).await?;
        let sources = self.artifact_sources(&transcription);

        self.emit_artifacts(media_path, &transcription, &tags, &sources)
    }

    /// Synthesize artifacts from an existing whisper-style JSON transcript
    pub fn render_transcript(&self, transcript_path: &Path) -> ItemOutcome {
        let result = FileManager::read_to_string(transcript_path)
            .map_err(AppError::from)
            .and_then(|content| {
                Transcription::from_json(&content)
                    .map_err(|e| AppError::File(format!("Invalid transcript {:?}: {}", transcript_path, e)))
            })
            .and_then(|transcription| {
                let tags = LanguageTags {
                    source: self.config.source_language.as_deref().map(Self::normalized),
                    detected: transcription.language.as_deref().map(Self::normalized),
                    target: self.config.target_language.as_deref().map(Self::normalized),
                };

                let sources = self.artifact_sources(&transcription);
                self.emit_artifacts(transcript_path, &transcription, &tags, &sources)
            });

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error rendering {:?}: {}", transcript_path, e);
                ItemOutcome::Failed(e.to_string())
            }
        }
    }

    fn normalized(code: &str) -> String {
        normalize_language_code(code).unwrap_or_else(|_| code.trim().to_lowercase())
    }

    async fn translate_if_needed(
        &self,
        media_path: &Path,
        transcription: Transcription,
        tags: &LanguageTags,
    ) -> Result<Transcription, AppError> {
        let Some(target) = tags.target.as_deref() else {
            return Ok(transcription);
        };

        let Some(source) = tags.source.as_deref().or(tags.detected.as_deref()) else {
            return Err(CollaboratorError::Translation {
                path: media_path.to_path_buf(),
                message: "source language is neither configured nor detected".to_string(),
            }
            .into());
        };

        if language_codes_match(source, target) {
            info!("Source and target language are both {}, skipping translation", target);
            return Ok(transcription);
        }

        let translator = self.translator.as_ref().ok_or_else(|| CollaboratorError::Translation {
            path: media_path.to_path_buf(),
            message: "no translator configured".to_string(),
        })?;

        info!("Translating {:?} from {} to {}", media_path, source, target);
        let translated = translator.translate(media_path, &transcription, source, target).await?;
        info!("Translation completed for {:?}", media_path);
        Ok(translated)
    }

    /// Text sources to write, translation first
    fn artifact_sources(&self, transcription: &Transcription) -> Vec<TextSource> {
        let has_translation = transcription.segments.iter().any(|s| s.translation.is_some());
        match (has_translation, self.config.output.export_all) {
            (true, true) => vec![TextSource::Translation, TextSource::Transcription],
            (true, false) => vec![TextSource::Translation],
            (false, _) => vec![TextSource::Transcription],
        }
    }

    fn emit_artifacts(
        &self,
        naming_path: &Path,
        transcription: &Transcription,
        tags: &LanguageTags,
        sources: &[TextSource],
    ) -> Result<ItemOutcome, AppError> {
        let output = &self.config.output;
        let mut written: Vec<PathBuf> = Vec::new();
        let mut skipped = None;

        for source in sources {
            let content = synthesize(&transcription.segments, output.format, *source, &self.config.layout)?;

            let target = resolve_output_path(
                naming_path,
                tags,
                *source,
                output.format,
                output.language_suffix,
                output.exists,
                &self.locks,
            );

            if target.should_write && target.path == naming_path {
                self.locks.release(&target.path);
                return Err(AppError::File(format!("Refusing to overwrite the input file {:?}", naming_path)));
            }

            if !target.should_write {
                skipped.get_or_insert(target.path);
                if output.skip_scope == SkipScope::Item {
                    break;
                }
                continue;
            }

            if let Err(e) = write_artifact(&target, &content, &self.locks) {
                if written.is_empty() {
                    return Err(e.into());
                }
                let kept: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
                return Err(AppError::File(format!("{} (already written: {})", e, kept.join(", "))));
            }
            info!("File written: {:?}", target.path);
            written.push(target.path);
        }

        Ok(match (written.is_empty(), skipped) {
            (false, _) => ItemOutcome::Written(written),
            (true, Some(path)) => ItemOutcome::Skipped(path),
            (true, None) => ItemOutcome::Failed("no artifact produced".to_string()),
        })
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
