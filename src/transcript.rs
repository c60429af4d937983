use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SynthesisError;

// @module: Transcription data model shared by every emitter

/// Default display duration when a segment carries no end time
pub const DEFAULT_SEGMENT_DURATION: f64 = 1.0;

/// A single recognized token with optional timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    // @field: Token text, whisper emits it under "word" with a leading space
    #[serde(rename = "word", alias = "text")]
    pub text: String,

    // @field: Start offset in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,

    // @field: End offset in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

impl Word {
    /// Creates a timed word
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Creates a word without timing information
    pub fn untimed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: None,
            end: None,
        }
    }

    /// Both bounds, when the word is timed
    pub fn timing(&self) -> Option<(f64, f64)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.timing().is_some()
    }

    /// Trimmed text; empty tokens are ignored by every consumer
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Translated rendition of a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TranslatedText {
    pub text: String,

    /// Evenly interpolated over the parent segment, true alignment is unknown
    #[serde(default)]
    pub words: Vec<Word>,
}

/// A contiguous timed unit of recognized speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub start: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub words: Vec<Word>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslatedText>,
}

/// Which text of a segment an emitter renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    #[default]
    Transcription,
    Translation,
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transcription => write!(f, "transcription"),
            Self::Translation => write!(f, "translation"),
        }
    }
}

/// Borrowed text and words of one segment for one text source
#[derive(Debug, Clone, Copy)]
pub struct SegmentView<'a> {
    pub start: f64,
    pub end: f64,
    pub text: &'a str,
    pub words: &'a [Word],
}

impl SegmentView<'_> {
    /// True when at least one word carries both bounds
    pub fn has_word_timing(&self) -> bool {
        self.words.iter().any(|w| w.is_timed() && !w.trimmed().is_empty())
    }
}

impl Segment {
    /// Creates a segment without word timing
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end: Some(end),
            text: text.into(),
            words: Vec::new(),
            translation: None,
        }
    }

    /// Attaches word timing
    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = words;
        self
    }

    /// End time, or start plus the default duration when the recognizer gave none
    pub fn end_or_default(&self) -> f64 {
        self.end.unwrap_or(self.start + DEFAULT_SEGMENT_DURATION)
    }

    /// Selects the text to render.
    ///
    /// Fails with `InputInvalid` when the requested text is absent or blank; callers
    /// skip the segment in that case.
    pub fn view(&self, index: usize, source: TextSource) -> Result<SegmentView<'_>, SynthesisError> {
        let (text, words) = match source {
            TextSource::Transcription => (self.text.as_str(), self.words.as_slice()),
            TextSource::Translation => match &self.translation {
                Some(translated) => (translated.text.as_str(), translated.words.as_slice()),
                None => ("", &[][..]),
            },
        };

        if text.trim().is_empty() {
            return Err(SynthesisError::InputInvalid { index, text_source: source });
        }

        Ok(SegmentView {
            start: sanitize_seconds(self.start),
            end: sanitize_seconds(self.end_or_default()),
            text,
            words,
        })
    }
}

/// Finalized recognizer output for one media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Transcription {
    /// Detected or forced language code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Transcription {
    /// Parses whisper-style JSON (`{"language": .., "segments": [..]}`)
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Whether every non-empty segment carries a translation
    pub fn is_translated(&self) -> bool {
        self.segments
            .iter()
            .filter(|s| !s.text.trim().is_empty())
            .all(|s| s.translation.is_some())
    }
}

/// Spreads the translated words evenly across the segment's duration.
///
/// Real per-word alignment is unavailable for translated text, so each word gets an
/// equal slice of `[start, end)`.
pub fn interpolate_words(text: &str, start: f64, end: f64) -> Vec<Word> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let total = (end - start).max(0.0);
    let slice = total / tokens.len() as f64;

    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let word_start = start + i as f64 * slice;
            Word::new(*token, word_start, word_start + slice)
        })
        .collect()
}

/// Clamps negative and non-finite offsets to zero so emission stays total
pub fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}
