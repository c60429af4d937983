/*!
 * Error types for the captionsmith application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

use crate::formats::OutputFormat;
use crate::transcript::TextSource;

/// Errors raised while turning segments into an artifact
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthesisError {
    /// A segment has no usable text for the requested text source.
    /// Emitters skip such segments instead of failing the whole artifact.
    #[error("Segment {index} has no {text_source} text")]
    InputInvalid {
        /// Position of the segment in the input sequence
        index: usize,
        /// Text source that was requested
        text_source: TextSource,
    },

    /// Nothing left to emit after filtering
    #[error("No usable segments to render as {format}")]
    NoSegments {
        /// Format that was requested
        format: OutputFormat,
    },

    /// Structured records could not be serialized
    #[error("Failed to encode {format} output: {message}")]
    Encoding {
        /// Format that was requested
        format: OutputFormat,
        /// Serializer message
        message: String,
    },
}

/// Errors raised by the recognition and translation collaborators
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The speech recognizer failed for a media item
    #[error("Recognition failed for {path:?}: {message}")]
    Recognition {
        /// Media item being recognized
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// The translator failed for a media item
    #[error("Translation failed for {path:?}: {message}")]
    Translation {
        /// Media item being translated
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// The collaborator did not answer in time
    #[error("{operation} timed out after {seconds}s for {path:?}")]
    Timeout {
        /// Which call timed out
        operation: String,
        /// Media item being processed
        path: PathBuf,
        /// Configured timeout
        seconds: u64,
    },
}

/// Errors that can occur when parsing textual timestamps
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimecodeError {
    /// The timestamp does not match the expected layout
    #[error("Invalid {style} timestamp: {value}")]
    Malformed {
        /// Which timestamp style was expected
        style: &'static str,
        /// The offending text
        value: String,
    },
}

/// Errors that can occur while writing artifacts
#[derive(Error, Debug)]
pub enum OutputError {
    /// The target directory could not be prepared or the file not written
    #[error("Failed to write {path:?}: {source}")]
    Write {
        /// Target path
        path: PathBuf,
        /// I/O cause
        #[source]
        source: std::io::Error,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from synthesis
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Error from a collaborator
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Error from writing output
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
