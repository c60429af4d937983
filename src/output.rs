/*!
 * Output path resolution and artifact writing.
 *
 * Artifacts are written next to their media file:
 * `<media path without extension>[.<language>].<format extension>`.
 * The collision policy decides what happens when that path is taken, and
 * `OutputLocks` makes the existence check and the reservation of a path one
 * critical section, so two in-flight writes never pick the same file.
 */

use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::OutputError;
use crate::formats::OutputFormat;
use crate::transcript::TextSource;

/// What to do when the target path already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExistsPolicy {
    /// Leave the existing file alone
    #[default]
    Skip,
    /// Replace the existing file
    Overwrite,
    /// Write to `<name>_N.<ext>` with the first free N
    Rename,
}

impl fmt::Display for ExistsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Overwrite => write!(f, "overwrite"),
            Self::Rename => write!(f, "rename"),
        }
    }
}

/// How far a skipped artifact reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkipScope {
    /// Only the colliding artifact is skipped
    Artifact,
    /// The remaining artifacts of the media item are skipped too
    #[default]
    Item,
}

/// Language codes available for naming an artifact
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageTags {
    /// Configured source language
    pub source: Option<String>,
    /// Language reported by the recognizer
    pub detected: Option<String>,
    /// Configured target language
    pub target: Option<String>,
}

impl LanguageTags {
    /// Code used in the file name for the given text source
    pub fn code_for(&self, text_source: TextSource) -> Option<&str> {
        let code = match text_source {
            TextSource::Translation => self.target.as_deref(),
            TextSource::Transcription => self.source.as_deref().or(self.detected.as_deref()),
        };
        code.map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Resolved destination of one artifact
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    pub path: PathBuf,
    /// False when the skip policy found the path taken
    pub should_write: bool,
}

/// Paths reserved by in-flight writes
#[derive(Debug, Default)]
pub struct OutputLocks {
    reserved: Mutex<HashSet<PathBuf>>,
}

impl OutputLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reserved(&self, path: &Path) -> bool {
        self.reserved.lock().contains(path)
    }

    /// Frees a reservation taken by `resolve_output_path`
    pub fn release(&self, path: &Path) {
        self.reserved.lock().remove(path);
    }
}

/// Media path with its extension replaced by `[.<code>].<extension>`
pub fn artifact_path(media_path: &Path, language_code: Option<&str>, format: OutputFormat) -> PathBuf {
    let mut name: OsString = media_path.with_extension("").into_os_string();
    if let Some(code) = language_code {
        name.push(".");
        name.push(code);
    }
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// `<stem>_<n>.<ext>` next to `path`
fn numbered_path(path: &Path, n: usize) -> PathBuf {
    let mut name: OsString = path.with_extension("").into_os_string();
    name.push(format!("_{}", n));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    PathBuf::from(name)
}

/// Computes where an artifact goes and whether it should be written.
///
/// When the result is writable, its path stays reserved in `locks` until
/// `write_artifact` finishes with it.
#[allow(clippy::too_many_arguments)]
pub fn resolve_output_path(
    media_path: &Path,
    tags: &LanguageTags,
    text_source: TextSource,
    format: OutputFormat,
    suffix_enabled: bool,
    policy: ExistsPolicy,
    locks: &OutputLocks,
) -> OutputTarget {
    let code = if suffix_enabled { tags.code_for(text_source) } else { None };
    let base = artifact_path(media_path, code, format);

    let mut reserved = locks.reserved.lock();
    let taken = |path: &Path| path.exists() || reserved.contains(path);

    let target = match policy {
        ExistsPolicy::Skip => {
            if taken(&base) {
                warn!("Skipping existing file: {:?}", base);
                OutputTarget { path: base, should_write: false }
            } else {
                OutputTarget { path: base, should_write: true }
            }
        }
        ExistsPolicy::Overwrite => {
            if taken(&base) {
                info!("Overwriting existing file: {:?}", base);
            }
            OutputTarget { path: base, should_write: true }
        }
        ExistsPolicy::Rename => {
            let mut path = base.clone();
            let mut n = 0;
            while taken(&path) {
                n += 1;
                path = numbered_path(&base, n);
            }
            if n > 0 {
                info!("Avoiding collision, writing to: {:?}", path);
            }
            OutputTarget { path, should_write: true }
        }
    };

    if target.should_write {
        reserved.insert(target.path.clone());
    }

    target
}

/// Writes the buffered artifact atomically and releases the path reservation.
///
/// Content goes to a temporary file in the target directory which is then persisted
/// over the target, so a failed write leaves no partial artifact behind.
pub fn write_artifact(target: &OutputTarget, content: &str, locks: &OutputLocks) -> Result<(), OutputError> {
    let result = persist(&target.path, content);
    locks.release(&target.path);

    if result.is_ok() {
        debug!("Artifact written: {:?}", target.path);
    }
    result
}

fn persist(path: &Path, content: &str) -> Result<(), OutputError> {
    let write_error = |source: std::io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(write_error)?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(write_error)?;
    temp.write_all(content.as_bytes()).map_err(write_error)?;
    temp.flush().map_err(write_error)?;
    temp.persist(path).map_err(|e| write_error(e.error))?;

    Ok(())
}
