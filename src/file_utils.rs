use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: Media discovery and file reading

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @checks: Extension against an allow list, case-insensitive
    pub fn has_extension<P: AsRef<Path>>(path: P, extensions: &[String]) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| extensions.iter().any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext)))
    }

    /// Media files under `path`, sorted.
    ///
    /// A file path is returned as is when its extension is supported; a directory is
    /// walked recursively. `source_type` narrows the search to a single extension.
    pub fn find_media_files<P: AsRef<Path>>(
        path: P,
        extensions: &[String],
        source_type: Option<&str>,
    ) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        let allowed: Vec<String> = match source_type {
            Some(ext) => vec![ext.trim_start_matches('.').to_lowercase()],
            None => extensions.to_vec(),
        };

        if Self::file_exists(path) {
            if Self::has_extension(path, &allowed) {
                return Ok(vec![path.to_path_buf()]);
            }
            warn!("File is not a supported media file: {:?}", path);
            return Ok(Vec::new());
        }

        if !Self::dir_exists(path) {
            return Err(anyhow!("Input path does not exist: {:?}", path));
        }

        let mut result = Vec::new();
        for entry in WalkDir::new(path).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_file() && Self::has_extension(entry.path(), &allowed) {
                result.push(entry.path().to_path_buf());
            }
        }

        result.sort();
        debug!("Found {} media file(s) under {:?}", result.len(), path);
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }
}
