//! Single-pass directory scan that indexes RAW files and previews by prefix.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};

/// RAW extensions recognized by the scanner (lowercase, without dot).
pub const RAW_EXTENSIONS: [&str; 11] = [
    "nef", "cr2", "cr3", "arw", "raf", "orf", "rw2", "pef", "dng", "3fr", "iiq",
];

/// Preview extensions recognized by the scanner (lowercase, without dot).
pub const PREVIEW_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Split a file name into `(prefix, extension)`, where the extension keeps
/// its leading dot and original case. Names without an extension, or hidden
/// names, yield `None`.
pub fn split_name(file_name: &str) -> Option<(&str, &str)> {
    if file_name.starts_with('.') {
        return None;
    }
    let dot = file_name.rfind('.')?;
    if dot == 0 {
        return None;
    }
    Some((&file_name[..dot], &file_name[dot..]))
}

/// True if `extension` (with or without dot) is a RAW extension.
pub fn is_raw_extension(extension: &str) -> bool {
    let ext = extension.trim_start_matches('.').to_lowercase();
    RAW_EXTENSIONS.contains(&ext.as_str())
}

/// True if `extension` (with or without dot) is a preview extension.
pub fn is_preview_extension(extension: &str) -> bool {
    let ext = extension.trim_start_matches('.').to_lowercase();
    PREVIEW_EXTENSIONS.contains(&ext.as_str())
}

/// Result of scanning a shoot directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    /// Prefix → RAW extension (e.g. `"DSC_0001"` → `".NEF"`)
    pub raw: BTreeMap<String, String>,
    /// Prefix → preview extension
    pub preview: BTreeMap<String, String>,
    /// Preview file names to send through detection, sorted
    pub review: Vec<String>,
    /// Entries that could not be read, as error messages
    pub skipped: Vec<String>,
}

impl ScanResult {
    /// Absolute path of the RAW file for `prefix`, if one was found.
    pub fn raw_path(&self, dir: &Path, prefix: &str) -> Option<PathBuf> {
        self.raw
            .get(prefix)
            .map(|ext| dir.join(format!("{prefix}{ext}")))
    }
}

/// Scans a single directory level for RAW files and previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileScanner;

impl FileScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan `dir` without recursing into subdirectories.
    ///
    /// Fails only if the directory itself is missing or unreadable.
    pub fn scan(&self, dir: &Path) -> PipelineResult<ScanResult> {
        if !dir.is_dir() {
            return Err(PipelineError::DirectoryNotFound(dir.to_path_buf()));
        }
        // Surface permission problems before anything else happens
        std::fs::read_dir(dir).map_err(|e| PipelineError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut result = ScanResult::default();
        let mut skipped = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    skipped.push(err.to_string());
                    None
                }
            })
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            let Some((prefix, ext)) = split_name(name) else {
                continue;
            };

            if is_raw_extension(ext) {
                result.raw.insert(prefix.to_string(), ext.to_string());
            } else if is_preview_extension(ext) {
                result.preview.insert(prefix.to_string(), ext.to_string());
                result.review.push(name.to_string());
            }
        }

        result.review.sort();
        result.skipped = skipped;
        Ok(result)
    }
}
