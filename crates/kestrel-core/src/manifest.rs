//! The reorganization manifest: a JSON audit record of which RAW file went
//! into which rating folder.
//!
//! Written once at the end of an organize pass to `_kestrel_manifest.json`
//! in the shoot directory, and never modified afterwards.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};
use crate::types::Rating;

/// File name of the manifest at the directory root.
pub const MANIFEST_FILE_NAME: &str = "_kestrel_manifest.json";

/// Manifest schema version.
pub const MANIFEST_VERSION: &str = "1.0";

/// Rating value → destination folder name.
///
/// The 1-star entry is kept so manifests stay readable by tools that expect
/// the full star range, though the current engine never assigns it.
pub const RATING_FOLDERS: [(i8, &str); 3] = [
    (3, "3star_excellent"),
    (2, "2star_good"),
    (1, "1star_average"),
];

/// Destination folder for a rating, if that rating is organized at all.
pub fn folder_for(rating: Rating) -> Option<&'static str> {
    RATING_FOLDERS
        .iter()
        .find(|(value, _)| *value == rating.value())
        .map(|(_, name)| *name)
}

/// One RAW file selected for a rating folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub filename: String,
    pub rating: i8,
    pub folder: String,
}

/// Summary counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestStats {
    pub total_moved: usize,
}

/// The manifest document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub created: DateTime<Local>,
    pub app_version: String,
    pub original_dir: PathBuf,
    pub folder_structure: BTreeMap<i8, String>,
    pub files: Vec<MoveRecord>,
    pub stats: ManifestStats,
}

impl Manifest {
    /// Build a manifest for an organize pass over `dir`.
    pub fn new(dir: &Path, files: Vec<MoveRecord>, total_moved: usize) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            created: Local::now(),
            app_version: format!("kestrel-{}", crate::VERSION),
            original_dir: dir.to_path_buf(),
            folder_structure: RATING_FOLDERS
                .iter()
                .map(|(rating, name)| (*rating, name.to_string()))
                .collect(),
            files,
            stats: ManifestStats { total_moved },
        }
    }

    /// Path of the manifest inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE_NAME)
    }

    /// Write the manifest as pretty-printed UTF-8 JSON, replacing any
    /// previous file. Returns the path written.
    pub fn write_to(&self, dir: &Path) -> PipelineResult<PathBuf> {
        let path = Self::path_in(dir);
        let manifest_err = |message: String| PipelineError::Manifest {
            path: path.clone(),
            message,
        };

        let file = File::create(&path).map_err(|e| manifest_err(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| manifest_err(e.to_string()))?;
        writeln!(writer).map_err(|e| manifest_err(e.to_string()))?;
        writer.flush().map_err(|e| manifest_err(e.to_string()))?;

        Ok(path)
    }

    /// Load the manifest from `dir`.
    pub fn load(dir: &Path) -> PipelineResult<Self> {
        let path = Self::path_in(dir);
        let content = std::fs::read_to_string(&path).map_err(|e| PipelineError::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| PipelineError::Manifest {
            path,
            message: e.to_string(),
        })
    }

    /// Number of file records per rating value.
    pub fn counts_by_rating(&self) -> BTreeMap<i8, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.files {
            *counts.entry(record.rating).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, rating: Rating) -> MoveRecord {
        MoveRecord {
            filename: name.to_string(),
            rating: rating.value(),
            folder: folder_for(rating).unwrap().to_string(),
        }
    }

    #[test]
    fn test_folder_for() {
        assert_eq!(folder_for(Rating::Excellent), Some("3star_excellent"));
        assert_eq!(folder_for(Rating::Good), Some("2star_good"));
        assert_eq!(folder_for(Rating::Ordinary), None);
        assert_eq!(folder_for(Rating::Rejected), None);
    }

    #[test]
    fn test_manifest_write_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::new(
            dir.path(),
            vec![
                record("DSC_0001.NEF", Rating::Excellent),
                record("DSC_0002.NEF", Rating::Good),
                record("DSC_0003.NEF", Rating::Good),
            ],
            3,
        );

        let path = manifest.write_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(MANIFEST_FILE_NAME));

        let loaded = Manifest::load(dir.path()).unwrap();
        assert_eq!(loaded, manifest);

        let counts = loaded.counts_by_rating();
        assert_eq!(counts.get(&3), Some(&1));
        assert_eq!(counts.get(&2), Some(&2));
    }

    #[test]
    fn test_manifest_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::new(dir.path(), vec![record("a.CR3", Rating::Excellent)], 1);
        manifest.write_to(dir.path()).unwrap();

        let raw = std::fs::read_to_string(Manifest::path_in(dir.path())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["folder_structure"]["3"], "3star_excellent");
        assert_eq!(value["files"][0]["filename"], "a.CR3");
        assert_eq!(value["files"][0]["rating"], 3);
        assert_eq!(value["stats"]["total_moved"], 1);
        assert!(value["created"].as_str().unwrap().contains('T'));
        assert!(value["app_version"].as_str().unwrap().starts_with("kestrel-"));
    }

    #[test]
    fn test_load_missing_manifest_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Manifest { .. }));
    }
}
