//! Writing ratings and pick flags into RAW file metadata.
//!
//! Each item is written independently; a failure on one file never rolls back
//! or blocks the others.

use std::path::PathBuf;
use std::process::Command;

use crate::error::PipelineError;
use crate::types::{Pick, Rating};

/// Metadata to set on one file.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataUpdate {
    pub file: PathBuf,
    pub rating: Rating,
    pub pick: Pick,
    pub sharpness: Option<f64>,
    pub nima: Option<f64>,
    pub brisque: Option<f64>,
}

impl MetadataUpdate {
    /// Rating and pick only, no score annotations.
    pub fn flag(file: impl Into<PathBuf>, rating: Rating, pick: Pick) -> Self {
        Self {
            file: file.into(),
            rating,
            pick,
            sharpness: None,
            nima: None,
            brisque: None,
        }
    }

    /// Human-readable score annotation, if any score is present.
    pub fn description(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(s) = self.sharpness {
            parts.push(format!("Sharpness {s:.1}"));
        }
        if let Some(n) = self.nima {
            parts.push(format!("NIMA {n:.2}"));
        }
        if let Some(b) = self.brisque {
            parts.push(format!("BRISQUE {b:.2}"));
        }
        (!parts.is_empty()).then(|| parts.join(" | "))
    }
}

/// Per-batch outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Sets rating metadata on files.
pub trait MetadataWriter: Send + Sync {
    fn batch_set(&self, updates: &[MetadataUpdate]) -> WriteSummary;
}

/// Writes metadata by invoking `exiftool` once per file.
#[derive(Debug, Clone)]
pub struct ExifToolWriter {
    exiftool: PathBuf,
}

impl ExifToolWriter {
    pub fn new(exiftool: impl Into<PathBuf>) -> Self {
        Self {
            exiftool: exiftool.into(),
        }
    }

    fn command_args(update: &MetadataUpdate) -> Vec<String> {
        let mut args = vec![
            "-overwrite_original".to_string(),
            "-q".to_string(),
            format!("-Rating={}", update.rating.stars()),
            format!("-XMP:Pick={}", update.pick.value()),
        ];
        if let Some(description) = update.description() {
            args.push(format!("-XMP-dc:Description={description}"));
        }
        args.push(update.file.to_string_lossy().into_owned());
        args
    }

    fn write_one(&self, update: &MetadataUpdate) -> Result<(), PipelineError> {
        let metadata_err = |message: String| PipelineError::Metadata {
            path: update.file.clone(),
            message,
        };

        let output = Command::new(&self.exiftool)
            .args(Self::command_args(update))
            .output()
            .map_err(|e| metadata_err(format!("failed to run {:?}: {e}", self.exiftool)))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(metadata_err(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

impl MetadataWriter for ExifToolWriter {
    fn batch_set(&self, updates: &[MetadataUpdate]) -> WriteSummary {
        let mut summary = WriteSummary::default();
        for update in updates {
            match self.write_one(update) {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    tracing::warn!("{e}");
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}

/// Writer used when metadata writing is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetadataWriter;

impl MetadataWriter for NoopMetadataWriter {
    fn batch_set(&self, updates: &[MetadataUpdate]) -> WriteSummary {
        WriteSummary {
            succeeded: updates.len(),
            failed: 0,
        }
    }
}
