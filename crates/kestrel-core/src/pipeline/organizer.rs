//! Move rated RAW files into per-rating folders and record the manifest.
//!
//! Moving is idempotent: a file already present at the destination is left
//! where it is, which is what a second run over an organized shoot looks
//! like. Moves and the manifest are not transactional; a manifest that fails
//! to write does not undo the moves.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::manifest::{folder_for, Manifest, MoveRecord};
use crate::types::RatedPhoto;

use super::report::Reporter;

/// What an organize pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizeReport {
    /// Every file selected for a rating folder, moved or not
    pub records: Vec<MoveRecord>,
    pub moved: usize,
    /// Destination already held a file with the same name
    pub skipped: usize,
    pub failed: usize,
    /// Where the manifest was written, if it was
    pub manifest: Option<PathBuf>,
}

/// Organizes one shoot directory.
#[derive(Debug, Clone)]
pub struct FileOrganizer {
    dir: PathBuf,
}

impl FileOrganizer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Move every rated photo whose RAW is still in the directory root and
    /// whose rating has a folder.
    pub fn organize(&self, photos: &[RatedPhoto], reporter: &Reporter) -> OrganizeReport {
        let mut report = OrganizeReport::default();

        let candidates: Vec<(PathBuf, MoveRecord)> = photos
            .iter()
            .filter_map(|photo| {
                let folder = folder_for(photo.rating)?;
                let raw_path = photo.raw_path.as_ref()?;
                if raw_path.parent() != Some(self.dir.as_path()) || !raw_path.is_file() {
                    return None;
                }
                let filename = raw_path.file_name()?.to_string_lossy().into_owned();
                Some((
                    raw_path.clone(),
                    MoveRecord {
                        filename,
                        rating: photo.rating.value(),
                        folder: folder.to_string(),
                    },
                ))
            })
            .collect();

        if candidates.is_empty() {
            reporter.info("No rated RAW files to organize");
            return report;
        }

        reporter.info(&format!(
            "Moving {} photo(s) into rating folders...",
            candidates.len()
        ));

        let folders: BTreeSet<&str> = candidates.iter().map(|(_, r)| r.folder.as_str()).collect();
        for folder in folders {
            let path = self.dir.join(folder);
            if path.is_dir() {
                continue;
            }
            match std::fs::create_dir_all(&path) {
                Ok(()) => reporter.info(&format!("Created folder: {folder}/")),
                Err(e) => reporter.warning(&format!("Failed to create {folder}/: {e}")),
            }
        }

        for (src, record) in &candidates {
            let dst = self.dir.join(&record.folder).join(&record.filename);
            if dst.exists() {
                tracing::debug!("{} already in {}/, leaving source", record.filename, record.folder);
                report.skipped += 1;
                continue;
            }
            match move_file(src, &dst) {
                Ok(()) => report.moved += 1,
                Err(e) => {
                    report.failed += 1;
                    let err = PipelineError::Move {
                        path: src.clone(),
                        message: e.to_string(),
                    };
                    reporter.warning(&err.to_string());
                }
            }
        }

        report.records = candidates.into_iter().map(|(_, r)| r).collect();

        let manifest = Manifest::new(&self.dir, report.records.clone(), report.moved);
        match manifest.write_to(&self.dir) {
            Ok(path) => {
                reporter.success(&format!("Moved {} photo(s)", report.moved));
                reporter.info(&format!(
                    "Manifest: {}",
                    path.file_name().unwrap_or_default().to_string_lossy()
                ));
                report.manifest = Some(path);
            }
            Err(e) => reporter.warning(&format!("Failed to save manifest: {e}")),
        }

        report
    }
}

/// Rename, falling back to copy + remove across filesystems.
fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    match std::fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if !src.is_file() {
                return Err(rename_err);
            }
            std::fs::copy(src, dst)?;
            if let Err(e) = std::fs::remove_file(src) {
                let _ = std::fs::remove_file(dst);
                return Err(e);
            }
            Ok(())
        }
    }
}
