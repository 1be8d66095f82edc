//! Remove previews that belong to a RAW file.
//!
//! Only previews whose prefix also has a RAW are deleted. A JPEG shot on its
//! own (phone, camera JPEG-only mode) is never touched.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::report::Reporter;
use super::scanner::{is_preview_extension, split_name};

/// Deletes paired or generated previews after a run.
#[derive(Debug, Clone)]
pub struct TempCleaner {
    dir: PathBuf,
}

impl TempCleaner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Delete the reviewed previews that have a RAW counterpart.
    ///
    /// Returns the number of files deleted.
    pub fn clean(
        &self,
        review: &[String],
        raw: &BTreeMap<String, String>,
        reporter: &Reporter,
    ) -> usize {
        let mut deleted = 0;

        for name in review {
            let Some((prefix, ext)) = split_name(name) else {
                continue;
            };
            if !raw.contains_key(prefix) || !is_preview_extension(ext) {
                continue;
            }
            let path = self.dir.join(name);
            if !path.exists() {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => deleted += 1,
                Err(e) => reporter.warning(&format!("Failed to delete {name}: {e}")),
            }
        }

        if deleted > 0 {
            reporter.success(&format!("Deleted {deleted} temporary preview(s)"));
        } else {
            reporter.info("No temporary previews to clean up");
        }
        deleted
    }
}
