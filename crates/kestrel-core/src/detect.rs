//! Subject detection and quality scoring.
//!
//! Scoring models live outside Kestrel. The [`Detector`] trait is the
//! boundary; [`SidecarDetector`] runs an external program per preview and
//! reads one JSON object from its stdout:
//!
//! ```text
//! <program> [args...] --confidence 0.5 --norm log [--save-crop] <preview>
//! → {"detected": true, "selected": false, "confidence": 0.87,
//!    "sharpness": 8120.4, "nima": 5.12, "brisque": 23.9}
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DetectionResult, DetectionSettings};

/// Scores one preview image.
pub trait Detector: Send + Sync {
    fn detect(&self, preview: &Path, settings: &DetectionSettings)
        -> PipelineResult<DetectionResult>;
}

/// Detector backed by an external program.
#[derive(Debug, Clone)]
pub struct SidecarDetector {
    program: PathBuf,
    args: Vec<String>,
}

impl SidecarDetector {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Full argument list for one preview.
    fn command_args(&self, preview: &Path, settings: &DetectionSettings) -> Vec<String> {
        let mut args = self.args.clone();
        args.push("--confidence".to_string());
        args.push(settings.min_confidence.to_string());
        args.push("--norm".to_string());
        args.push(settings.normalization.to_string());
        if settings.save_crop {
            args.push("--save-crop".to_string());
        }
        args.push(preview.to_string_lossy().into_owned());
        args
    }
}

impl Detector for SidecarDetector {
    fn detect(
        &self,
        preview: &Path,
        settings: &DetectionSettings,
    ) -> PipelineResult<DetectionResult> {
        let detection_err = |message: String| PipelineError::Detection {
            path: preview.to_path_buf(),
            message,
        };

        let output = Command::new(&self.program)
            .args(self.command_args(preview, settings))
            .output()
            .map_err(|e| detection_err(format!("failed to run {:?}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(detection_err(format!(
                "{:?} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_detection(&output.stdout).map_err(detection_err)
    }
}

/// Parse the detector's stdout. Only the last non-empty line is read, so
/// sidecars may print progress chatter before the result.
fn parse_detection(stdout: &[u8]) -> Result<DetectionResult, String> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .ok_or_else(|| "detector produced no output".to_string())?;

    let result: DetectionResult =
        serde_json::from_str(line).map_err(|e| format!("invalid detector output: {e}"))?;

    if !result.confidence.is_finite() || !result.sharpness.is_finite() {
        return Err("detector returned non-finite scores".to_string());
    }
    Ok(result)
}
