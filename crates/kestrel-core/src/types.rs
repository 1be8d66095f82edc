//! Core data types for the Kestrel culling pipeline.
//!
//! These types carry a photo from discovery through detection and rating.
//! None of them are persisted except through the manifest.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::NormalizationMode;

/// Star tier assigned by the rating engine.
///
/// Serialized as its integer value (-1, 0, 2, 3) so manifests and metadata
/// writers see the same numbers photographers do in their catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Rating {
    /// No subject detected
    Rejected,
    /// Failed a floor check, or passed the floor without any upgrade
    Ordinary,
    /// One upgrade criterion met
    Good,
    /// Both upgrade criteria met
    Excellent,
}

impl Rating {
    /// All tiers, best first.
    pub const ALL: [Rating; 4] = [
        Rating::Excellent,
        Rating::Good,
        Rating::Ordinary,
        Rating::Rejected,
    ];

    /// Integer value of the tier.
    pub fn value(self) -> i8 {
        match self {
            Rating::Rejected => -1,
            Rating::Ordinary => 0,
            Rating::Good => 2,
            Rating::Excellent => 3,
        }
    }

    /// Star count written into metadata; rejected photos get zero stars.
    pub fn stars(self) -> u8 {
        self.value().max(0) as u8
    }

    /// Short label for summaries and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Rating::Rejected => "rejected",
            Rating::Ordinary => "0 stars",
            Rating::Good => "2 stars",
            Rating::Excellent => "3 stars",
        }
    }
}

impl From<Rating> for i8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl TryFrom<i8> for Rating {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Rating::Rejected),
            0 => Ok(Rating::Ordinary),
            2 => Ok(Rating::Good),
            3 => Ok(Rating::Excellent),
            other => Err(format!("invalid rating value: {other}")),
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Pick flag, orthogonal to the star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Pick {
    /// Marked as a reject
    Rejected,
    /// No flag
    None,
    /// Best-of-best; only assigned by the cohort-level selection
    Picked,
}

impl Pick {
    pub fn value(self) -> i8 {
        match self {
            Pick::Rejected => -1,
            Pick::None => 0,
            Pick::Picked => 1,
        }
    }
}

impl From<Pick> for i8 {
    fn from(pick: Pick) -> Self {
        pick.value()
    }
}

impl TryFrom<i8> for Pick {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Pick::Rejected),
            0 => Ok(Pick::None),
            1 => Ok(Pick::Picked),
            other => Err(format!("invalid pick value: {other}")),
        }
    }
}

/// Scores reported by the detector for one preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// A subject was found
    pub detected: bool,

    /// The detector itself flagged this frame as a keeper
    #[serde(default)]
    pub selected: bool,

    /// Detection confidence (0.0 - 1.0)
    pub confidence: f64,

    /// Normalized sharpness of the subject region, higher is better
    pub sharpness: f64,

    /// NIMA aesthetic score, higher is better
    #[serde(default)]
    pub nima: Option<f64>,

    /// BRISQUE distortion score, lower is better
    #[serde(default)]
    pub brisque: Option<f64>,
}

impl DetectionResult {
    /// A result for a frame with no subject.
    pub fn empty() -> Self {
        Self {
            detected: false,
            selected: false,
            confidence: 0.0,
            sharpness: 0.0,
            nima: None,
            brisque: None,
        }
    }
}

/// Per-run settings handed to the detector with every preview.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionSettings {
    /// Confidence floor the detector may use to drop weak boxes
    pub min_confidence: f64,
    /// Save cropped detections beside the preview
    pub save_crop: bool,
    /// Sharpness normalization mode
    pub normalization: NormalizationMode,
}

/// A rated photo, keyed by filename prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct RatedPhoto {
    /// Filename without extension
    pub prefix: String,
    /// Path of the RAW file this rating belongs to, if one exists
    pub raw_path: Option<PathBuf>,
    /// Assigned tier
    pub rating: Rating,
}

/// Severity used by the injected log collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Success,
    Error,
    Warning,
    Info,
}
