//! Sub-configuration structs with the defaults Kestrel ships with.

use serde::{Deserialize, Serialize};

/// Rating thresholds.
///
/// The *floor* fields decide whether a photo can earn stars at all; the
/// *upgrade* fields decide how many.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Minimum detector confidence (0.0 - 1.0)
    pub min_confidence: f64,

    /// Minimum normalized sharpness
    pub min_sharpness: f64,

    /// Minimum NIMA aesthetic score
    pub min_nima: f64,

    /// Maximum BRISQUE distortion score (lower is better)
    pub max_brisque: f64,

    /// Sharpness at or above this counts toward an upgrade
    pub sharpness_threshold: f64,

    /// NIMA at or above this counts toward an upgrade
    pub nima_threshold: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.50,
            min_sharpness: 6500.0,
            min_nima: 4.3,
            max_brisque: 55.0,
            sharpness_threshold: 7500.0,
            nima_threshold: 4.8,
        }
    }
}

/// Picked-flag selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickedConfig {
    /// Percentage of 3-star photos taken from the top of each ranking
    pub top_percentage: f64,
}

impl Default for PickedConfig {
    fn default() -> Self {
        Self {
            top_percentage: 25.0,
        }
    }
}

/// RAW conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Upper bound on concurrent conversions; further capped by CPU count
    pub max_workers: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self { max_workers: 4 }
    }
}

impl ConversionConfig {
    /// Effective pool size: `min(max_workers, available parallelism)`, at least 1.
    pub fn worker_count(&self) -> usize {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.max_workers.min(cpus).max(1)
    }
}

/// Sharpness normalization mode forwarded to the detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMode {
    /// Log compression, fair to both small and large subjects
    #[default]
    Log,
    /// Raw variance divided by subject area
    Linear,
    /// Square-root compression
    Sqrt,
}

impl NormalizationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationMode::Log => "log",
            NormalizationMode::Linear => "linear",
            NormalizationMode::Sqrt => "sqrt",
        }
    }
}

impl std::fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detector sidecar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Program to run for each preview (supports `~`)
    pub program: String,

    /// Arguments placed before the generated ones
    pub args: Vec<String>,

    /// Ask the detector to save cropped detections next to the preview
    pub save_crop: bool,

    /// Sharpness normalization mode
    pub normalization: NormalizationMode,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            program: "kestrel-detect".to_string(),
            args: vec![],
            save_crop: false,
            normalization: NormalizationMode::default(),
        }
    }
}

/// Metadata writing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Write ratings and pick flags into the RAW files
    pub enabled: bool,

    /// Path to the exiftool executable (supports `~`)
    pub exiftool: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exiftool: "exiftool".to_string(),
        }
    }
}

/// Optional run phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Move rated RAW files into per-rating folders
    pub organize_files: bool,

    /// Delete previews that belong to a RAW file after the run
    pub cleanup_temp: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            organize_files: true,
            cleanup_temp: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
