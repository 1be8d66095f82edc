//! Configuration management for Kestrel.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file only
//! overrides what it names.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Kestrel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rating floor and upgrade thresholds
    pub rating: RatingConfig,

    /// Picked-flag selection
    pub picked: PickedConfig,

    /// RAW conversion pool
    pub conversion: ConversionConfig,

    /// Detector sidecar
    pub detection: DetectionConfig,

    /// Metadata writing
    pub metadata: MetadataConfig,

    /// Optional run phases
    pub run: RunConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.kestrel.kestrel/config.toml
    /// - Linux: ~/.config/kestrel/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\kestrel\config\config.toml
    ///
    /// Falls back to ~/.kestrel/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "kestrel", "kestrel")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".kestrel").join("config.toml")
            })
    }

    /// Resolved detector program (with ~ expansion).
    pub fn detector_program(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.detection.program);
        PathBuf::from(expanded.into_owned())
    }

    /// Resolved exiftool path (with ~ expansion).
    pub fn exiftool_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.metadata.exiftool);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rating.min_confidence, 0.50);
        assert_eq!(config.rating.sharpness_threshold, 7500.0);
        assert_eq!(config.picked.top_percentage, 25.0);
        assert_eq!(config.conversion.max_workers, 4);
        assert!(config.run.organize_files);
        assert!(config.run.cleanup_temp);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[rating]"));
        assert!(toml.contains("[detection]"));
        assert!(toml.contains("normalization = \"log\""));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[rating]\nnima_threshold = 5.2\n\n[detection]\nnormalization = \"sqrt\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.rating.nima_threshold, 5.2);
        assert_eq!(config.rating.min_nima, 4.3);
        assert_eq!(config.detection.normalization, NormalizationMode::Sqrt);
        assert_eq!(config.metadata.exiftool, "exiftool");
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[picked]\ntop_percentage = 0.0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("top_percentage"));
    }

    #[test]
    fn test_worker_count_is_bounded() {
        let config = ConversionConfig { max_workers: 64 };
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert!(config.worker_count() <= cpus);
        assert!(config.worker_count() >= 1);

        let single = ConversionConfig { max_workers: 1 };
        assert_eq!(single.worker_count(), 1);
    }
}
