//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rating = &self.rating;
        let values = [
            rating.min_confidence,
            rating.min_sharpness,
            rating.min_nima,
            rating.max_brisque,
            rating.sharpness_threshold,
            rating.nima_threshold,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::ValidationError(
                "rating values must be finite numbers".into(),
            ));
        }
        if !(0.0..=1.0).contains(&rating.min_confidence) {
            return Err(ConfigError::ValidationError(
                "rating.min_confidence must be between 0.0 and 1.0".into(),
            ));
        }
        if rating.min_sharpness < 0.0 || rating.sharpness_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "rating.min_sharpness and rating.sharpness_threshold must be >= 0".into(),
            ));
        }
        if rating.min_nima < 0.0 || rating.nima_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "rating.min_nima and rating.nima_threshold must be >= 0".into(),
            ));
        }
        if rating.max_brisque <= 0.0 {
            return Err(ConfigError::ValidationError(
                "rating.max_brisque must be > 0".into(),
            ));
        }
        if !(self.picked.top_percentage > 0.0 && self.picked.top_percentage <= 100.0) {
            return Err(ConfigError::ValidationError(
                "picked.top_percentage must be in (0, 100]".into(),
            ));
        }
        if self.conversion.max_workers == 0 {
            return Err(ConfigError::ValidationError(
                "conversion.max_workers must be > 0".into(),
            ));
        }
        if self.detection.program.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "detection.program must not be empty".into(),
            ));
        }
        if self.metadata.enabled && self.metadata.exiftool.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "metadata.exiftool must not be empty when metadata is enabled".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_invalid_min_confidence() {
        let mut config = Config::default();
        config.rating.min_confidence = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_confidence"));

        config.rating.min_confidence = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_confidence"));
    }

    #[test]
    fn test_validate_rejects_non_finite_thresholds() {
        let mut config = Config::default();
        config.rating.sharpness_threshold = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("finite"));

        let mut config = Config::default();
        config.rating.nima_threshold = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_percentage() {
        let mut config = Config::default();
        config.picked.top_percentage = 0.0;
        assert!(config.validate().is_err());

        config.picked.top_percentage = 120.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("top_percentage"));

        config.picked.top_percentage = 100.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = Config::default();
        config.conversion.max_workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_workers"));
    }

    #[test]
    fn test_validate_rejects_empty_detector_program() {
        let mut config = Config::default();
        config.detection.program = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("detection.program"));
    }

    #[test]
    fn test_validate_allows_empty_exiftool_when_disabled() {
        let mut config = Config::default();
        config.metadata.exiftool = String::new();
        assert!(config.validate().is_err());

        config.metadata.enabled = false;
        assert!(config.validate().is_ok());
    }
}
