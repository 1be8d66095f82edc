//! Per-photo rating from detector scores.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! ```text
//! no subject            → -1 (pick -1)
//! any floor check fails →  0
//! sharp AND aesthetic   →  3
//! sharp OR aesthetic    →  2
//! otherwise             →  0
//! ```
//!
//! A photo that fails a floor is always 0, even if one upgrade criterion
//! alone would be met. Missing NIMA/BRISQUE scores skip their checks.
//! The engine never assigns the picked flag; see [`crate::picked`].

use crate::config::RatingConfig;
use crate::types::{DetectionResult, Pick, Rating};

/// Result of rating one photo.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingOutcome {
    pub rating: Rating,
    pub pick: Pick,
    /// Human-readable reason, including the values that decided it
    pub reason: String,
}

impl RatingOutcome {
    fn new(rating: Rating, reason: impl Into<String>) -> Self {
        Self {
            rating,
            pick: Pick::None,
            reason: reason.into(),
        }
    }
}

/// Pure, deterministic rating engine.
#[derive(Debug, Clone)]
pub struct RatingEngine {
    thresholds: RatingConfig,
}

impl RatingEngine {
    pub fn new(thresholds: RatingConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RatingConfig {
        &self.thresholds
    }

    /// Adjust the upgrade tier, leaving the floor untouched.
    pub fn update_thresholds(&mut self, sharpness: Option<f64>, nima: Option<f64>) {
        if let Some(sharpness) = sharpness {
            self.thresholds.sharpness_threshold = sharpness;
        }
        if let Some(nima) = nima {
            self.thresholds.nima_threshold = nima;
        }
    }

    /// Rate a detection result.
    pub fn rate(&self, detection: &DetectionResult) -> RatingOutcome {
        self.calculate(
            detection.detected,
            detection.confidence,
            detection.sharpness,
            detection.nima,
            detection.brisque,
        )
    }

    /// Rate from individual scores.
    pub fn calculate(
        &self,
        detected: bool,
        confidence: f64,
        sharpness: f64,
        nima: Option<f64>,
        brisque: Option<f64>,
    ) -> RatingOutcome {
        let t = &self.thresholds;

        if !detected {
            return RatingOutcome {
                rating: Rating::Rejected,
                pick: Pick::Rejected,
                reason: "rejected: no subject detected".to_string(),
            };
        }

        // Floor
        if confidence < t.min_confidence {
            return RatingOutcome::new(
                Rating::Ordinary,
                format!(
                    "confidence below floor ({:.0}% < {:.0}%)",
                    confidence * 100.0,
                    t.min_confidence * 100.0
                ),
            );
        }
        if let Some(brisque) = brisque.filter(|b| *b > t.max_brisque) {
            return RatingOutcome::new(
                Rating::Ordinary,
                format!("distortion above floor ({brisque:.1} > {})", t.max_brisque),
            );
        }
        if let Some(nima) = nima.filter(|n| *n < t.min_nima) {
            return RatingOutcome::new(
                Rating::Ordinary,
                format!("aesthetic below floor ({nima:.1} < {:.1})", t.min_nima),
            );
        }
        if sharpness < t.min_sharpness {
            return RatingOutcome::new(
                Rating::Ordinary,
                format!(
                    "sharpness below floor ({sharpness:.0} < {})",
                    t.min_sharpness
                ),
            );
        }

        // Upgrade
        let sharp_ok = sharpness >= t.sharpness_threshold;
        let nima_ok = nima.is_some_and(|n| n >= t.nima_threshold);

        match (sharp_ok, nima_ok) {
            (true, true) => RatingOutcome::new(
                Rating::Excellent,
                "dual-qualified: sharpness and aesthetic both meet upgrade thresholds",
            ),
            (true, false) => RatingOutcome::new(Rating::Good, "good: sharpness meets threshold"),
            (false, true) => RatingOutcome::new(Rating::Good, "good: aesthetic meets threshold"),
            (false, false) => RatingOutcome::new(
                Rating::Ordinary,
                "passes floor, fails both upgrade criteria",
            ),
        }
    }
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new(RatingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RatingEngine {
        RatingEngine::new(RatingConfig {
            min_confidence: 0.50,
            min_sharpness: 6500.0,
            min_nima: 4.3,
            max_brisque: 55.0,
            sharpness_threshold: 7500.0,
            nima_threshold: 4.8,
        })
    }

    #[test]
    fn test_not_detected_is_rejected() {
        let outcome = engine().calculate(false, 0.99, 9000.0, Some(6.0), Some(10.0));
        assert_eq!(outcome.rating, Rating::Rejected);
        assert_eq!(outcome.pick, Pick::Rejected);
    }

    #[test]
    fn test_dual_qualified_is_excellent() {
        let outcome = engine().calculate(true, 0.80, 8000.0, Some(5.0), Some(20.0));
        assert_eq!(outcome.rating, Rating::Excellent);
        assert_eq!(outcome.pick, Pick::None);
    }

    #[test]
    fn test_sharpness_alone_is_good() {
        let outcome = engine().calculate(true, 0.80, 8000.0, Some(4.5), Some(20.0));
        assert_eq!(outcome.rating, Rating::Good);
        assert!(outcome.reason.contains("sharpness"));
    }

    #[test]
    fn test_low_aesthetic_fails_floor_even_when_sharp() {
        // nima 4.0 is below min_nima 4.3, so the floor wins over sharpness
        let outcome = engine().calculate(true, 0.80, 8000.0, Some(4.0), Some(20.0));
        assert_eq!(outcome.rating, Rating::Ordinary);
        assert!(outcome.reason.contains("aesthetic"));
    }

    #[test]
    fn test_sharpness_alone_without_nima_is_good() {
        let outcome = engine().calculate(true, 0.80, 8000.0, None, Some(20.0));
        assert_eq!(outcome.rating, Rating::Good);
    }

    #[test]
    fn test_aesthetic_alone_is_good() {
        let outcome = engine().calculate(true, 0.80, 7000.0, Some(5.0), None);
        assert_eq!(outcome.rating, Rating::Good);
        assert!(outcome.reason.contains("aesthetic"));
    }

    #[test]
    fn test_low_confidence_reports_value() {
        let outcome = engine().calculate(true, 0.30, 9000.0, Some(6.0), Some(10.0));
        assert_eq!(outcome.rating, Rating::Ordinary);
        assert!(outcome.reason.contains("confidence"));
        assert!(outcome.reason.contains("30%"));
    }

    #[test]
    fn test_high_distortion_fails_floor() {
        let outcome = engine().calculate(true, 0.80, 9000.0, Some(6.0), Some(60.0));
        assert_eq!(outcome.rating, Rating::Ordinary);
        assert!(outcome.reason.contains("distortion"));
    }

    #[test]
    fn test_low_sharpness_fails_floor() {
        let outcome = engine().calculate(true, 0.80, 6000.0, Some(6.0), Some(10.0));
        assert_eq!(outcome.rating, Rating::Ordinary);
        assert!(outcome.reason.contains("sharpness below floor"));
    }

    #[test]
    fn test_passes_floor_without_upgrade() {
        let outcome = engine().calculate(true, 0.80, 7000.0, Some(4.5), Some(20.0));
        assert_eq!(outcome.rating, Rating::Ordinary);
        assert!(outcome.reason.contains("fails both"));
    }

    #[test]
    fn test_floor_check_order() {
        // Low confidence and high distortion at once: confidence is checked first
        let outcome = engine().calculate(true, 0.10, 9000.0, Some(6.0), Some(99.0));
        assert!(outcome.reason.contains("confidence"));
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let outcome = engine().calculate(true, 0.50, 7500.0, Some(4.8), Some(55.0));
        assert_eq!(outcome.rating, Rating::Excellent);
    }

    #[test]
    fn test_rating_is_deterministic() {
        let e = engine();
        let a = e.calculate(true, 0.66, 7712.0, Some(4.9), None);
        let b = e.calculate(true, 0.66, 7712.0, Some(4.9), None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_update_thresholds_only_touches_upgrade_tier() {
        let mut e = engine();
        e.update_thresholds(Some(9000.0), None);
        assert_eq!(e.thresholds().sharpness_threshold, 9000.0);
        assert_eq!(e.thresholds().nima_threshold, 4.8);
        assert_eq!(e.thresholds().min_sharpness, 6500.0);

        let outcome = e.calculate(true, 0.80, 8000.0, Some(5.0), Some(20.0));
        assert_eq!(outcome.rating, Rating::Good);
    }

    #[test]
    fn test_rate_uses_detection_fields() {
        let detection = DetectionResult {
            detected: true,
            selected: false,
            confidence: 0.80,
            sharpness: 8000.0,
            nima: Some(5.0),
            brisque: Some(20.0),
        };
        assert_eq!(engine().rate(&detection).rating, Rating::Excellent);
        assert_eq!(
            engine().rate(&DetectionResult::empty()).rating,
            Rating::Rejected
        );
    }
}
