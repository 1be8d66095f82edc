//! CLI enum types for the cull command.

use clap::ValueEnum;
use kestrel_core::NormalizationMode;

/// Sharpness normalization passed to the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Normalization {
    /// Logarithmic (default)
    Log,
    /// Linear
    Linear,
    /// Square root
    Sqrt,
}

impl From<Normalization> for NormalizationMode {
    fn from(value: Normalization) -> Self {
        match value {
            Normalization::Log => NormalizationMode::Log,
            Normalization::Linear => NormalizationMode::Linear,
            Normalization::Sqrt => NormalizationMode::Sqrt,
        }
    }
}
