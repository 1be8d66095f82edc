//! Error types for the Kestrel culling pipeline.
//!
//! Errors are organized by stage so every log line can name the file and the
//! step that failed. Only the directory errors are fatal to a run; everything
//! else is reported and the affected unit is skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Kestrel operations.
#[derive(Error, Debug)]
pub enum KestrelError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Target directory does not exist or is not a directory
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Target directory exists but cannot be listed
    #[error("Cannot read directory {path}: {message}")]
    DirectoryUnreadable { path: PathBuf, message: String },

    /// RAW to preview conversion failed
    #[error("Conversion failed for {path}: {message}")]
    Conversion { path: PathBuf, message: String },

    /// The detector could not score a preview
    #[error("Detection failed for {path}: {message}")]
    Detection { path: PathBuf, message: String },

    /// Writing rating metadata failed
    #[error("Metadata write failed for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Moving a file into its rating folder failed
    #[error("Move failed for {path}: {message}")]
    Move { path: PathBuf, message: String },

    /// Reading or writing the manifest failed
    #[error("Manifest error at {path}: {message}")]
    Manifest { path: PathBuf, message: String },
}

/// Convenience type alias for Kestrel results.
pub type Result<T> = std::result::Result<T, KestrelError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
