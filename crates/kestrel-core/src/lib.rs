//! Kestrel Core - wildlife photo culling library.
//!
//! Kestrel takes a directory of RAW files and JPEG previews from a shoot,
//! scores each frame with an external bird detector, assigns a star rating,
//! flags the very best frames as picked, and files the keepers into
//! per-rating folders.
//!
//! # Architecture
//!
//! ```text
//! Scan → Convert RAW-only → Detect → Rate → Pick → Organize → Clean up
//! ```
//!
//! Detection, conversion and metadata writing sit behind traits so the
//! pipeline can run with the built-in implementations or with test doubles.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kestrel_core::{Config, Culler, Reporter};
//!
//! #[tokio::main]
//! async fn main() -> kestrel_core::Result<()> {
//!     let config = Config::load()?;
//!     let culler = Culler::from_config(config, Reporter::tracing());
//!
//!     let report = culler.run("./2024-05-shoot".as_ref()).await?;
//!     println!("3-star: {}", report.stats.excellent);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod convert;
pub mod detect;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod picked;
pub mod pipeline;
pub mod rating;
pub mod stats;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, NormalizationMode, RatingConfig};
pub use convert::{EmbeddedPreviewConverter, RawConverter};
pub use detect::{Detector, SidecarDetector};
pub use error::{ConfigError, KestrelError, PipelineError, PipelineResult, Result};
pub use manifest::{Manifest, MANIFEST_FILE_NAME};
pub use metadata::{ExifToolWriter, MetadataUpdate, MetadataWriter, NoopMetadataWriter};
pub use picked::{PickedCandidate, PickedSelection, PickedSelector};
pub use pipeline::{Culler, Reporter, RunReport};
pub use rating::{RatingEngine, RatingOutcome};
pub use stats::RunStats;
pub use types::{DetectionResult, DetectionSettings, LogLevel, Pick, RatedPhoto, Rating};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
