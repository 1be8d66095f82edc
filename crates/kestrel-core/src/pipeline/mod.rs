//! Culling pipeline stages.
//!
//! - **scanner**: Index RAW files and previews in a shoot directory
//! - **conversion**: Pair assets and convert RAW-only files on a worker pool
//! - **organizer**: Move rated RAW files into rating folders
//! - **cleanup**: Delete previews that belong to a RAW file
//! - **report**: Injected log and progress collaborators
//! - **processor**: Orchestrates the full run

pub mod cleanup;
pub mod conversion;
pub mod organizer;
pub mod processor;
pub mod report;
pub mod scanner;

// Re-exports for convenient access
pub use cleanup::TempCleaner;
pub use conversion::{plan_conversions, ConversionOutcome, ConversionPlan, ConversionScheduler, ConversionTask};
pub use organizer::{FileOrganizer, OrganizeReport};
pub use processor::{Culler, RunReport};
pub use report::{log_to_tracing, LogFn, ProgressFn, Reporter};
pub use scanner::{FileScanner, ScanResult};
