//! RAW/preview pairing and bounded-concurrency conversion.
//!
//! Pairing is done in two passes over the scan result: first the prefixes
//! that have both a RAW and a preview, then the RAW-only remainder by set
//! difference. Only the remainder is converted.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::convert::RawConverter;
use crate::error::{PipelineError, PipelineResult};

use super::report::Reporter;
use super::scanner::ScanResult;

/// A RAW file that has no preview yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTask {
    pub prefix: String,
    pub raw_path: PathBuf,
}

/// Pairing decision for one scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionPlan {
    /// Prefixes with both a RAW and a preview
    pub paired: BTreeSet<String>,
    /// Prefix → extension of previews with no RAW counterpart
    pub standalone: BTreeMap<String, String>,
    /// RAW files to convert, sorted by prefix
    pub tasks: Vec<ConversionTask>,
}

/// Split the scan into paired assets, standalone previews, and RAW files
/// that still need a preview.
pub fn plan_conversions(dir: &Path, scan: &ScanResult) -> ConversionPlan {
    let raw_prefixes: BTreeSet<&String> = scan.raw.keys().collect();
    let preview_prefixes: BTreeSet<&String> = scan.preview.keys().collect();

    let paired: BTreeSet<String> = raw_prefixes
        .intersection(&preview_prefixes)
        .map(|p| (*p).clone())
        .collect();

    let standalone = scan
        .preview
        .iter()
        .filter(|(prefix, _)| !paired.contains(*prefix))
        .map(|(prefix, ext)| (prefix.clone(), ext.clone()))
        .collect();

    let tasks = raw_prefixes
        .difference(&preview_prefixes)
        .map(|prefix| ConversionTask {
            prefix: (*prefix).clone(),
            raw_path: dir.join(format!("{prefix}{}", scan.raw[*prefix])),
        })
        .collect();

    ConversionPlan {
        paired,
        standalone,
        tasks,
    }
}

/// Result of one conversion task.
#[derive(Debug)]
pub struct ConversionOutcome {
    pub prefix: String,
    pub result: PipelineResult<PathBuf>,
}

/// Runs conversion tasks on a bounded worker pool.
pub struct ConversionScheduler {
    converter: Arc<dyn RawConverter>,
    workers: usize,
    reporter: Reporter,
}

impl ConversionScheduler {
    pub fn new(converter: Arc<dyn RawConverter>, workers: usize) -> Self {
        Self {
            converter,
            workers: workers.max(1),
            reporter: Reporter::tracing(),
        }
    }

    /// Send task failures that produce no outcome to `reporter`.
    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Convert every task, at most `workers` at a time.
    ///
    /// `on_complete` is called in completion order, which is unspecified.
    /// A failed task never affects its siblings and is not retried.
    pub async fn run<F>(&self, tasks: Vec<ConversionTask>, mut on_complete: F) -> Vec<ConversionOutcome>
    where
        F: FnMut(&ConversionOutcome),
    {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut set = JoinSet::new();

        for task in tasks {
            let semaphore = semaphore.clone();
            let converter = self.converter.clone();

            set.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(permit) => {
                        let raw_path = task.raw_path.clone();
                        let joined = tokio::task::spawn_blocking(move || {
                            let _permit = permit;
                            converter.convert(&raw_path)
                        })
                        .await;
                        joined.unwrap_or_else(|e| {
                            Err(PipelineError::Conversion {
                                path: task.raw_path.clone(),
                                message: format!("conversion task panicked: {e}"),
                            })
                        })
                    }
                    Err(_) => Err(PipelineError::Conversion {
                        path: task.raw_path.clone(),
                        message: "worker pool closed".to_string(),
                    }),
                };
                ConversionOutcome {
                    prefix: task.prefix,
                    result,
                }
            });
        }

        let mut outcomes = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => {
                    on_complete(&outcome);
                    outcomes.push(outcome);
                }
                Err(e) => self
                    .reporter
                    .error(&format!("Conversion task failed to join: {e}")),
            }
        }
        outcomes
    }
}
