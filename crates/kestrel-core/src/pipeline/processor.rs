//! Pipeline orchestration - drives every stage of a culling run in order.
//!
//! ```text
//! scan → convert → detect + rate → pick → organize → clean up → stats
//! ```
//!
//! Everything runs on one coordinating task. The only parallel region is
//! RAW conversion; detection is awaited one photo at a time because picking
//! needs the complete 3-star cohort anyway.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::convert::{EmbeddedPreviewConverter, RawConverter};
use crate::detect::{Detector, SidecarDetector};
use crate::error::{PipelineError, PipelineResult, Result};
use crate::metadata::{ExifToolWriter, MetadataUpdate, MetadataWriter, NoopMetadataWriter};
use crate::picked::{PickedCandidate, PickedSelector};
use crate::rating::{RatingEngine, RatingOutcome};
use crate::stats::RunStats;
use crate::types::{DetectionResult, DetectionSettings, LogLevel, Pick, RatedPhoto, Rating};

use super::cleanup::TempCleaner;
use super::conversion::{plan_conversions, ConversionScheduler, ConversionTask};
use super::organizer::{FileOrganizer, OrganizeReport};
use super::report::Reporter;
use super::scanner::{split_name, FileScanner, ScanResult};

// Progress milestones (percent) at the end of each phase
const SCAN_DONE: f32 = 5.0;
const CONVERT_DONE: f32 = 30.0;
const RATE_DONE: f32 = 90.0;
const PICK_DONE: f32 = 93.0;
const ORGANIZE_DONE: f32 = 97.0;

/// Everything a finished run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub stats: RunStats,
    /// Rated photos in review order
    pub photos: Vec<RatedPhoto>,
    /// RAW files selected for the picked flag; see `stats.picked` for how
    /// many flags were actually written
    pub picked: Vec<PathBuf>,
    /// Present when the organize phase ran
    pub organize: Option<OrganizeReport>,
}

/// The culling pipeline.
pub struct Culler {
    config: Config,
    engine: RatingEngine,
    converter: Arc<dyn RawConverter>,
    detector: Arc<dyn Detector>,
    metadata: Arc<dyn MetadataWriter>,
    reporter: Reporter,
}

impl Culler {
    /// Create a pipeline with explicit collaborators.
    pub fn new(
        config: Config,
        converter: Arc<dyn RawConverter>,
        detector: Arc<dyn Detector>,
        metadata: Arc<dyn MetadataWriter>,
        reporter: Reporter,
    ) -> Self {
        Self {
            engine: RatingEngine::new(config.rating),
            config,
            converter,
            detector,
            metadata,
            reporter,
        }
    }

    /// Create a pipeline with the built-in converter, sidecar detector and
    /// exiftool writer (or no writer when metadata is disabled).
    pub fn from_config(config: Config, reporter: Reporter) -> Self {
        let detector = SidecarDetector::new(config.detector_program(), config.detection.args.clone());
        let metadata: Arc<dyn MetadataWriter> = if config.metadata.enabled {
            Arc::new(ExifToolWriter::new(config.exiftool_path()))
        } else {
            Arc::new(NoopMetadataWriter)
        };
        Self::new(
            config,
            Arc::new(EmbeddedPreviewConverter::new()),
            Arc::new(detector),
            metadata,
            reporter,
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Override the upgrade thresholds for this pipeline only.
    pub fn update_thresholds(&mut self, sharpness: Option<f64>, nima: Option<f64>) {
        self.engine.update_thresholds(sharpness, nima);
        self.config.rating = *self.engine.thresholds();
    }

    /// Run the full pipeline over `dir`.
    ///
    /// Fails only when `dir` cannot be scanned, before anything is touched.
    /// Per-file problems are logged and the file is skipped.
    pub async fn run(&self, dir: &Path) -> Result<RunReport> {
        let start = Instant::now();
        let mut stats = RunStats::default();

        // Scan
        let scan_start = Instant::now();
        let mut scan = FileScanner::new().scan(dir)?;
        self.reporter.info(&format!(
            "Found {} RAW file(s) and {} preview(s)",
            scan.raw.len(),
            scan.preview.len()
        ));
        for message in &scan.skipped {
            self.reporter
                .warning(&format!("Skipped unreadable entry: {message}"));
        }
        tracing::debug!("Scan took {:?}", scan_start.elapsed());
        self.reporter.progress(SCAN_DONE);

        // Convert
        let plan = plan_conversions(dir, &scan);
        let pending = plan.tasks.len();
        self.reporter.info(&format!(
            "{} paired RAW+preview, {} standalone preview(s), {pending} RAW-only",
            plan.paired.len(),
            plan.standalone.len()
        ));
        if pending == 0 {
            self.reporter.info("No RAW files need conversion");
        } else {
            let converted = self.convert(plan.tasks).await;
            stats.converted = converted.len();
            stats.conversion_failed = pending - converted.len();
            scan.review.extend(converted);
        }
        self.reporter.progress(CONVERT_DONE);

        // Detect and rate
        let (photos, candidates) = self.rate_all(dir, &scan, &mut stats).await;
        self.reporter.progress(RATE_DONE);

        // Pick
        let picked = self.select_picked(&candidates, &mut stats);
        self.reporter.progress(PICK_DONE);

        // Organize
        let organize = if self.config.run.organize_files {
            let report = FileOrganizer::new(dir).organize(&photos, &self.reporter);
            stats.moved = report.moved;
            Some(report)
        } else {
            None
        };
        self.reporter.progress(ORGANIZE_DONE);

        // Clean up
        if self.config.run.cleanup_temp {
            stats.cleaned = TempCleaner::new(dir).clean(&scan.review, &scan.raw, &self.reporter);
        }
        self.reporter.progress(100.0);

        let stats = stats.finish(start.elapsed());
        self.reporter.success(&format!(
            "Culled {} photo(s) in {:.1}s",
            stats.total, stats.total_seconds
        ));

        Ok(RunReport {
            stats,
            photos,
            picked,
            organize,
        })
    }

    /// Convert RAW-only assets; returns the generated preview file names.
    async fn convert(&self, tasks: Vec<ConversionTask>) -> Vec<String> {
        let total = tasks.len();
        let scheduler =
            ConversionScheduler::new(self.converter.clone(), self.config.conversion.worker_count())
                .with_reporter(self.reporter.clone());
        self.reporter.info(&format!(
            "Converting {total} RAW file(s) with {} worker(s)...",
            scheduler.workers()
        ));

        let convert_start = Instant::now();
        let mut done = 0usize;
        let mut converted = Vec::new();

        let reporter = &self.reporter;
        scheduler
            .run(tasks, |outcome| {
                done += 1;
                match &outcome.result {
                    Ok(path) => {
                        if let Some(name) = path.file_name() {
                            converted.push(name.to_string_lossy().into_owned());
                        }
                        let ok = converted.len();
                        if ok % 5 == 0 || done == total {
                            reporter.info(&format!("Converted {ok}/{total}"));
                        }
                    }
                    Err(e) => reporter.error(&format!("Conversion failed: {} ({e})", outcome.prefix)),
                }
                let span = CONVERT_DONE - SCAN_DONE;
                reporter.progress(SCAN_DONE + span * done as f32 / total as f32);
            })
            .await;

        let elapsed = convert_start.elapsed().as_secs_f64();
        self.reporter.info(&format!(
            "Conversion took {elapsed:.1}s ({:.1}s per file)",
            elapsed / total as f64
        ));
        converted
    }

    /// Detect and rate every reviewed preview.
    async fn rate_all(
        &self,
        dir: &Path,
        scan: &ScanResult,
        stats: &mut RunStats,
    ) -> (Vec<RatedPhoto>, Vec<PickedCandidate>) {
        let settings = DetectionSettings {
            min_confidence: self.config.rating.min_confidence,
            save_crop: self.config.detection.save_crop,
            normalization: self.config.detection.normalization,
        };

        let total = scan.review.len();
        self.reporter.info(&format!("{total} photo(s) to review"));

        let mut photos = Vec::with_capacity(total);
        let mut candidates = Vec::new();
        let detect_start = Instant::now();

        for (i, name) in scan.review.iter().enumerate() {
            let span = RATE_DONE - CONVERT_DONE;
            self.reporter
                .progress(CONVERT_DONE + span * i as f32 / total.max(1) as f32);

            let Some((prefix, _)) = split_name(name) else {
                continue;
            };
            let preview = dir.join(name);
            self.reporter.info(&format!("[{}/{total}] {name}", i + 1));

            let detection = match self.detect(&preview, &settings).await {
                Ok(detection) => detection,
                Err(e) => {
                    stats.detection_failed += 1;
                    self.reporter.error(&format!("Skipping {name}: {e}"));
                    continue;
                }
            };
            if detection.selected {
                tracing::debug!("{name} was flagged by the detector as a keeper");
            }

            let outcome = self.engine.rate(&detection);
            self.log_outcome(&outcome, &detection);
            stats.record(outcome.rating);

            let raw_path = scan
                .raw_path(dir, prefix)
                .filter(|path| path.is_file());

            if let Some(raw) = &raw_path {
                let update = MetadataUpdate {
                    file: raw.clone(),
                    rating: outcome.rating,
                    pick: outcome.pick,
                    sharpness: Some(detection.sharpness),
                    nima: detection.nima,
                    brisque: detection.brisque,
                };
                let summary = self.metadata.batch_set(std::slice::from_ref(&update));
                if summary.failed > 0 {
                    self.reporter
                        .warning(&format!("Failed to write rating metadata for {name}"));
                }

                if outcome.rating == Rating::Excellent {
                    if let Some(nima) = detection.nima {
                        candidates.push(PickedCandidate {
                            file: raw.clone(),
                            nima,
                            sharpness: detection.sharpness,
                        });
                    }
                }
            }

            photos.push(RatedPhoto {
                prefix: prefix.to_string(),
                raw_path,
                rating: outcome.rating,
            });
        }

        let elapsed = detect_start.elapsed().as_secs_f64();
        if total > 0 {
            self.reporter.info(&format!(
                "Detection took {elapsed:.1}s ({:.1}s per photo)",
                elapsed / total as f64
            ));
        }
        (photos, candidates)
    }

    /// Run the blocking detector off the async runtime and wait for it.
    async fn detect(
        &self,
        preview: &Path,
        settings: &DetectionSettings,
    ) -> PipelineResult<DetectionResult> {
        let detector = self.detector.clone();
        let path = preview.to_path_buf();
        let settings = settings.clone();
        tokio::task::spawn_blocking(move || detector.detect(&path, &settings))
            .await
            .unwrap_or_else(|e| {
                Err(PipelineError::Detection {
                    path: preview.to_path_buf(),
                    message: format!("detector task panicked: {e}"),
                })
            })
    }

    fn log_outcome(&self, outcome: &RatingOutcome, detection: &DetectionResult) {
        let mut scores = format!(
            "confidence {:.2}, sharpness {:.1}",
            detection.confidence, detection.sharpness
        );
        if let Some(nima) = detection.nima {
            scores.push_str(&format!(", nima {nima:.2}"));
        }
        if let Some(brisque) = detection.brisque {
            scores.push_str(&format!(", brisque {brisque:.2}"));
        }

        let (level, line) = match outcome.rating {
            Rating::Excellent => (LogLevel::Success, format!("  *** {} ({scores})", outcome.reason)),
            Rating::Good => (LogLevel::Info, format!("  **  {} ({scores})", outcome.reason)),
            Rating::Ordinary => (LogLevel::Warning, format!("  0   {} ({scores})", outcome.reason)),
            Rating::Rejected => (LogLevel::Error, format!("  x   {}", outcome.reason)),
        };
        self.reporter.log(level, &line);
    }

    /// Choose picked photos and write their flags.
    fn select_picked(&self, candidates: &[PickedCandidate], stats: &mut RunStats) -> Vec<PathBuf> {
        if candidates.is_empty() {
            self.reporter
                .info("No 3-star photos with an aesthetic score, skipping picked selection");
            return vec![];
        }

        let percent = self.config.picked.top_percentage;
        let selection = PickedSelector::new(percent).select(candidates);
        self.reporter.info(&format!(
            "{} 3-star candidate(s); top {percent}% by aesthetic: {}, by sharpness: {}",
            candidates.len(),
            selection.nima_top.len(),
            selection.sharpness_top.len()
        ));

        if selection.picked.is_empty() {
            self.reporter
                .info("No photo is top-ranked on both aesthetic and sharpness; nothing picked");
            return vec![];
        }

        let updates: Vec<MetadataUpdate> = selection
            .picked
            .iter()
            .map(|file| MetadataUpdate::flag(file.clone(), Rating::Excellent, Pick::Picked))
            .collect();
        let summary = self.metadata.batch_set(&updates);
        if summary.failed == 0 {
            self.reporter.success(&format!(
                "Picked {} photo(s) ranked top on both axes",
                selection.picked.len()
            ));
        } else {
            self.reporter.warning(&format!(
                "{} picked flag(s) failed to write",
                summary.failed
            ));
        }
        stats.picked = selection.picked.len().saturating_sub(summary.failed);

        selection.picked
    }
}
