//! The `kestrel cull` command.

mod summary;
pub mod types;

pub use types::Normalization;

use clap::Args;
use kestrel_core::pipeline::log_to_tracing;
use kestrel_core::{Config, Culler, LogLevel, Reporter};
use std::path::PathBuf;
use std::sync::Arc;

use summary::{create_progress_bar, level_style, print_summary};

/// Arguments for the `cull` command.
#[derive(Args, Debug)]
pub struct CullArgs {
    /// Shoot directory holding RAW files and previews
    #[arg(required = true)]
    pub dir: String,

    /// Minimum detection confidence (0.0 - 1.0)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Sharpness needed for the upgrade tier
    #[arg(long)]
    pub sharpness: Option<f64>,

    /// Aesthetic (NIMA) score needed for the upgrade tier
    #[arg(long)]
    pub nima: Option<f64>,

    /// Sharpness normalization mode
    #[arg(long, value_enum)]
    pub norm: Option<Normalization>,

    /// Ask the detector to save cropped subjects
    #[arg(long)]
    pub save_crop: bool,

    /// Percentage of 3-star photos eligible for the picked flag
    #[arg(long, env = "KESTREL_TOP_PERCENT")]
    pub top_percent: Option<f64>,

    /// Maximum parallel RAW conversions
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Leave RAW files in place
    #[arg(long)]
    pub no_organize: bool,

    /// Keep generated and paired previews
    #[arg(long)]
    pub no_cleanup: bool,

    /// Do not write ratings into the RAW files
    #[arg(long)]
    pub no_metadata: bool,

    /// Print run statistics as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl CullArgs {
    /// Apply one-run overrides on top of the loaded configuration.
    ///
    /// The upgrade thresholds are not applied here; they go through the
    /// culler so the rating engine sees them.
    pub fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(confidence) = self.confidence {
            config.rating.min_confidence = confidence;
        }
        if let Some(norm) = self.norm {
            config.detection.normalization = norm.into();
        }
        if self.save_crop {
            config.detection.save_crop = true;
        }
        if let Some(top) = self.top_percent {
            config.picked.top_percentage = top;
        }
        if let Some(workers) = self.workers {
            config.conversion.max_workers = workers;
        }
        if self.no_organize {
            config.run.organize_files = false;
        }
        if self.no_cleanup {
            config.run.cleanup_temp = false;
        }
        if self.no_metadata {
            config.metadata.enabled = false;
        }
        config.validate()?;
        Ok(())
    }

    /// Target directory with `~` expanded.
    pub fn target_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.dir).into_owned())
    }
}

/// Build the culler for one run and check the final thresholds.
fn build_culler(args: &CullArgs, config: Config, reporter: Reporter) -> anyhow::Result<Culler> {
    let mut culler = Culler::from_config(config, reporter);
    culler.update_thresholds(args.sharpness, args.nima);
    culler.config().validate()?;
    Ok(culler)
}

/// Log line as shown to the user; JSON logs carry the plain message.
fn format_line(level: LogLevel, message: &str, plain: bool) -> String {
    if plain {
        message.to_string()
    } else {
        level_style(level).apply_to(message).to_string()
    }
}

/// Execute the cull command.
pub async fn execute(args: CullArgs, json_logs: bool) -> anyhow::Result<()> {
    let dir = args.target_dir();
    if !dir.is_dir() {
        anyhow::bail!(
            "Directory does not exist: {:?}\n\n  Hint: Point kestrel at a shoot folder.",
            dir
        );
    }

    let mut config = Config::load()?;
    args.apply(&mut config)?;

    let progress = create_progress_bar();
    let log_bar = progress.clone();
    let progress_bar = progress.clone();
    let reporter = Reporter::new(
        Arc::new(move |level: LogLevel, message: &str| {
            let line = format_line(level, message, json_logs);
            log_bar.suspend(|| log_to_tracing(level, &line));
        }),
        Arc::new(move |percent: f32| progress_bar.set_position(percent.round() as u64)),
    );

    let culler = build_culler(&args, config, reporter)?;
    let thresholds = culler.config().rating;
    tracing::info!(
        "Culling {:?} (upgrade: sharpness >= {}, aesthetic >= {})",
        dir,
        thresholds.sharpness_threshold,
        thresholds.nima_threshold
    );

    let report = culler.run(&dir).await;
    progress.finish_and_clear();
    let report = report?;

    print_summary(&report);
    if let Some(organize) = &report.organize {
        if let Some(manifest) = &organize.manifest {
            tracing::info!("Manifest written to {:?}", manifest);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.stats)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use kestrel_core::NormalizationMode;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CullArgs,
    }

    fn parse(argv: &[&str]) -> CullArgs {
        let mut full = vec!["kestrel"];
        full.extend_from_slice(argv);
        TestCli::parse_from(full).args
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let args = parse(&["/shoot"]);
        let mut config = Config::default();
        args.apply(&mut config).unwrap();

        assert_eq!(config.rating, Config::default().rating);
        assert!(config.run.organize_files);
        assert!(config.run.cleanup_temp);
        assert!(config.metadata.enabled);
        assert_eq!(args.sharpness, None);
        assert_eq!(args.nima, None);
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "/shoot",
            "--confidence",
            "0.7",
            "--norm",
            "sqrt",
            "--top-percent",
            "10",
            "-w",
            "2",
            "--no-organize",
            "--no-cleanup",
            "--no-metadata",
            "--save-crop",
        ]);
        let mut config = Config::default();
        args.apply(&mut config).unwrap();

        assert_eq!(config.rating.min_confidence, 0.7);
        assert_eq!(config.detection.normalization, NormalizationMode::Sqrt);
        assert!(config.detection.save_crop);
        assert_eq!(config.picked.top_percentage, 10.0);
        assert_eq!(config.conversion.max_workers, 2);
        assert!(!config.run.organize_files);
        assert!(!config.run.cleanup_temp);
        assert!(!config.metadata.enabled);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = parse(&["/shoot", "--confidence", "1.5"]);
        let mut config = Config::default();
        assert!(args.apply(&mut config).is_err());
    }

    #[test]
    fn test_threshold_flags_are_validated() {
        for argv in [["/shoot", "--nima=-1"], ["/shoot", "--sharpness=NaN"]] {
            let args = parse(&argv);
            let mut config = Config::default();
            args.apply(&mut config).unwrap();
            assert!(build_culler(&args, config, Reporter::tracing()).is_err());
        }
    }

    #[test]
    fn test_threshold_flags_reach_the_culler() {
        let args = parse(&["/shoot", "--sharpness", "9000", "--nima", "5.2"]);
        let culler = build_culler(&args, Config::default(), Reporter::tracing()).unwrap();
        assert_eq!(culler.config().rating.sharpness_threshold, 9000.0);
        assert_eq!(culler.config().rating.nima_threshold, 5.2);
    }

    #[test]
    fn test_json_log_lines_are_plain() {
        assert_eq!(format_line(LogLevel::Success, "Moved 3 photo(s)", true), "Moved 3 photo(s)");
        assert_eq!(format_line(LogLevel::Error, "x   rejected", true), "x   rejected");
    }

    #[tokio::test]
    async fn test_missing_directory_fails_early() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let args = parse(&[missing.to_str().unwrap()]);
        assert!(execute(args, false).await.is_err());
    }
}
