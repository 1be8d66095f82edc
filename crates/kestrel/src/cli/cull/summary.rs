//! Progress bar and end-of-run summary table.

use console::{style, Style};
use indicatif::{ProgressBar, ProgressStyle};
use kestrel_core::{LogLevel, RunReport};

/// Create a percentage progress bar for one run.
pub fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb
}

/// Terminal style for a log severity.
pub fn level_style(level: LogLevel) -> Style {
    let style = Style::new().for_stderr();
    match level {
        LogLevel::Success => style.green(),
        LogLevel::Error => style.red(),
        LogLevel::Warning => style.yellow(),
        LogLevel::Info => style,
    }
}

/// Print a formatted summary table after a run.
pub fn print_summary(report: &RunReport) {
    let stats = &report.stats;
    let pct = |n: usize| {
        if stats.total > 0 {
            n as f64 * 100.0 / stats.total as f64
        } else {
            0.0
        }
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!(
        "    {}  {:>8}  ({:>5.1}%)",
        style("3-star:     ").for_stderr().green(),
        stats.excellent,
        pct(stats.excellent)
    );
    eprintln!("      picked:     {:>8}", stats.picked);
    eprintln!(
        "    2-star:       {:>8}  ({:>5.1}%)",
        stats.good,
        pct(stats.good)
    );
    eprintln!(
        "    {}  {:>8}  ({:>5.1}%)",
        style("0-star:     ").for_stderr().yellow(),
        stats.ordinary,
        pct(stats.ordinary)
    );
    eprintln!(
        "    {}  {:>8}  ({:>5.1}%)",
        style("Rejected:   ").for_stderr().red(),
        stats.rejected,
        pct(stats.rejected)
    );
    if stats.detection_failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.detection_failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", stats.total);
    if stats.converted > 0 || stats.conversion_failed > 0 {
        eprintln!(
            "    Converted:    {:>8}  ({} failed)",
            stats.converted, stats.conversion_failed
        );
    }
    if report.organize.is_some() {
        eprintln!("    Moved:        {:>8}", stats.moved);
    }
    eprintln!("    Cleaned:      {:>8}", stats.cleaned);
    eprintln!("    Duration:     {:>7.1}s", stats.total_seconds);
    eprintln!("    Per photo:    {:>7.2}s", stats.avg_seconds);
    eprintln!("  ====================================");
}
