//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem for structured logging with support for
//! both human-readable and JSON output formats.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `verbose` - If true, enables DEBUG level logging; otherwise INFO level.
/// * `json_format` - If true, outputs structured JSON logs; otherwise human-readable.
///
/// # Notes
///
/// - Log output goes to stderr (stdout is reserved for `--json` statistics)
/// - The RUST_LOG environment variable can override the log level
pub fn init(verbose: bool, json_format: bool) {
    // Build the filter, respecting RUST_LOG if set
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_format {
        // JSON format for machine parsing
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Pretty format for humans
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging with settings from the `[logging]` config section.
///
/// CLI flags can only raise verbosity or switch to JSON, never undo it.
/// Returns whether JSON output was selected.
pub fn init_from_config(
    config: &kestrel_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) -> bool {
    let (verbose, json_format) = resolve(config, verbose_override, json_logs_override);
    init(verbose, json_format);
    json_format
}

fn resolve(config: &kestrel_core::Config, verbose: bool, json_logs: bool) -> (bool, bool) {
    let level = config.logging.level.to_lowercase();
    let verbose = verbose || level == "debug" || level == "trace";
    let json_format = json_logs || config.logging.format.eq_ignore_ascii_case("json");
    (verbose, json_format)
}
