//! Kestrel CLI - cull wildlife shoots into rated folders.
//!
//! Kestrel scans a directory of RAW files and JPEG previews, scores every
//! frame with an external detector, writes star ratings into the RAW files,
//! flags the best 3-star frames as picked, and moves keepers into
//! per-rating folders.
//!
//! # Usage
//!
//! ```bash
//! # Cull a shoot with the configured thresholds
//! kestrel cull ~/Pictures/2024-05-heron
//!
//! # Stricter upgrade tier for this run only
//! kestrel cull ./shoot --sharpness 9000 --nima 5.2
//!
//! # Rate without touching the folder layout
//! kestrel cull ./shoot --no-organize --no-cleanup
//!
//! # View configuration
//! kestrel config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Kestrel - wildlife photo culling.
#[derive(Parser, Debug)]
#[command(name = "kestrel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rate, pick and organize a shoot directory
    Cull(cli::cull::CullArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go to stderr directly
    let config = match kestrel_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `kestrel config path`."
            );
            kestrel_core::Config::default()
        }
    };
    let json_logs = logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Kestrel v{}", kestrel_core::VERSION);

    match cli.command {
        Commands::Cull(args) => cli::cull::execute(args, json_logs).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
