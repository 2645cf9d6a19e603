//! Autoframe CLI — Offline driver for the framing pipeline.
//!
//! Usage:
//!   autoframe track <PATH>     Replay a detection log through the controller
//!   autoframe info <PATH>      Show detection log information

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "autoframe",
    about = "Autonomous camera framing from hand detections",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a detection log (JSONL) through the framing controller
    Track {
        /// Path to the detection log
        path: PathBuf,

        /// Bounding-box padding multiplier
        #[arg(long, default_value = "2.0")]
        padding: f64,

        /// Smoothing preset: exponential|kalmanFast|kalmanSmooth
        #[arg(long, default_value = "exponential")]
        preset: String,

        /// Exponential smoothing factor (0, 1]
        #[arg(long, default_value = "0.05")]
        smooth_factor: f64,

        /// Upper zoom bound
        #[arg(long, default_value = "4.0")]
        max_zoom: f64,

        /// Observable snapshot refresh interval (frames)
        #[arg(long, default_value = "6")]
        publish_interval: u32,

        /// Consecutive missed frames before returning to center
        #[arg(long, default_value = "0")]
        loss_debounce: u32,

        /// Write the full diagnostic trace as JSON
        #[arg(long)]
        export_trace: Option<PathBuf>,
    },

    /// Show information about a detection log
    Info {
        /// Path to the detection log
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // CLI verbosity overrides the configured log level.
    let app_config = autoframe_common::config::AppConfig::load();
    if cli.verbose {
        autoframe_common::logging::init_cli_logging(true);
    } else {
        autoframe_common::logging::init_logging(&app_config.logging);
    }

    match cli.command {
        Commands::Track {
            path,
            padding,
            preset,
            smooth_factor,
            max_zoom,
            publish_interval,
            loss_debounce,
            export_trace,
        } => commands::track::run(
            path,
            padding,
            preset,
            smooth_factor,
            max_zoom,
            publish_interval,
            loss_debounce,
            export_trace,
            &app_config.session,
        ),
        Commands::Info { path } => commands::info::run(path),
    }
}
