//! WaveGrid CLI - Headless runner for acoustic and water-surface scenarios.
//!
//! # Commands
//!
//! - `wavegrid acoustic` - Run the `[acoustic]` scenario and optionally record a probe trace
//! - `wavegrid water` - Run the `[water]` scenario
//! - `wavegrid replay <file>` - Summarize a recorded pressure trace
//!
//! # Examples
//!
//! ```bash
//! # Run the default room for 1000 steps and save the probe trace
//! wavegrid acoustic --steps 1000 --trace probe.txt
//!
//! # Run the pool described in a custom scenario file
//! wavegrid water --config pool.toml
//!
//! # Inspect the trace with the room's time step
//! wavegrid replay probe.txt --time-step 0.008333
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::{acoustic, replay, water};

/// WaveGrid - 2D wave field simulation
#[derive(Parser)]
#[command(name = "wavegrid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an acoustic room scenario
    Acoustic {
        /// Scenario file (defaults are used if it does not exist)
        #[arg(short, long, default_value = wavegrid::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Number of steps (overrides the scenario)
        #[arg(short, long)]
        steps: Option<u32>,

        /// Write the probe trace to this file
        #[arg(short, long)]
        trace: Option<PathBuf>,
    },

    /// Run a water-surface scenario
    Water {
        /// Scenario file (defaults are used if it does not exist)
        #[arg(short, long, default_value = wavegrid::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Number of steps (overrides the scenario)
        #[arg(short, long)]
        steps: Option<u32>,
    },

    /// Summarize a recorded pressure trace
    Replay {
        /// Trace file written by `wavegrid acoustic --trace`
        file: PathBuf,

        /// Time step used for the recording, to report times in seconds
        #[arg(short = 'd', long)]
        time_step: Option<f32>,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Acoustic {
            config,
            steps,
            trace,
        } => acoustic::execute(&config, steps, trace.as_deref(), cli.quiet),

        Commands::Water { config, steps } => water::execute(&config, steps, cli.quiet),

        Commands::Replay { file, time_step } => replay::execute(&file, time_step, cli.quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
