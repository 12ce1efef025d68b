//! CLI command implementations.

pub mod acoustic;
pub mod replay;
pub mod water;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{CliError, CliResult};

/// Progress bar over `steps` simulation steps, hidden in quiet mode.
pub fn step_progress(steps: u64, quiet: bool) -> CliResult<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(steps);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} steps ({eta})")?
            .progress_chars("█▓▒░  "),
    );
    Ok(pb)
}

/// Resolve the step count, preferring the command-line override.
pub fn resolve_steps(cli: Option<u32>, scenario: u32) -> CliResult<u32> {
    match cli.unwrap_or(scenario) {
        0 => Err(CliError::InvalidArgument(
            "step count must be at least 1".to_string(),
        )),
        n => Ok(n),
    }
}

/// Cells updated per second.
pub fn throughput(cells: u64, steps: u32, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (cells * steps as u64) as f64 / secs
    } else {
        0.0
    }
}
