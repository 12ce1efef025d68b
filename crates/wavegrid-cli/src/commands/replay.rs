//! `wavegrid replay` command - Summarize a recorded pressure trace.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use colored::Colorize;
use wavegrid::PressureTrace;

use crate::error::CliResult;

/// Statistics of a recorded trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSummary {
    pub samples: usize,
    pub peak: f32,
    pub range: Option<(f32, f32)>,
    /// Sign changes between consecutive non-zero samples.
    pub zero_crossings: usize,
    /// Index of the first non-zero sample.
    pub arrival: Option<usize>,
}

impl TraceSummary {
    pub fn of(trace: &PressureTrace) -> Self {
        let samples = trace.samples();
        let signs: Vec<bool> = samples
            .iter()
            .filter(|s| **s != 0.0)
            .map(|s| s.is_sign_positive())
            .collect();
        Self {
            samples: samples.len(),
            peak: trace.peak(),
            range: trace.range(),
            zero_crossings: signs.windows(2).filter(|w| w[0] != w[1]).count(),
            arrival: samples.iter().position(|s| *s != 0.0),
        }
    }
}

/// Execute the replay command.
pub fn execute(path: &Path, time_step: Option<f32>, quiet: bool) -> CliResult<()> {
    let trace = PressureTrace::read_from(BufReader::new(File::open(path)?))?;
    let summary = TraceSummary::of(&trace);

    if quiet {
        return Ok(());
    }

    println!("{} {}", "Trace:".bright_cyan().bold(), path.display());
    println!("  {} {}", "Samples:".bright_white(), summary.samples);
    match summary.range {
        Some((lo, hi)) => println!("  {} [{:.6}, {:.6}]", "Range:".bright_white(), lo, hi),
        None => println!("  {} {}", "Range:".bright_white(), "empty trace".yellow()),
    }
    println!("  {} {:.6}", "Peak:".bright_white(), summary.peak);
    println!("  {} {}", "Zero crossings:".bright_white(), summary.zero_crossings);
    match (summary.arrival, time_step) {
        (Some(step), Some(dt)) => println!(
            "  {} step {} ({:.4} s)",
            "Arrival:".bright_white(),
            step,
            step as f32 * dt
        ),
        (Some(step), None) => println!("  {} step {}", "Arrival:".bright_white(), step),
        (None, _) => println!("  {} {}", "Arrival:".bright_white(), "never".yellow()),
    }

    Ok(())
}
