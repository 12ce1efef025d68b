//! `wavegrid acoustic` command - Run an acoustic room scenario.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use colored::Colorize;
use tracing::{debug, info};
use wavegrid::{config, PressureTrace};

use super::{resolve_steps, step_progress, throughput};
use crate::error::CliResult;

/// Summary of a finished acoustic run.
#[derive(Debug, Clone)]
pub struct AcousticReport {
    pub steps: u32,
    pub sample_range: (f32, f32),
    pub max_amplitude: f32,
    pub total_energy: f32,
    pub trace: PressureTrace,
}

/// Execute the acoustic command.
pub fn execute(
    config_path: &Path,
    steps: Option<u32>,
    trace_path: Option<&Path>,
    quiet: bool,
) -> CliResult<()> {
    let scenario = config::load(config_path)?.acoustic;
    let steps = resolve_steps(steps, scenario.steps)?;

    if !quiet {
        println!(
            "{} {}x{} room, {} steps",
            "Acoustic:".bright_cyan().bold(),
            scenario.width,
            scenario.height,
            steps
        );
    }

    let start = Instant::now();
    let report = run(&scenario, steps, quiet)?;
    let elapsed = start.elapsed();

    if !quiet {
        let (lo, hi) = report.sample_range;
        println!("  {} {:.2?}", "Elapsed:".bright_white(), elapsed);
        println!(
            "  {} {:.3e} cells/s",
            "Throughput:".bright_white(),
            throughput(scenario.width as u64 * scenario.height as u64, steps, elapsed)
        );
        println!("  {} [{:.6}, {:.6}]", "Range:".bright_white(), lo, hi);
        println!("  {} {:.6}", "Peak:".bright_white(), report.max_amplitude);
        println!("  {} {:.6}", "Energy:".bright_white(), report.total_energy);
        println!(
            "  {} ({}, {}) peak {:.6}",
            "Probe:".bright_white(),
            report.trace.x,
            report.trace.y,
            report.trace.peak()
        );
    }

    if let Some(path) = trace_path {
        let trace = &report.trace;
        trace.write_to(BufWriter::new(File::create(path)?))?;
        info!(path = %path.display(), samples = trace.len(), "Wrote pressure trace");
        if !quiet {
            println!("{} {}", "Trace written to".green(), path.display());
        }
    }

    Ok(())
}

/// Build the scenario and advance it `steps` times, driving sources before
/// each step and recording the probe after it.
pub fn run(scenario: &config::AcousticConfig, steps: u32, quiet: bool) -> CliResult<AcousticReport> {
    let (mut field, sources) = scenario.build()?;
    let (x, y) = scenario.trace_cell();
    field.cell(x, y)?;
    let mut trace = PressureTrace::with_capacity(x, y, steps as usize);
    debug!(sources = sources.len(), walls = scenario.walls.len(), "Scenario ready");

    let pb = step_progress(steps as u64, quiet)?;
    for _ in 0..steps {
        sources.drive(&mut field)?;
        field.step();
        trace.record(&field)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(AcousticReport {
        steps,
        sample_range: field.sample_range(),
        max_amplitude: field.max_amplitude(),
        total_energy: field.total_energy(),
        trace,
    })
}
