//! `wavegrid water` command - Run a water-surface scenario.

use std::path::Path;
use std::time::Instant;

use colored::Colorize;
use tracing::{debug, warn};
use wavegrid::config::{self, WaterConfig};

use super::{resolve_steps, step_progress, throughput};
use crate::error::CliResult;

/// Explicit integration stays bounded while `k * dt^2` is below this.
const MAX_STIFFNESS: f32 = 0.5;

/// Summary of a finished water run.
#[derive(Debug, Clone)]
pub struct WaterReport {
    pub steps: u32,
    pub dry_cells: usize,
    pub height_range: Option<(f32, f32)>,
    pub total_speed: f32,
}

/// Execute the water command.
pub fn execute(config_path: &Path, steps: Option<u32>, quiet: bool) -> CliResult<()> {
    let scenario = config::load(config_path)?.water;
    let steps = resolve_steps(steps, scenario.steps)?;

    if !quiet {
        println!(
            "{} {}x{} pool, {} steps",
            "Water:".bright_cyan().bold(),
            scenario.width,
            scenario.height,
            steps
        );
    }

    let start = Instant::now();
    let report = run(&scenario, steps, quiet)?;
    let elapsed = start.elapsed();

    if !quiet {
        println!("  {} {:.2?}", "Elapsed:".bright_white(), elapsed);
        println!(
            "  {} {:.3e} cells/s",
            "Throughput:".bright_white(),
            throughput(scenario.width as u64 * scenario.height as u64, steps, elapsed)
        );
        println!("  {} {}", "Dry cells:".bright_white(), report.dry_cells);
        match report.height_range {
            Some((lo, hi)) => {
                println!("  {} [{:.6}, {:.6}]", "Height:".bright_white(), lo, hi)
            }
            None => println!("  {} {}", "Height:".bright_white(), "no wet cells".yellow()),
        }
        println!("  {} {:.6}", "Speed sum:".bright_white(), report.total_speed);
    }

    Ok(())
}

/// Build the pool and advance it `steps` times.
pub fn run(scenario: &WaterConfig, steps: u32, quiet: bool) -> CliResult<WaterReport> {
    let params = scenario.params()?;
    if params.stiffness() > MAX_STIFFNESS {
        warn!(
            stiffness = params.stiffness(),
            "k * dt^2 is large; the surface may oscillate without bound"
        );
    }

    let mut field = scenario.build()?;
    let dry_cells = field
        .cells()
        .as_slice()
        .iter()
        .filter(|c| !c.is_wet())
        .count();
    debug!(dry_cells, "Pool ready");

    let pb = step_progress(steps as u64, quiet)?;
    for _ in 0..steps {
        field.step_with(&params);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(WaterReport {
        steps,
        dry_cells,
        height_range: field.height_range(),
        total_speed: field.total_speed(),
    })
}
