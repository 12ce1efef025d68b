//! Scenario configuration loaded from TOML.
//!
//! Every field is optional; missing fields take the defaults of the
//! reference scenarios (a 100x100 room at 343 m/s and a 250x250 pool with
//! two barriers). Omitted sources, trace cell, barriers and impulses are placed
//! relative to the configured grid size, so shrinking a grid keeps them
//! inside it.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, WaveGridError};
use crate::simulation::{
    AcousticParams, DampedHeightField, GridWaveField, PhasedArray, Point, PointSource,
    SourceSet, SourceSignal, WallMode, WaterParams,
};

/// Default scenario file name.
pub const DEFAULT_CONFIG_FILE: &str = "wavegrid.toml";

/// Top-level scenario file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub acoustic: AcousticConfig,
    pub water: WaterConfig,
}

/// Acoustic room scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AcousticConfig {
    pub width: u32,
    pub height: u32,
    pub speed_of_sound: f32,
    pub cell_size: f32,
    pub time_step: f32,
    pub reflection: f32,
    pub wall_mode: WallMode,
    pub steps: u32,
    /// Wall polylines.
    pub walls: Vec<Vec<Point>>,
    /// Point sources; a single pulse train at the centre when omitted.
    pub sources: Option<Vec<PointSource>>,
    pub arrays: Vec<PhasedArray>,
    /// Cell recorded every step; three quarters across the middle row
    /// when omitted.
    pub probe: Option<Point>,
}

impl Default for AcousticConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            speed_of_sound: 343.0,
            cell_size: 2.9,
            time_step: 1.0 / 120.0,
            reflection: 0.7,
            wall_mode: WallMode::Solid,
            steps: 600,
            walls: Vec::new(),
            sources: None,
            arrays: Vec::new(),
            probe: None,
        }
    }
}

impl AcousticConfig {
    /// Validated physical parameters.
    pub fn params(&self) -> Result<AcousticParams> {
        Ok(
            AcousticParams::new(
                self.speed_of_sound,
                self.cell_size,
                self.time_step,
                self.reflection,
            )?
            .with_wall_mode(self.wall_mode),
        )
    }

    /// Configured point sources, or the default centred pulse train.
    pub fn point_sources(&self) -> Vec<PointSource> {
        match &self.sources {
            Some(sources) => sources.clone(),
            None => vec![PointSource::new(
                (self.width / 2) as i32,
                (self.height / 2) as i32,
                SourceSignal::PulseTrain {
                    frequency_hz: 15.0,
                    amplitude: 1.0,
                    period_s: 1.0,
                    cycles: 1,
                },
            )],
        }
    }

    /// Configured trace cell, or the default one.
    pub fn trace_cell(&self) -> Point {
        self.probe
            .unwrap_or(((self.width * 3 / 4) as i32, (self.height / 2) as i32))
    }

    /// Build the field with its walls, and the sources that drive it.
    pub fn build(&self) -> Result<(GridWaveField, SourceSet)> {
        let params = self.params()?;
        let mut field = GridWaveField::new(self.width, self.height, params.clone())?;
        for wall in &self.walls {
            field.place_walls(wall);
        }

        let mut sources: SourceSet = self.point_sources().into_iter().collect();
        for array in &self.arrays {
            sources.add_array(array, &params);
        }
        sources.validate(&field)?;
        Ok((field, sources))
    }
}

/// A velocity kick applied to one water cell before the run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Impulse {
    pub x: i32,
    pub y: i32,
    pub velocity: f32,
}

/// Water pool scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    pub width: u32,
    pub height: u32,
    pub time_step: f32,
    pub half_life: f32,
    /// Wave speed in m/s.
    pub wave_speed: f32,
    /// Cell spacing in meters.
    pub cell_size: f32,
    pub steps: u32,
    /// Polylines carved into dry cells; two horizontal lines across the
    /// middle when omitted.
    pub barriers: Option<Vec<Vec<Point>>>,
    /// Velocity kicks; one at the centre when omitted.
    pub impulses: Option<Vec<Impulse>>,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            width: 250,
            height: 250,
            time_step: 1.0 / 48_000.0,
            half_life: 0.07,
            wave_speed: 10.0,
            cell_size: 0.001,
            steps: 2000,
            barriers: None,
            impulses: None,
        }
    }
}

impl WaterConfig {
    /// Validated physical parameters.
    pub fn params(&self) -> Result<WaterParams> {
        WaterParams::from_wave_speed(
            self.time_step,
            self.half_life,
            self.wave_speed,
            self.cell_size,
        )
    }

    /// Configured barriers, or the default pair scaled to the pool.
    ///
    /// On the 250x250 pool these are rows 118 and 142, spanning columns
    /// 30..=239 and 17..=226.
    pub fn barrier_lines(&self) -> Vec<Vec<Point>> {
        if let Some(barriers) = &self.barriers {
            return barriers.clone();
        }
        let scale = |n: i64, extent: u32| (extent as i64 * n / 250) as i32;
        let (w, h) = (self.width, self.height);
        vec![
            vec![(scale(30, w), scale(118, h)), (scale(239, w), scale(118, h))],
            vec![(scale(17, w), scale(142, h)), (scale(226, w), scale(142, h))],
        ]
    }

    /// Configured impulses, or one at the centre of the pool.
    pub fn initial_impulses(&self) -> Vec<Impulse> {
        match &self.impulses {
            Some(impulses) => impulses.clone(),
            None => vec![Impulse {
                x: (self.width / 2) as i32,
                y: (self.height / 2) as i32,
                velocity: 50_000.0,
            }],
        }
    }

    /// Build the pool with barriers carved and impulses applied.
    pub fn build(&self) -> Result<DampedHeightField> {
        let impulses = self.initial_impulses();
        let mut field = DampedHeightField::new(self.width, self.height)?;
        for impulse in &impulses {
            field.cell(impulse.x, impulse.y)?;
        }
        for barrier in &self.barrier_lines() {
            field.carve_barrier(barrier);
        }
        for impulse in &impulses {
            field.set_velocity(impulse.x, impulse.y, impulse.velocity)?;
        }
        Ok(field)
    }
}

/// Parse a scenario from TOML text.
pub fn from_str(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| WaveGridError::config(e.to_string()))
}

/// Load a scenario file, falling back to defaults when it does not exist.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!(path = %path.display(), "No scenario file, using defaults");
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path)?;
    from_str(&text).map_err(|e| match e {
        WaveGridError::Configuration(msg) => {
            WaveGridError::config(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}
