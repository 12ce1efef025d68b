//! Excitation sources written into an acoustic field before each step.
//!
//! Supports various signal types:
//! - Impulse (single spike)
//! - Continuous tone (sinusoidal)
//! - Pulse train (repeating sine bursts)
//! - Gaussian pulse (smooth impulse)
//!
//! Signals are pure functions of elapsed time, so replaying a run with the
//! same sources reproduces it exactly.

use std::f64::consts::PI;

use serde::Deserialize;

use super::acoustic::GridWaveField;
use super::physics::AcousticParams;
use crate::error::{Result, WaveGridError};

/// Shape of a source signal over time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceSignal {
    /// Single spike during the first step.
    Impulse { amplitude: f32 },
    /// Continuous sinusoidal tone.
    Tone { frequency_hz: f32, amplitude: f32 },
    /// `cycles` sine periods, repeated every `period_s` seconds.
    PulseTrain {
        frequency_hz: f32,
        amplitude: f32,
        period_s: f32,
        cycles: u32,
    },
    /// Gaussian envelope centred on `center_time`.
    GaussianPulse {
        center_time: f32,
        sigma: f32,
        amplitude: f32,
    },
}

impl SourceSignal {
    /// Reject frequencies and widths that would make the signal undefined.
    pub fn validate(&self) -> Result<()> {
        match *self {
            SourceSignal::Impulse { .. } => Ok(()),
            SourceSignal::Tone { frequency_hz, .. } => positive("frequency_hz", frequency_hz),
            SourceSignal::PulseTrain {
                frequency_hz,
                period_s,
                ..
            } => {
                positive("frequency_hz", frequency_hz)?;
                if !period_s.is_finite() || period_s < 0.0 {
                    return Err(WaveGridError::config(format!(
                        "period_s must be non-negative and finite, got {}",
                        period_s
                    )));
                }
                Ok(())
            }
            SourceSignal::GaussianPulse { sigma, .. } => positive("sigma", sigma),
        }
    }

    /// Whether the signal drives its cell at local time `t`.
    pub fn is_active(&self, t: f64, time_step: f64) -> bool {
        if t < 0.0 {
            return false;
        }
        match *self {
            SourceSignal::Impulse { .. } => t < time_step,
            SourceSignal::Tone { .. } => true,
            SourceSignal::PulseTrain {
                frequency_hz,
                period_s,
                cycles,
                ..
            } => burst_phase(t, period_s as f64) < cycles as f64 / frequency_hz as f64,
            SourceSignal::GaussianPulse {
                center_time, sigma, ..
            } => (t - center_time as f64).abs() <= 4.0 * sigma as f64,
        }
    }

    /// Signal value at local time `t` (seconds since the source started).
    pub fn sample(&self, t: f64, time_step: f64) -> f32 {
        if !self.is_active(t, time_step) {
            return 0.0;
        }
        match *self {
            SourceSignal::Impulse { amplitude } => amplitude,
            SourceSignal::Tone {
                frequency_hz,
                amplitude,
            } => amplitude * (2.0 * PI * frequency_hz as f64 * t).sin() as f32,
            SourceSignal::PulseTrain {
                frequency_hz,
                amplitude,
                period_s,
                ..
            } => {
                let local = burst_phase(t, period_s as f64);
                amplitude * (2.0 * PI * frequency_hz as f64 * local).sin() as f32
            }
            SourceSignal::GaussianPulse {
                center_time,
                sigma,
                amplitude,
            } => {
                let z = (t - center_time as f64) / sigma as f64;
                amplitude * (-0.5 * z * z).exp() as f32
            }
        }
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WaveGridError::config(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

/// Time since the start of the current burst.
fn burst_phase(t: f64, period: f64) -> f64 {
    if period > 0.0 {
        t.rem_euclid(period)
    } else {
        t
    }
}

/// How a source value is combined with the cell it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InjectMode {
    /// Replace the cell value (hard source).
    #[default]
    Overwrite,
    /// Add to the cell value (soft source).
    Additive,
}

/// A signal attached to one cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointSource {
    pub x: i32,
    pub y: i32,
    pub signal: SourceSignal,
    /// Seconds before the signal starts.
    #[serde(default)]
    pub delay_s: f32,
    #[serde(default)]
    pub mode: InjectMode,
}

impl PointSource {
    /// Create an overwriting source with no delay.
    pub fn new(x: i32, y: i32, signal: SourceSignal) -> Self {
        Self {
            x,
            y,
            signal,
            delay_s: 0.0,
            mode: InjectMode::Overwrite,
        }
    }

    /// Delay the start of the signal.
    pub fn with_delay(mut self, delay_s: f32) -> Self {
        self.delay_s = delay_s;
        self
    }

    /// Select how the signal is injected.
    pub fn with_mode(mut self, mode: InjectMode) -> Self {
        self.mode = mode;
        self
    }

    /// Write this source into `field` for simulation time `time`.
    ///
    /// Inactive sources leave the field untouched.
    pub fn apply(&self, field: &mut GridWaveField, time: f64, time_step: f64) -> Result<()> {
        let local = time - self.delay_s as f64;
        if !self.signal.is_active(local, time_step) {
            // Still report a misplaced source.
            field.cell(self.x, self.y)?;
            return Ok(());
        }
        let value = self.signal.sample(local, time_step);
        match self.mode {
            InjectMode::Overwrite => field.inject_source(self.x, self.y, value),
            InjectMode::Additive => field.add_impulse(self.x, self.y, value),
        }
    }
}

/// A line of equally spaced emitters steered by per-element delays.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhasedArray {
    /// First element.
    pub origin: (i32, i32),
    /// Cell offset between consecutive elements.
    pub pitch: (i32, i32),
    /// Number of elements.
    pub elements: u32,
    /// Signal emitted by every element.
    pub signal: SourceSignal,
    /// Steering angle in radians, measured from the array normal.
    #[serde(default)]
    pub steer_angle: f32,
    #[serde(default)]
    pub mode: InjectMode,
}

impl PhasedArray {
    /// Expand into one delayed [`PointSource`] per element.
    ///
    /// Element `i` is delayed by `i * pitch * sin(angle) / C`, shifted so
    /// the earliest element starts at zero.
    pub fn sources(&self, params: &AcousticParams) -> Vec<PointSource> {
        let pitch_m = ((self.pitch.0 as f32).hypot(self.pitch.1 as f32)) * params.cell_size;
        let step_delay = pitch_m * self.steer_angle.sin() / params.speed_of_sound;
        let last = self.elements.saturating_sub(1) as f32;
        let shift = (step_delay * last).min(0.0);

        (0..self.elements)
            .map(|i| {
                let x = self.origin.0 + self.pitch.0 * i as i32;
                let y = self.origin.1 + self.pitch.1 * i as i32;
                PointSource::new(x, y, self.signal.clone())
                    .with_delay(step_delay * i as f32 - shift)
                    .with_mode(self.mode)
            })
            .collect()
    }
}

/// All sources driving one field.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    sources: Vec<PointSource>,
}

impl SourceSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single source.
    pub fn add(&mut self, source: PointSource) {
        self.sources.push(source);
    }

    /// Add every element of a phased array.
    pub fn add_array(&mut self, array: &PhasedArray, params: &AcousticParams) {
        self.sources.extend(array.sources(params));
    }

    /// Iterate over the sources.
    pub fn iter(&self) -> impl Iterator<Item = &PointSource> {
        self.sources.iter()
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True if there are no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Check every signal and position without touching a field.
    pub fn validate(&self, field: &GridWaveField) -> Result<()> {
        for source in &self.sources {
            source.signal.validate()?;
            field.cell(source.x, source.y)?;
        }
        Ok(())
    }

    /// Inject every source for the field's current simulation time
    /// (`steps * dt`).
    ///
    /// All sources are checked first, so an error leaves the field as it was.
    pub fn drive(&self, field: &mut GridWaveField) -> Result<()> {
        self.validate(field)?;
        let dt = field.params().time_step as f64;
        let time = field.steps() as f64 * dt;
        for source in &self.sources {
            source.apply(field, time, dt)?;
        }
        Ok(())
    }
}

impl FromIterator<PointSource> for SourceSet {
    fn from_iter<I: IntoIterator<Item = PointSource>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().collect(),
        }
    }
}
