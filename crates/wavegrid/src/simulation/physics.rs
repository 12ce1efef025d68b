//! Physical parameters and the coefficients derived from them.

use serde::Deserialize;

use crate::error::{Result, WaveGridError};

/// Tolerance applied to the `C * dt <= dx` check so that `dt = dx / C`
/// itself is accepted despite rounding.
const CFL_TOLERANCE: f32 = 1e-6;

/// Loss factor of the absorbing-boundary stencil for reflection coefficient `r`.
///
/// `LF = 0.5 * sqrt(0.5) * (1 - r) / (1 + r)`
#[inline]
pub fn loss_factor(reflection: f32) -> f32 {
    0.5 * std::f32::consts::FRAC_1_SQRT_2 * (1.0 - reflection) / (1.0 + reflection)
}

/// How cells flagged as walls take part in the acoustic update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WallMode {
    /// Walls are rigid obstacles: they keep their value and count as
    /// missing neighbours for adjacent cells.
    #[default]
    Solid,
    /// Walls are only drawn: they are stepped like any other cell and do
    /// not affect their neighbours.
    VisualOnly,
}

/// Parameters for the acoustic pressure field.
#[derive(Debug, Clone, PartialEq)]
pub struct AcousticParams {
    /// Speed of sound in m/s.
    pub speed_of_sound: f32,

    /// Cell size (spatial step) in meters.
    pub cell_size: f32,

    /// Time step in seconds.
    pub time_step: f32,

    /// Global reflection coefficient in `[0, 1]`; cells start with it and
    /// may override it individually.
    pub reflection: f32,

    /// Wall semantics.
    pub wall_mode: WallMode,
}

impl Default for AcousticParams {
    fn default() -> Self {
        Self {
            speed_of_sound: 343.0,
            cell_size: 2.9,
            time_step: 1.0 / 120.0,
            reflection: 0.7,
            wall_mode: WallMode::Solid,
        }
    }
}

impl AcousticParams {
    /// Create validated acoustic parameters.
    ///
    /// # Arguments
    /// * `speed_of_sound` - Speed of sound in m/s (343 m/s in air at 20°C)
    /// * `cell_size` - Spatial step in meters
    /// * `time_step` - Time step in seconds; must satisfy `dt <= dx / C`
    /// * `reflection` - Global reflection coefficient in `[0, 1]`
    pub fn new(speed_of_sound: f32, cell_size: f32, time_step: f32, reflection: f32) -> Result<Self> {
        let params = Self {
            speed_of_sound,
            cell_size,
            time_step,
            reflection,
            wall_mode: WallMode::Solid,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parameters whose time step is derived from the cell size with a 1.5x
    /// safety margin below `dx / C`.
    pub fn with_stable_time_step(speed_of_sound: f32, cell_size: f32, reflection: f32) -> Result<Self> {
        Self::new(
            speed_of_sound,
            cell_size,
            cell_size / (speed_of_sound * 1.5),
            reflection,
        )
    }

    /// Select the wall semantics.
    pub fn with_wall_mode(mut self, wall_mode: WallMode) -> Self {
        self.wall_mode = wall_mode;
        self
    }

    /// Check positivity, the reflection range, and the CFL condition.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("speed_of_sound", self.speed_of_sound),
            ("cell_size", self.cell_size),
            ("time_step", self.time_step),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(WaveGridError::config(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        validate_reflection(self.reflection)?;
        if !self.is_stable() {
            return Err(WaveGridError::config(format!(
                "CFL condition violated: dt = {} s exceeds dx / C = {} s (Courant number {:.4})",
                self.time_step,
                self.max_stable_time_step(),
                self.courant_number()
            )));
        }
        Ok(())
    }

    /// Compute the Courant number (c * dt / dx).
    pub fn courant_number(&self) -> f32 {
        self.speed_of_sound * self.time_step / self.cell_size
    }

    /// The `(C * dt / dx)^2` factor applied to the stencil.
    pub fn cfl_factor(&self) -> f32 {
        self.courant_number().powi(2)
    }

    /// Loss factor for the global reflection coefficient.
    pub fn loss_factor(&self) -> f32 {
        loss_factor(self.reflection)
    }

    /// True if `dt <= dx / C`.
    pub fn is_stable(&self) -> bool {
        self.courant_number() <= 1.0 + CFL_TOLERANCE
    }

    /// True if the Courant number is within the tighter 2D leap-frog bound
    /// of `1 / sqrt(2)`.
    pub fn within_2d_bound(&self) -> bool {
        self.courant_number() <= std::f32::consts::FRAC_1_SQRT_2
    }

    /// Largest time step satisfying `dt <= dx / C`.
    pub fn max_stable_time_step(&self) -> f32 {
        self.cell_size / self.speed_of_sound
    }
}

/// Reject reflection coefficients outside `[0, 1]`.
pub(crate) fn validate_reflection(reflection: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&reflection) {
        return Err(WaveGridError::config(format!(
            "reflection coefficient must be within [0, 1], got {}",
            reflection
        )));
    }
    Ok(())
}

/// Parameters for the damped water-surface field.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterParams {
    /// Time step in seconds.
    pub time_step: f32,
    /// Velocity half-life in seconds.
    pub half_life: f32,
    /// Propagation constant `k` in s^-2.
    pub propagation: f32,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 48_000.0,
            half_life: 0.07,
            propagation: propagation_constant(10.0, 0.001),
        }
    }
}

impl WaterParams {
    /// Create validated water parameters.
    pub fn new(time_step: f32, half_life: f32, propagation: f32) -> Result<Self> {
        let params = Self {
            time_step,
            half_life,
            propagation,
        };
        params.validate()?;
        Ok(params)
    }

    /// Derive the propagation constant from a wave speed and cell size.
    pub fn from_wave_speed(
        time_step: f32,
        half_life: f32,
        wave_speed: f32,
        cell_size: f32,
    ) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(WaveGridError::config(format!(
                "cell_size must be positive and finite, got {}",
                cell_size
            )));
        }
        Self::new(time_step, half_life, propagation_constant(wave_speed, cell_size))
    }

    /// Check that all parameters are positive and finite.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("time_step", self.time_step), ("half_life", self.half_life)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(WaveGridError::config(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if !self.propagation.is_finite() || self.propagation < 0.0 {
            return Err(WaveGridError::config(format!(
                "propagation constant must be non-negative and finite, got {}",
                self.propagation
            )));
        }
        Ok(())
    }

    /// Velocity multiplier applied every step: `0.5^(dt / half_life)`.
    pub fn damping_factor(&self) -> f32 {
        damping_factor(self.time_step, self.half_life)
    }

    /// `k * dt^2`; the explicit integrator stays bounded while this is at
    /// most 0.5.
    pub fn stiffness(&self) -> f32 {
        self.propagation * self.time_step * self.time_step
    }
}

/// `0.5^(dt / half_life)`.
#[inline]
pub fn damping_factor(time_step: f32, half_life: f32) -> f32 {
    0.5f32.powf(time_step / half_life)
}

/// Propagation constant `c^2 / s^2` for wave speed `c` and spacing `s`.
#[inline]
pub fn propagation_constant(wave_speed: f32, cell_size: f32) -> f32 {
    (wave_speed * wave_speed) / (cell_size * cell_size)
}
