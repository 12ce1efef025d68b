//! # WaveGrid
//!
//! Finite-difference simulation of 2D wave fields on regular grids.
//!
//! Two variants share the same grid and rasterization code:
//!
//! - [`GridWaveField`]: acoustic pressure with a leap-frog stencil,
//!   reflective walls and per-cell absorption.
//! - [`DampedHeightField`]: a water surface where each cell is pulled
//!   towards its wet neighbours and velocities decay with a half-life.
//!
//! Walls and barriers are drawn with Bresenham polylines, sources are
//! time functions injected before each step, and a probe can record a
//! [`PressureTrace`].
//!
//! ```
//! use wavegrid::{AcousticParams, GridWaveField};
//!
//! let mut field = GridWaveField::new(64, 64, AcousticParams::default())?;
//! field.place_walls(&[(10, 5), (10, 50)]);
//! field.inject_source(32, 32, 1.0)?;
//! field.step_n(10);
//! assert!(field.max_amplitude() > 0.0);
//! # Ok::<(), wavegrid::WaveGridError>(())
//! ```
//!
//! Enable the `parallel` feature to step large acoustic grids row-parallel
//! on the rayon thread pool.

pub mod config;
pub mod error;
pub mod simulation;
pub mod trace;

pub use config::Config;
pub use error::{Result, WaveGridError};
pub use simulation::{
    AcousticParams, DampedHeightField, Direction, Grid, GridWaveField, HeightCell, InjectMode,
    PhasedArray, Point, PointSource, PressureCell, SourceSet, SourceSignal, WallMode, WaterParams,
};
pub use trace::PressureTrace;
