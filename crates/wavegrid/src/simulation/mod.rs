//! Simulation core for 2D wave fields.

mod acoustic;
mod cell;
mod grid;
mod physics;
mod source;
mod water;

// Wall and barrier rasterization
pub mod raster;

pub use acoustic::GridWaveField;
pub use cell::{Direction, HeightCell, PressureCell};
pub use grid::Grid;
pub use physics::{
    damping_factor, loss_factor, propagation_constant, AcousticParams, WallMode, WaterParams,
};
pub use raster::{line, polyline, Point};
pub use source::{InjectMode, PhasedArray, PointSource, SourceSet, SourceSignal};
pub use water::DampedHeightField;
