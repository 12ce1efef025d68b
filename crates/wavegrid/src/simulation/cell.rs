//! Per-cell state for the acoustic and water-surface fields.

use super::physics::loss_factor;

/// Direction to a neighboring cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All four cardinal directions.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];
}

/// State for a single cell of the acoustic pressure field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureCell {
    /// Current pressure value.
    pub u: f32,
    /// True if this cell is a wall (see [`WallMode`](super::WallMode)).
    pub wall: bool,
    /// Reflection coefficient used for this cell's loss term
    /// (1 = no loss, 0 = strongest absorption).
    pub reflection: f32,
}

impl PressureCell {
    /// Create a quiet, open cell with the given reflection coefficient.
    pub fn new(reflection: f32) -> Self {
        Self {
            u: 0.0,
            wall: false,
            reflection,
        }
    }

    /// Loss factor derived from this cell's reflection coefficient.
    #[inline]
    pub fn loss_factor(&self) -> f32 {
        loss_factor(self.reflection)
    }
}

/// State for a single column of water in the height field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightCell {
    /// Wetness: 0 marks a dry, inert cell; positive values weight the
    /// coupling this cell exerts on its neighbours.
    pub wet: f32,
    /// Height displacement.
    pub pos: f32,
    /// Vertical velocity.
    pub vel: f32,
    /// Acceleration scratch, recomputed every step.
    pub acc: f32,
}

impl Default for HeightCell {
    fn default() -> Self {
        Self {
            wet: 1.0,
            pos: 0.0,
            vel: 0.0,
            acc: 0.0,
        }
    }
}

impl HeightCell {
    /// True if the cell takes part in the dynamics.
    #[inline]
    pub fn is_wet(&self) -> bool {
        self.wet > 0.0
    }
}
