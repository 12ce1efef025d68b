//! Damped height-field model of a water surface.
//!
//! Each wet cell is pulled towards its four neighbours with a force
//! weighted by the neighbour's wetness; velocities decay with a fixed
//! half-life. Dry cells (`wet == 0`) are holes: they never move and exert
//! no pull. Neighbours past the grid edge contribute nothing, so the edge
//! is open rather than mirrored.

use tracing::{debug, info};

use super::cell::{Direction, HeightCell};
use super::grid::Grid;
use super::physics::{damping_factor, WaterParams};
use super::raster::{self, Point};
use crate::error::{Result, WaveGridError};

/// A `width x height` water surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DampedHeightField {
    cells: Grid<HeightCell>,
    steps: u64,
}

impl DampedHeightField {
    /// Create a flat, fully wet surface.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let cells = Grid::new(width, height)?;
        info!(width, height, "Created height field");
        Ok(Self { cells, steps: 0 })
    }

    /// Grid width.
    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    /// Grid height.
    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance the surface by `dt` seconds.
    ///
    /// `half_life` is the time for an undisturbed velocity to halve and `k`
    /// the propagation constant (`c^2 / s^2`). All accelerations are
    /// computed before any position moves.
    pub fn step(&mut self, dt: f32, half_life: f32, k: f32) {
        let damp = damping_factor(dt, half_life);

        for idx in 0..self.cells.len() {
            let cells = self.cells.as_slice();
            let here = cells[idx];
            if !here.is_wet() {
                continue;
            }
            let sum: f32 = Direction::ALL
                .into_iter()
                .filter_map(|dir| self.cells.neighbor(idx, dir))
                .map(|n| cells[n].wet * (cells[n].pos - here.pos))
                .sum();
            self.cells.as_mut_slice()[idx].acc = k * sum;
        }

        for cell in self.cells.as_mut_slice().iter_mut().filter(|c| c.is_wet()) {
            cell.vel = damp * cell.vel + dt * cell.acc;
            cell.pos += dt * cell.vel;
        }

        self.steps += 1;
    }

    /// Advance using validated parameters.
    pub fn step_with(&mut self, params: &WaterParams) {
        self.step(params.time_step, params.half_life, params.propagation);
    }

    /// Bounds-checked read of one cell.
    pub fn cell(&self, x: i32, y: i32) -> Result<&HeightCell> {
        self.cells.get(x, y)
    }

    /// Bounds-checked mutable access, used to inject impulses.
    pub fn cell_mut(&mut self, x: i32, y: i32) -> Result<&mut HeightCell> {
        self.cells.get_mut(x, y)
    }

    /// Set the wetness of one cell; 0 makes it a static barrier.
    pub fn set_wet(&mut self, x: i32, y: i32, wet: f32) -> Result<()> {
        if !wet.is_finite() || wet < 0.0 {
            return Err(WaveGridError::config(format!(
                "wetness must be non-negative and finite, got {}",
                wet
            )));
        }
        self.cells.get_mut(x, y)?.wet = wet;
        Ok(())
    }

    /// Overwrite the velocity of one cell.
    pub fn set_velocity(&mut self, x: i32, y: i32, vel: f32) -> Result<()> {
        self.cells.get_mut(x, y)?.vel = vel;
        Ok(())
    }

    /// Rasterize a polyline into dry cells. Returns how many cells dried.
    pub fn carve_barrier(&mut self, waypoints: &[Point]) -> usize {
        if waypoints.len() < 2 {
            debug!(points = waypoints.len(), "Ignoring degenerate barrier polyline");
            return 0;
        }

        let mut dried = 0;
        for (x, y) in raster::polyline(waypoints) {
            if let Ok(cell) = self.cells.get_mut(x, y) {
                if cell.is_wet() {
                    cell.wet = 0.0;
                    dried += 1;
                }
            }
        }
        debug!(waypoints = waypoints.len(), dried, "Carved barrier");
        dried
    }

    /// The whole surface.
    pub fn cells(&self) -> &Grid<HeightCell> {
        &self.cells
    }

    /// Visit every cell in row-major order.
    pub fn for_each_cell<F>(&self, mut f: F)
    where
        F: FnMut(u32, u32, &HeightCell),
    {
        for (x, y, cell) in self.cells.iter_cells() {
            f(x, y, cell);
        }
    }

    /// `(min, max)` height over wet cells, or `None` if every cell is dry.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        self.cells
            .as_slice()
            .iter()
            .filter(|c| c.is_wet())
            .fold(None, |range, c| match range {
                None => Some((c.pos, c.pos)),
                Some((lo, hi)) => Some((lo.min(c.pos), hi.max(c.pos))),
            })
    }

    /// Sum of `|vel|` over all cells.
    pub fn total_speed(&self) -> f32 {
        self.cells.as_slice().iter().map(|c| c.vel.abs()).sum()
    }

    /// Flatten the surface and stop all motion. Barriers are kept.
    pub fn reset(&mut self) {
        for cell in self.cells.as_mut_slice() {
            cell.pos = 0.0;
            cell.vel = 0.0;
            cell.acc = 0.0;
        }
        self.steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cells() {
        let field = DampedHeightField::new(4, 3).unwrap();
        assert_eq!(field.width(), 4);
        assert_eq!(field.height(), 3);
        field.for_each_cell(|_, _, cell| assert_eq!(*cell, HeightCell::default()));
        assert!(DampedHeightField::new(0, 3).is_err());
    }

    #[test]
    fn test_two_cell_coupling() {
        let mut field = DampedHeightField::new(2, 1).unwrap();
        field.cell_mut(0, 0).unwrap().pos = 1.0;

        // Half-life so long the damping factor rounds to 1.
        field.step(0.1, 1.0e9, 1.0);

        let left = *field.cell(0, 0).unwrap();
        let right = *field.cell(1, 0).unwrap();
        assert!((left.acc + 1.0).abs() < 1e-6);
        assert!((right.acc - 1.0).abs() < 1e-6);
        assert!((left.vel + 0.1).abs() < 1e-6);
        assert!((left.pos - 0.99).abs() < 1e-6);
        assert!((right.pos - 0.01).abs() < 1e-6);
        assert!((left.pos + right.pos - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_open_edge() {
        let mut field = DampedHeightField::new(1, 1).unwrap();
        field.cell_mut(0, 0).unwrap().pos = 1.0;
        field.step(0.01, 0.1, 100.0);
        let cell = field.cell(0, 0).unwrap();
        assert_eq!(cell.acc, 0.0);
        assert_eq!(cell.pos, 1.0);
    }

    #[test]
    fn test_dry_cells_immutable() {
        let mut field = DampedHeightField::new(3, 1).unwrap();
        field.set_wet(1, 0, 0.0).unwrap();
        {
            let dry = field.cell_mut(1, 0).unwrap();
            dry.pos = 0.5;
            dry.vel = 2.0;
            dry.acc = 3.0;
        }
        field.cell_mut(0, 0).unwrap().pos = 1.0;

        field.step(0.01, 0.1, 100.0);

        let dry = field.cell(1, 0).unwrap();
        assert_eq!((dry.pos, dry.vel, dry.acc), (0.5, 2.0, 3.0));
        // Dry neighbour exerts no pull on either side.
        assert_eq!(field.cell(0, 0).unwrap().acc, 0.0);
        assert_eq!(field.cell(2, 0).unwrap().acc, 0.0);
    }

    #[test]
    fn test_carve_barrier() {
        let mut field = DampedHeightField::new(6, 6).unwrap();
        assert_eq!(field.carve_barrier(&[(1, 3), (4, 3)]), 4);
        assert_eq!(field.cell(2, 3).unwrap().wet, 0.0);
        assert_eq!(field.cell(2, 2).unwrap().wet, 1.0);
        assert_eq!(field.carve_barrier(&[(0, 0)]), 0);
    }

    #[test]
    fn test_set_wet_validation() {
        let mut field = DampedHeightField::new(2, 2).unwrap();
        assert!(field.set_wet(0, 0, -1.0).is_err());
        assert!(field.set_wet(2, 0, 0.0).unwrap_err().is_out_of_bounds());
        assert_eq!(field.cell(0, 0).unwrap().wet, 1.0);
    }

    #[test]
    fn test_height_range_and_reset() {
        let mut field = DampedHeightField::new(3, 3).unwrap();
        field.set_velocity(1, 1, 10.0).unwrap();
        field.step(0.01, 0.1, 100.0);
        let (lo, hi) = field.height_range().unwrap();
        assert!(hi > 0.0);
        assert!(lo <= hi);
        assert!(field.total_speed() > 0.0);

        field.reset();
        assert_eq!(field.height_range(), Some((0.0, 0.0)));
        assert_eq!(field.total_speed(), 0.0);
        assert_eq!(field.steps(), 0);
    }

    #[test]
    fn test_height_range_all_dry() {
        let mut field = DampedHeightField::new(2, 1).unwrap();
        field.set_wet(0, 0, 0.0).unwrap();
        field.set_wet(1, 0, 0.0).unwrap();
        assert_eq!(field.height_range(), None);
    }
}
