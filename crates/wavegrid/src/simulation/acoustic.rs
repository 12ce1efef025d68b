//! Acoustic pressure field with absorbing edges and wall obstacles.
//!
//! Second order in time: the next layer is computed from the current and
//! the previous layer, then the layers rotate. Each cell counts its live
//! four-connected neighbours `k`; missing neighbours (grid edge or solid
//! wall) contribute nothing to the sum and scale up the loss term instead:
//!
//! ```text
//! next = cfl * (1 / (1 + LF*(4-k))) * ((2 - k/2)*cur + sum/2 + (LF*(4-k) - 1)*prev)
//! ```

use tracing::{debug, info, warn};

use super::cell::{Direction, PressureCell};
use super::grid::Grid;
use super::physics::{validate_reflection, AcousticParams, WallMode};
use super::raster::{self, Point};
use crate::error::Result;

/// Grids at least this wide or tall are stepped row-parallel when the
/// `parallel` feature is enabled.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: u32 = 512;

/// A `width x height` acoustic pressure field.
///
/// Storage is allocated once in [`GridWaveField::new`]; stepping reuses the
/// same three layers forever.
#[derive(Debug, Clone, PartialEq)]
pub struct GridWaveField {
    params: AcousticParams,
    /// `(C * dt / dx)^2`, cached from `params`.
    cfl: f32,
    /// Current layer plus per-cell wall and reflection data.
    cells: Grid<PressureCell>,
    /// Layer immediately before `cells`.
    previous: Grid<f32>,
    /// Scratch layer for the step being computed.
    next: Grid<f32>,
    steps: u64,
}

impl GridWaveField {
    /// Create a quiet field.
    ///
    /// Fails with a configuration error for zero dimensions, non-positive
    /// physical parameters, a reflection coefficient outside `[0, 1]`, or
    /// `dt > dx / C`.
    pub fn new(width: u32, height: u32, params: AcousticParams) -> Result<Self> {
        params.validate()?;

        let cells = Grid::filled(width, height, PressureCell::new(params.reflection))?;
        let previous = Grid::filled(width, height, 0.0)?;
        let next = Grid::filled(width, height, 0.0)?;

        info!(
            width,
            height,
            courant = params.courant_number(),
            loss_factor = params.loss_factor(),
            wall_mode = ?params.wall_mode,
            "Created acoustic field"
        );
        if !params.within_2d_bound() {
            warn!(
                courant = params.courant_number(),
                "Courant number exceeds 1/sqrt(2); the 2D leap-frog update may grow without bound"
            );
        }

        Ok(Self {
            cfl: params.cfl_factor(),
            params,
            cells,
            previous,
            next,
            steps: 0,
        })
    }

    /// Grid width.
    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    /// Grid height.
    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    /// The parameters this field was built with.
    pub fn params(&self) -> &AcousticParams {
        &self.params
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance the field by one time step.
    pub fn step(&mut self) {
        #[cfg(feature = "parallel")]
        {
            if self.width() >= PARALLEL_THRESHOLD || self.height() >= PARALLEL_THRESHOLD {
                self.compute_next_parallel();
            } else {
                self.compute_next_sequential();
            }
        }

        #[cfg(not(feature = "parallel"))]
        self.compute_next_sequential();

        self.commit();
        self.steps += 1;
    }

    /// Advance the field by `count` steps.
    pub fn step_n(&mut self, count: u32) {
        for _ in 0..count {
            self.step();
        }
    }

    fn compute_next_sequential(&mut self) {
        let width = self.width() as usize;
        let (cfl, mode) = (self.cfl, self.params.wall_mode);
        let Self {
            cells,
            previous,
            next,
            ..
        } = self;

        for (y, row) in next.as_mut_slice().chunks_exact_mut(width).enumerate() {
            fill_row(cells, previous.as_slice(), y, row, cfl, mode);
        }
    }

    #[cfg(feature = "parallel")]
    fn compute_next_parallel(&mut self) {
        use rayon::prelude::*;

        let width = self.width() as usize;
        let (cfl, mode) = (self.cfl, self.params.wall_mode);
        let cells = &self.cells;
        let previous = self.previous.as_slice();

        self.next
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| fill_row(cells, previous, y, row, cfl, mode));
    }

    /// `previous <- current`, `current <- next`.
    fn commit(&mut self) {
        let cells = self.cells.as_mut_slice();
        let previous = self.previous.as_mut_slice();
        let next = self.next.as_slice();

        for ((cell, prev), &new) in cells.iter_mut().zip(previous.iter_mut()).zip(next) {
            *prev = cell.u;
            cell.u = new;
        }
    }

    /// Overwrite the current value at `(x, y)`.
    pub fn inject_source(&mut self, x: i32, y: i32, value: f32) -> Result<()> {
        self.cells.get_mut(x, y)?.u = value;
        Ok(())
    }

    /// Add `amplitude` to the current value at `(x, y)`.
    pub fn add_impulse(&mut self, x: i32, y: i32, amplitude: f32) -> Result<()> {
        self.cells.get_mut(x, y)?.u += amplitude;
        Ok(())
    }

    /// Rasterize a polyline into wall cells.
    ///
    /// Points of the line outside the grid are skipped. Returns the number
    /// of cells that were not walls before.
    pub fn place_walls(&mut self, waypoints: &[Point]) -> usize {
        if waypoints.len() < 2 {
            debug!(points = waypoints.len(), "Ignoring degenerate wall polyline");
            return 0;
        }

        let mut added = 0;
        for (x, y) in raster::polyline(waypoints) {
            if let Ok(cell) = self.cells.get_mut(x, y) {
                if !cell.wall {
                    cell.wall = true;
                    added += 1;
                }
            }
        }
        debug!(waypoints = waypoints.len(), added, "Placed wall polyline");
        added
    }

    /// Set or clear the wall flag of one cell.
    pub fn set_wall(&mut self, x: i32, y: i32, wall: bool) -> Result<()> {
        self.cells.get_mut(x, y)?.wall = wall;
        Ok(())
    }

    /// Override the reflection coefficient of one cell.
    pub fn set_reflection(&mut self, x: i32, y: i32, reflection: f32) -> Result<()> {
        validate_reflection(reflection)?;
        self.cells.get_mut(x, y)?.reflection = reflection;
        Ok(())
    }

    /// Remove every wall.
    pub fn clear_walls(&mut self) {
        for cell in self.cells.as_mut_slice() {
            cell.wall = false;
        }
    }

    /// Zero both time layers and the step counter. Walls and reflection
    /// overrides are kept.
    pub fn reset(&mut self) {
        for cell in self.cells.as_mut_slice() {
            cell.u = 0.0;
        }
        self.previous.fill(0.0);
        self.next.fill(0.0);
        self.steps = 0;
    }

    /// Bounds-checked read of one cell.
    pub fn cell(&self, x: i32, y: i32) -> Result<&PressureCell> {
        self.cells.get(x, y)
    }

    /// Bounds-checked mutable access to one cell.
    pub fn cell_mut(&mut self, x: i32, y: i32) -> Result<&mut PressureCell> {
        self.cells.get_mut(x, y)
    }

    /// Current value at `(x, y)`.
    pub fn value(&self, x: i32, y: i32) -> Result<f32> {
        Ok(self.cells.get(x, y)?.u)
    }

    /// Value at `(x, y)` one step ago.
    pub fn previous_value(&self, x: i32, y: i32) -> Result<f32> {
        Ok(*self.previous.get(x, y)?)
    }

    /// The whole current layer with wall and reflection data.
    pub fn cells(&self) -> &Grid<PressureCell> {
        &self.cells
    }

    /// Visit every cell in row-major order.
    pub fn for_each_cell<F>(&self, mut f: F)
    where
        F: FnMut(u32, u32, &PressureCell),
    {
        for (x, y, cell) in self.cells.iter_cells() {
            f(x, y, cell);
        }
    }

    /// `(min, max)` of the current values over all cells.
    pub fn sample_range(&self) -> (f32, f32) {
        self.cells
            .as_slice()
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.u), hi.max(c.u))
            })
    }

    /// Largest absolute value in the current layer.
    pub fn max_amplitude(&self) -> f32 {
        self.cells
            .as_slice()
            .iter()
            .map(|c| c.u.abs())
            .fold(0.0, f32::max)
    }

    /// Sum of squared current values.
    pub fn total_energy(&self) -> f32 {
        self.cells.as_slice().iter().map(|c| c.u * c.u).sum()
    }
}

/// Compute row `y` of the next layer into `out`.
#[inline]
fn fill_row(
    cells: &Grid<PressureCell>,
    previous: &[f32],
    y: usize,
    out: &mut [f32],
    cfl: f32,
    mode: WallMode,
) {
    let width = cells.width() as usize;
    let current = cells.as_slice();
    let solid = mode == WallMode::Solid;
    let row_start = y * width;

    for (x, slot) in out.iter_mut().enumerate() {
        let idx = row_start + x;
        let cell = &current[idx];

        if solid && cell.wall {
            *slot = cell.u;
            continue;
        }

        let mut live = 0u32;
        let mut sum = 0.0f32;
        for n in Direction::ALL.into_iter().filter_map(|dir| cells.neighbor(idx, dir)) {
            let neighbor = &current[n];
            if !(solid && neighbor.wall) {
                live += 1;
                sum += neighbor.u;
            }
        }

        let k = live as f32;
        let loss = cell.loss_factor() * (4.0 - k);
        let inv = 1.0 / (1.0 + loss);
        *slot = cfl * (inv * ((2.0 - 0.5 * k) * cell.u + 0.5 * sum + (loss - 1.0) * previous[idx]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// C = 100 m/s, dx = 1 m, dt = 5 ms: Courant 0.5, cfl factor 0.25.
    fn quarter_cfl(reflection: f32) -> AcousticParams {
        AcousticParams::new(100.0, 1.0, 0.005, reflection).unwrap()
    }

    #[test]
    fn test_field_creation() {
        let field = GridWaveField::new(8, 6, AcousticParams::default()).unwrap();
        assert_eq!(field.width(), 8);
        assert_eq!(field.height(), 6);
        assert_eq!(field.steps(), 0);
        assert_eq!(field.cell(3, 3).unwrap().reflection, 0.7);
        assert_eq!(field.sample_range(), (0.0, 0.0));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(GridWaveField::new(0, 8, AcousticParams::default()).is_err());
        let mut params = AcousticParams::default();
        params.time_step = 1.0;
        assert!(GridWaveField::new(8, 8, params).is_err());
    }

    #[test]
    fn test_interior_stencil_hand_computed() {
        let mut field = GridWaveField::new(3, 3, quarter_cfl(1.0)).unwrap();
        field.inject_source(1, 1, 1.0).unwrap();

        field.step();
        // Center: k = 4 -> 0.25 * (0*1 + 0.5*0 - 0) = 0
        assert!(field.value(1, 1).unwrap().abs() < 1e-7);
        // Edge: k = 3 -> 0.25 * (0.5*0 + 0.5*1 - 0) = 0.125
        assert!((field.value(1, 0).unwrap() - 0.125).abs() < 1e-6);
        assert!((field.value(0, 1).unwrap() - 0.125).abs() < 1e-6);
        // Corner: both neighbours quiet
        assert!(field.value(0, 0).unwrap().abs() < 1e-7);
        assert_eq!(field.previous_value(1, 1).unwrap(), 1.0);

        field.step();
        // Center: 0.25 * (0.5 * 4 * 0.125 - 1) = -0.1875
        assert!((field.value(1, 1).unwrap() + 0.1875).abs() < 1e-6);
    }

    #[test]
    fn test_loss_term_at_edge() {
        let params = quarter_cfl(0.0);
        let lf = params.loss_factor();
        let mut field = GridWaveField::new(3, 3, params).unwrap();
        field.inject_source(1, 1, 1.0).unwrap();
        field.step();

        // Edge (1, 0): k = 3, one missing neighbour.
        let expected = 0.25 * (1.0 / (1.0 + lf)) * 0.5;
        assert!((field.value(1, 0).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_solid_wall_keeps_value_and_blocks() {
        let mut field = GridWaveField::new(3, 1, quarter_cfl(1.0)).unwrap();
        field.set_wall(1, 0, true).unwrap();
        field.inject_source(1, 0, 2.0).unwrap();
        field.inject_source(0, 0, 1.0).unwrap();

        field.step();
        assert_eq!(field.value(1, 0).unwrap(), 2.0);
        // (2, 0) has no live neighbour: k = 0 and its own value is 0.
        assert_eq!(field.value(2, 0).unwrap(), 0.0);
        // (0, 0): k = 0 -> 0.25 * (2 * 1) = 0.5
        assert!((field.value(0, 0).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_visual_only_wall_is_stepped() {
        let params = quarter_cfl(1.0).with_wall_mode(WallMode::VisualOnly);
        let mut field = GridWaveField::new(3, 1, params).unwrap();
        field.set_wall(1, 0, true).unwrap();
        field.inject_source(0, 0, 1.0).unwrap();

        field.step();
        // Wall cell sees its west neighbour: k = 2 -> 0.25 * 0.5 * 1
        assert!((field.value(1, 0).unwrap() - 0.125).abs() < 1e-6);
        assert!(field.cell(1, 0).unwrap().wall);
    }

    #[test]
    fn test_place_walls_line() {
        let mut field = GridWaveField::new(5, 2, AcousticParams::default()).unwrap();
        let added = field.place_walls(&[(0, 0), (3, 0)]);
        assert_eq!(added, 4);

        let mut walls = Vec::new();
        field.for_each_cell(|x, y, cell| {
            if cell.wall {
                walls.push((x, y));
            }
        });
        assert_eq!(walls, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);

        // Re-placing adds nothing.
        assert_eq!(field.place_walls(&[(0, 0), (3, 0)]), 0);
    }

    #[test]
    fn test_place_walls_clips_outside_points() {
        let mut field = GridWaveField::new(4, 4, AcousticParams::default()).unwrap();
        let added = field.place_walls(&[(-2, 1), (6, 1)]);
        assert_eq!(added, 4);
        assert!(field.place_walls(&[(1, 1)]) == 0);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut field = GridWaveField::new(4, 4, AcousticParams::default()).unwrap();
        assert!(field.cell(-1, 0).unwrap_err().is_out_of_bounds());
        assert!(field.cell(4, 0).unwrap_err().is_out_of_bounds());
        assert!(field.inject_source(0, 4, 1.0).is_err());
        assert!(field.set_reflection(0, 0, 2.0).is_err());
        assert_eq!(field.cell(0, 0).unwrap().reflection, 0.7);
    }

    #[test]
    fn test_sample_range() {
        let mut field = GridWaveField::new(4, 4, AcousticParams::default()).unwrap();
        field.inject_source(1, 1, -0.5).unwrap();
        field.inject_source(2, 3, 0.75).unwrap();
        assert_eq!(field.sample_range(), (-0.5, 0.75));
        assert_eq!(field.max_amplitude(), 0.75);
    }

    #[test]
    fn test_reset_keeps_walls() {
        let mut field = GridWaveField::new(4, 4, AcousticParams::default()).unwrap();
        field.place_walls(&[(0, 2), (3, 2)]);
        field.add_impulse(1, 1, 1.0).unwrap();
        field.step();
        field.reset();

        assert_eq!(field.steps(), 0);
        assert_eq!(field.total_energy(), 0.0);
        assert!(field.cell(0, 2).unwrap().wall);

        field.clear_walls();
        assert!(!field.cell(0, 2).unwrap().wall);
    }

    #[test]
    fn test_wave_propagation() {
        let params = AcousticParams::with_stable_time_step(343.0, 1.0, 1.0).unwrap();
        let cfl = params.cfl_factor();
        let mut field = GridWaveField::new(16, 16, params).unwrap();
        field.add_impulse(8, 8, 1.0).unwrap();

        field.step();
        // Interior cells have a zero self term, so odd distances light up first.
        assert!((field.value(8, 9).unwrap() - cfl * 0.5).abs() < 1e-6);
        assert_eq!(field.value(8, 10).unwrap(), 0.0);

        field.step();
        assert_eq!(field.steps(), 2);
        let expected = cfl * 0.5 * (cfl * 0.5);
        assert!((field.value(8, 10).unwrap() - expected).abs() < 1e-6);
        assert_eq!(field.value(8, 9).unwrap(), 0.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let width = PARALLEL_THRESHOLD + 8;
        let mut parallel = GridWaveField::new(width, 8, quarter_cfl(0.6)).unwrap();
        parallel.place_walls(&[(20, 1), (300, 6)]);
        parallel.set_reflection(5, 5, 0.1).unwrap();
        parallel.inject_source(10, 4, 1.0).unwrap();
        parallel.inject_source(510, 2, -0.5).unwrap();
        let mut sequential = parallel.clone();

        for _ in 0..12 {
            parallel.step();

            sequential.compute_next_sequential();
            sequential.commit();
            sequential.steps += 1;

            assert_eq!(parallel, sequential);
        }
        assert!(parallel.max_amplitude() > 0.0);
    }
}
