//! Flat, row-major storage shared by both field variants.
//!
//! All coordinate checks live here: the field types only ever reach their
//! cells through [`Grid::index`] or through indices this module produced.

use super::cell::Direction;
use crate::error::{Result, WaveGridError};

/// A fixed-size `width x height` array of cells stored in a single buffer.
///
/// Cell `(x, y)` lives at `y * width + x`. Dimensions are positive and never
/// change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(WaveGridError::config(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let size = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                WaveGridError::config(format!("grid {}x{} is too large", width, height))
            })?;

        Ok(Self {
            width,
            height,
            cells: vec![value; size],
        })
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Create a grid of default-initialized cells.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, T::default())
    }
}

impl<T> Grid<T> {
    /// Number of columns.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the grid holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if `(x, y)` addresses a cell of this grid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Convert `(x, y)` to a linear index, failing outside the grid.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Result<usize> {
        if self.contains(x, y) {
            Ok(y as usize * self.width as usize + x as usize)
        } else {
            Err(WaveGridError::out_of_bounds(
                x as i64,
                y as i64,
                self.width,
                self.height,
            ))
        }
    }

    /// Index of the neighbour of `idx` in `dir`, or `None` past the edge.
    #[inline]
    pub fn neighbor(&self, idx: usize, dir: Direction) -> Option<usize> {
        let w = self.width as usize;
        let (x, y) = (idx % w, idx / w);
        match dir {
            Direction::North if y > 0 => Some(idx - w),
            Direction::South if y + 1 < self.height as usize => Some(idx + w),
            Direction::West if x > 0 => Some(idx - 1),
            Direction::East if x + 1 < w => Some(idx + 1),
            _ => None,
        }
    }

    /// Bounds-checked shared access.
    pub fn get(&self, x: i32, y: i32) -> Result<&T> {
        let idx = self.index(x, y)?;
        Ok(&self.cells[idx])
    }

    /// Bounds-checked mutable access.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Result<&mut T> {
        let idx = self.index(x, y)?;
        Ok(&mut self.cells[idx])
    }

    /// The cells in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Mutable cells in row-major order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Iterate `(x, y, cell)` in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u32, &T)> + '_ {
        let w = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| ((i % w) as u32, (i / w) as u32, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid: Grid<f32> = Grid::new(8, 4).unwrap();
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.len(), 32);
        assert!(!grid.is_empty());
        assert!(grid.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(Grid::<f32>::new(0, 4).is_err());
        assert!(Grid::<f32>::new(4, 0).is_err());
    }

    #[test]
    fn test_row_major_index() {
        let grid: Grid<u8> = Grid::new(5, 3).unwrap();
        assert_eq!(grid.index(0, 0).unwrap(), 0);
        assert_eq!(grid.index(4, 0).unwrap(), 4);
        assert_eq!(grid.index(0, 1).unwrap(), 5);
        assert_eq!(grid.index(2, 2).unwrap(), 12);
    }

    #[test]
    fn test_out_of_bounds() {
        let grid: Grid<u8> = Grid::new(5, 3).unwrap();
        assert!(grid.index(-1, 0).unwrap_err().is_out_of_bounds());
        assert!(grid.index(5, 0).unwrap_err().is_out_of_bounds());
        assert!(grid.index(0, 3).unwrap_err().is_out_of_bounds());
        assert!(grid.get(0, -1).is_err());
    }

    #[test]
    fn test_neighbors_at_edges() {
        let grid: Grid<u8> = Grid::new(3, 3).unwrap();
        let corner = grid.index(0, 0).unwrap();
        assert_eq!(grid.neighbor(corner, Direction::North), None);
        assert_eq!(grid.neighbor(corner, Direction::West), None);
        assert_eq!(grid.neighbor(corner, Direction::East), Some(1));
        assert_eq!(grid.neighbor(corner, Direction::South), Some(3));

        let center = grid.index(1, 1).unwrap();
        for dir in Direction::ALL {
            assert!(grid.neighbor(center, dir).is_some());
        }

        let last = grid.index(2, 2).unwrap();
        assert_eq!(grid.neighbor(last, Direction::South), None);
        assert_eq!(grid.neighbor(last, Direction::East), None);
    }

    #[test]
    fn test_iter_cells() {
        let mut grid: Grid<u32> = Grid::new(3, 2).unwrap();
        *grid.get_mut(2, 1).unwrap() = 7;
        let found: Vec<_> = grid
            .iter_cells()
            .filter(|(_, _, &v)| v == 7)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(found, vec![(2, 1)]);
    }
}
