//! Bresenham rasterization of wall polylines into grid cells.
//!
//! Coordinates are unbounded integers; clipping against a grid is left to
//! the caller so that a line may leave the grid and come back.

/// An integer cell coordinate `(x, y)`.
pub type Point = (i32, i32);

/// Iterator over the cells of a line segment, both endpoints included.
///
/// Uses the symmetric error-accumulator form, so every octant is handled
/// by the same loop and `line(a, b)` visits the same cells as `line(b, a)`
/// for axis-aligned and diagonal segments.
#[derive(Debug, Clone)]
pub struct Line {
    x: i32,
    y: i32,
    end: Point,
    dx: i64,
    dy: i64,
    sx: i32,
    sy: i32,
    err: i64,
    done: bool,
}

/// Rasterize the segment from `from` to `to`.
pub fn line(from: Point, to: Point) -> Line {
    let dx = (to.0 as i64 - from.0 as i64).abs();
    let dy = -(to.1 as i64 - from.1 as i64).abs();
    Line {
        x: from.0,
        y: from.1,
        end: to,
        dx,
        dy,
        sx: if from.0 < to.0 { 1 } else { -1 },
        sy: if from.1 < to.1 { 1 } else { -1 },
        err: dx + dy,
        done: false,
    }
}

impl Iterator for Line {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let current = (self.x, self.y);
        if current == self.end {
            self.done = true;
            return Some(current);
        }

        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(current)
    }
}

/// Rasterize every consecutive pair of `waypoints`.
///
/// Shared vertices are yielded once. Fewer than two waypoints yield nothing.
pub fn polyline(waypoints: &[Point]) -> impl Iterator<Item = Point> + '_ {
    waypoints
        .windows(2)
        .enumerate()
        .flat_map(|(i, pair)| line(pair[0], pair[1]).skip(if i == 0 { 0 } else { 1 }))
}
