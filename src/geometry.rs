//! Geometric primitives for projected data.
//!
//! `Point` lives in 2D (a planar view or screen space), `Point3` in data
//! space. `Grid` holds the equally-shaped X/Y/Z arrays used by surface and
//! wireframe plots.

use crate::error::{Error, Result};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation between two points.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Translate by `(-dx, -dy)`.
    #[must_use]
    pub fn offset_by(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x - dx, self.y - dy)
    }
}

/// A point in 3D data space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Point3 {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise difference.
    #[must_use]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Cross product.
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Unit vector in the same direction, or `+z` for a zero vector.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.dot(self).sqrt();
        if len < 1e-12 {
            Self::new(0.0, 0.0, 1.0)
        } else {
            Self::new(self.x / len, self.y / len, self.z / len)
        }
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: f32,
    /// Y coordinate of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Get the center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink by the given paddings.
    #[must_use]
    pub fn inset(&self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(
            self.x + left,
            self.y + top,
            (self.width - left - right).max(0.0),
            (self.height - top - bottom).max(0.0),
        )
    }
}

/// Equally-shaped X, Y and Z arrays describing a parametric surface.
///
/// Row `r`, column `c` is the vertex `(x[r][c], y[r][c], z[r][c])`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    x: Vec<Vec<f32>>,
    y: Vec<Vec<f32>>,
    z: Vec<Vec<f32>>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Build a grid, checking that all three arrays share one rectangular shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] for an empty grid and [`Error::GridShape`]
    /// for ragged or mismatched arrays.
    pub fn new(x: Vec<Vec<f32>>, y: Vec<Vec<f32>>, z: Vec<Vec<f32>>) -> Result<Self> {
        let rows = x.len();
        let cols = x.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyData);
        }

        for (name, array) in [("X", &x), ("Y", &y), ("Z", &z)] {
            if array.len() != rows {
                return Err(Error::GridShape(format!(
                    "{name} has {} rows, expected {rows}",
                    array.len()
                )));
            }
            if let Some((r, row)) = array.iter().enumerate().find(|(_, row)| row.len() != cols) {
                return Err(Error::GridShape(format!(
                    "{name} row {r} has {} columns, expected {cols}",
                    row.len()
                )));
            }
        }

        Ok(Self { x, y, z, rows, cols })
    }

    /// Build a grid by evaluating `f(x, y)` over the outer product of two ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] if either range is empty.
    pub fn from_fn(xs: &[f32], ys: &[f32], f: impl Fn(f32, f32) -> f32) -> Result<Self> {
        let x = ys.iter().map(|_| xs.to_vec()).collect();
        let y = ys.iter().map(|&yv| vec![yv; xs.len()]).collect();
        let z = ys
            .iter()
            .map(|&yv| xs.iter().map(|&xv| f(xv, yv)).collect())
            .collect();
        Self::new(x, y, z)
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Vertex at `(row, col)`.
    #[must_use]
    pub fn point(&self, row: usize, col: usize) -> Point3 {
        Point3::new(self.x[row][col], self.y[row][col], self.z[row][col])
    }

    /// The same surface with rows and columns swapped.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let t = |a: &Vec<Vec<f32>>| -> Vec<Vec<f32>> {
            (0..self.cols).map(|c| (0..self.rows).map(|r| a[r][c]).collect()).collect()
        };
        Self {
            x: t(&self.x),
            y: t(&self.y),
            z: t(&self.z),
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Row `r` as three coordinate slices.
    #[must_use]
    pub fn row(&self, r: usize) -> (&[f32], &[f32], &[f32]) {
        (&self.x[r], &self.y[r], &self.z[r])
    }

    /// Indices of every `step`-th row, always ending on the last row.
    #[must_use]
    pub fn row_indices(&self, step: usize) -> Vec<usize> {
        stride_indices(self.rows, step)
    }

    /// Indices of every `step`-th column, always ending on the last column.
    #[must_use]
    pub fn col_indices(&self, step: usize) -> Vec<usize> {
        stride_indices(self.cols, step)
    }

    /// The grid restricted to every `rstride`-th row and `cstride`-th column.
    #[must_use]
    pub fn strided(&self, rstride: usize, cstride: usize) -> Self {
        let rows = self.row_indices(rstride);
        let cols = self.col_indices(cstride);
        let pick = |a: &Vec<Vec<f32>>| -> Vec<Vec<f32>> {
            rows.iter().map(|&r| cols.iter().map(|&c| a[r][c]).collect()).collect()
        };
        Self {
            x: pick(&self.x),
            y: pick(&self.y),
            z: pick(&self.z),
            rows: rows.len(),
            cols: cols.len(),
        }
    }

    /// All vertices in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point3> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| self.point(r, c)))
    }
}

fn stride_indices(len: usize, step: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).step_by(step.max(1)).collect();
    if len > 0 && indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}
