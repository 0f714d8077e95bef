//! Grid coordinates and bounds

use core::fmt;
use serde::{Deserialize, Serialize};

/// Smallest width or height a grid may have (a one-cell border on each side
/// plus at least one interior cell).
pub const MIN_DIMENSION: usize = 3;

/// A validated grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Returns true if both dimensions are at least [`MIN_DIMENSION`]
    pub const fn is_valid(&self) -> bool {
        self.width >= MIN_DIMENSION && self.height >= MIN_DIMENSION
    }

    /// Total number of cells, `None` on overflow
    pub fn cell_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Validates a raw coordinate against `[0, width) × [0, height)`
    pub fn coord(&self, x: i32, y: i32) -> Option<Coord> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x < self.width && y < self.height {
            Some(Coord::new(x, y))
        } else {
            None
        }
    }

    /// Validates a raw coordinate against the interior, leaving a one-cell
    /// margin on every border
    pub fn interior_coord(&self, x: i32, y: i32) -> Option<Coord> {
        self.coord(x, y).filter(|coord| self.is_interior(*coord))
    }

    /// Returns true if the coordinate is inside the grid
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Returns true if the coordinate is off the one-cell border
    pub const fn is_interior(&self, coord: Coord) -> bool {
        coord.x >= 1
            && coord.y >= 1
            && coord.x + 1 < self.width
            && coord.y + 1 < self.height
    }

    /// Row-major index of a coordinate
    ///
    /// The coordinate must already be inside the grid.
    pub const fn index(&self, coord: Coord) -> usize {
        coord.y * self.width + coord.x
    }

    /// Iterates over every coordinate in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
