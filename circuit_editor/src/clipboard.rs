//! Clipboard buffer and geometric transforms

use circuit_types::CellFlags;

/// Rectangular snapshot of raw cell flags
///
/// Coordinates are local to the buffer. The buffer is independent of the
/// live grid; pastes clip against the grid at paste time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardBuffer {
    width: usize,
    height: usize,
    cells: Vec<CellFlags>,
}

impl ClipboardBuffer {
    /// Creates an empty 0×0 buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer of empty cells
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellFlags::empty(); width * height],
        }
    }

    /// Creates a buffer from row-major cells
    ///
    /// Returns `None` if `cells` does not hold exactly `width * height` cells.
    pub fn from_cells(width: usize, height: usize, cells: Vec<CellFlags>) -> Option<Self> {
        if width.checked_mul(height)? != cells.len() {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major cells
    pub fn cells(&self) -> &[CellFlags] {
        &self.cells
    }

    pub fn get(&self, x: usize, y: usize) -> Option<CellFlags> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Overwrites one cell; returns false when out of range
    pub fn set(&mut self, x: usize, y: usize, flags: CellFlags) -> bool {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = flags;
            true
        } else {
            false
        }
    }

    /// Resizes in place
    ///
    /// The overlapping top-left region is kept; new cells are empty.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        let mut cells = vec![CellFlags::empty(); width * height];
        for y in 0..self.height.min(height) {
            for x in 0..self.width.min(width) {
                cells[y * width + x] = self.cells[y * self.width + x];
            }
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
    }

    /// Mirrors left to right: `new[y][x] = old[y][w-1-x]`
    pub fn flip_horizontal(&mut self) {
        let old = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                self.cells[y * self.width + x] = old.cells[y * old.width + (old.width - 1 - x)];
            }
        }
    }

    /// Mirrors top to bottom: `new[y][x] = old[h-1-y][x]`
    pub fn flip_vertical(&mut self) {
        let old = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                self.cells[y * self.width + x] = old.cells[(old.height - 1 - y) * old.width + x];
            }
        }
    }

    /// Rotates a quarter turn counter-clockwise: `new[y][x] = old[x][w_old-1-y]`
    pub fn rotate_ccw(&mut self) {
        let old = self.clone();
        self.width = old.height;
        self.height = old.width;
        for y in 0..self.height {
            for x in 0..self.width {
                self.cells[y * self.width + x] = old.cells[x * old.width + (old.width - 1 - y)];
            }
        }
    }

    /// Rotates a quarter turn clockwise: `new[y][x] = old[h_old-1-x][y]`
    pub fn rotate_cw(&mut self) {
        let old = self.clone();
        self.width = old.height;
        self.height = old.width;
        for y in 0..self.height {
            for x in 0..self.width {
                self.cells[y * self.width + x] = old.cells[(old.height - 1 - x) * old.width + y];
            }
        }
    }
}
