//! Raster import
//!
//! Bulk-loads a circuit from decoded per-pixel RGB tuples. Decoding image
//! files is the host's job; this module only validates dimensions and maps
//! colours to cell flags.

use circuit_types::{CellFlags, GridSize, Rgb, MIN_DIMENSION, SIGNAL_SHIFT};
use thiserror::Error;

/// Import errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Image {width}x{height} is smaller than the minimum grid")]
    TooSmall { width: usize, height: usize },

    #[error("Expected {expected} pixels, got {actual}")]
    PixelCountMismatch { expected: usize, actual: usize },

    #[error("RGBA buffer of {len} bytes is not a whole number of pixels")]
    TruncatedRgba { len: usize },
}

/// Decoded raster, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl RasterImage {
    /// Wraps decoded pixels after checking they fill `width × height`
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self, ImportError> {
        if width == 0 || height == 0 {
            return Err(ImportError::EmptyImage);
        }
        let expected = width.checked_mul(height).unwrap_or(usize::MAX);
        if pixels.len() != expected {
            return Err(ImportError::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a raster from packed RGBA bytes, dropping alpha
    pub fn from_rgba(width: usize, height: usize, bytes: &[u8]) -> Result<Self, ImportError> {
        if bytes.len() % 4 != 0 {
            return Err(ImportError::TruncatedRgba { len: bytes.len() });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Fails with [`ImportError::TooSmall`] if the raster cannot be a grid
    pub fn check_grid_size(&self) -> Result<GridSize, ImportError> {
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Err(ImportError::TooSmall {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.size())
    }
}

/// Cell state decoded from one pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelClass {
    pub flags: CellFlags,
    /// The pixel marks a goal cell
    pub goal: bool,
}

/// Maps a pixel colour to cell flags
///
/// | Colour | Cell |
/// |---|---|
/// | `b == 255` | plain wire |
/// | `r == 255`, `g >= 128` | energized wire, level from `b` |
/// | `r >= 128`, `g == 0` | goal wire, level from `b` |
/// | anything else | empty |
///
/// `g == 255`, dark green `(r <= 32, g == 128, b <= 32)` and goal colours
/// are protected.
pub fn classify_pixel(pixel: Rgb) -> PixelClass {
    let Rgb { r, g, b } = pixel;
    let signal = CellFlags::from_bits(b << SIGNAL_SHIFT) & CellFlags::SIGNAL;
    let is_goal = r >= 128 && g == 0;

    let mut flags = if b == 255 {
        CellFlags::WIRE
    } else if r == 255 && g >= 128 {
        CellFlags::WIRE | signal
    } else if is_goal {
        CellFlags::WIRE | signal | CellFlags::GOAL
    } else {
        CellFlags::EMPTY
    };

    if g == 255 || (r <= 32 && b <= 32 && g == 128) || is_goal {
        flags.insert(CellFlags::PROTECTED);
    }

    PixelClass {
        flags,
        goal: flags.is_goal(),
    }
}
