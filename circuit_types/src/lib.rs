#![no_std]

//! # Circuit Types
//!
//! This crate defines the vocabulary shared between the circuit editor and the
//! simulation engine.
//!
//! ## Philosophy
//!
//! - **Flags, not bytes**: Cells are a typed flag set, never a bare `u8`
//! - **Validated coordinates**: A [`Coord`] is only produced by a [`GridSize`]
//!   bounds check; raw pointer input stays signed until then
//! - **Engine-agnostic**: Nothing here knows how signals propagate
//!
//! ## Key Types
//!
//! - [`CellFlags`]: Wire, signal, protection and goal bits of one cell
//! - [`Coord`]: A validated grid coordinate
//! - [`GridSize`]: Grid dimensions and the bounds rules built on them
//! - [`Rgb`]: A decoded raster pixel, used by bulk import

#[cfg(test)]
extern crate alloc;

pub mod cell;
pub mod geometry;
pub mod pixel;

pub use cell::{CellFlags, SIGNAL_SHIFT};
pub use geometry::{Coord, GridSize, MIN_DIMENSION};
pub use pixel::Rgb;
