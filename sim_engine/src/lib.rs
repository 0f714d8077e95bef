//! # Simulation Engine Seam
//!
//! This crate defines the narrow contract through which the circuit editor
//! reaches the simulation engine, plus the clocks that bound per-frame work.
//!
//! ## Philosophy
//!
//! - **Mechanism, not physics**: The editor never knows how signals propagate
//! - **Caller validates**: Coordinates handed to an engine are already in range
//! - **Deterministic by default**: [`GridEngine`] and [`ManualClock`] only move
//!   when told to, so every editor test is reproducible
//!
//! ## Design
//!
//! - [`SimEngine`]: The engine contract (resize, tick, cell reads and writes)
//! - [`GridEngine`]: In-memory engine with a pluggable [`TickRule`]
//! - [`FrameClock`]: Monotonic time source, [`SystemClock`] or [`ManualClock`]

pub mod clock;
pub mod engine;
pub mod grid;

pub use clock::{FrameClock, ManualClock, SystemClock, Timestamp};
pub use engine::SimEngine;
pub use grid::{GridEngine, TickRule};
