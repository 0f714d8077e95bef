//! # Circuit Editor
//!
//! Editing, clipboard, goal evaluation and adaptive stepping for a 2-D
//! logic-circuit grid simulated by an external engine.
//!
//! ## Philosophy
//!
//! - **Permissive editing**: Out-of-range coordinates are silently ignored,
//!   never reported
//! - **Deterministic**: Same input trace and clock => same circuit state
//! - **Mechanism over policy**: The editor exposes primitives; hosts decide
//!   bindings, rendering and persistence
//! - **Host-loop agnostic**: Frames are driven by `step(now)`, callable from a
//!   real-time loop, a test harness or a batch driver
//!
//! ## Design
//!
//! - [`CircuitEditor`]: Aggregate owning the engine, goals, clipboard,
//!   invalidation state and scheduler
//! - [`GoalSet`]: Watched coordinates with edge-detection memory
//! - [`ClipboardBuffer`]: Value-typed cell snapshot with flips and rotations
//! - [`StepScheduler`]: Speed-to-budget conversion and the per-frame tick loop
//! - [`DirtyState`]: Redraw and downstream invalidation with observers
//! - [`RasterImage`]: Decoded raster input for bulk import

pub mod clipboard;
pub mod dirty;
pub mod edit;
pub mod editor;
pub mod goals;
pub mod import;
pub mod scheduler;
pub mod snapshot;

pub use clipboard::ClipboardBuffer;
pub use dirty::{DirtyState, Invalidation, InvalidationObserver};
pub use edit::{ClearMode, PasteMode};
pub use editor::CircuitEditor;
pub use goals::{Goal, GoalMode, GoalSet};
pub use import::{classify_pixel, ImportError, PixelClass, RasterImage};
pub use scheduler::{
    FrameReport, IterationBudget, RunState, StepScheduler, DEFAULT_FRAME_BUDGET_MICROS,
    SPEED_SCALE,
};
pub use snapshot::CircuitSnapshot;
