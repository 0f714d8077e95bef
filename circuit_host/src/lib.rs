//! # Circuit Host
//!
//! Thin adapter between a windowing or terminal front end and the circuit
//! editor.
//!
//! ## Philosophy
//!
//! - **Events, not callbacks**: The front end forwards normalized key and
//!   pointer events; the host decides what they mean
//! - **Rebindable**: Every action goes through [`KeyBindings`]
//! - **Atomic gestures**: A drag is applied once, on pointer release
//! - **Testable**: Fully drivable with injected events and a manual clock
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A renderer (the host only reports what needs repainting)
//! - An image decoder (imports take decoded pixels)
//! - A save format

pub mod bindings;
pub mod config;
pub mod host;
pub mod input;

pub use bindings::{KeyAction, KeyBindings};
pub use config::{ConfigError, HostConfig};
pub use host::{CircuitHost, EditMode, HostAction, HostError, HostResult};
pub use input::{InputEvent, KeyCode, KeyEvent, KeyState, PointerEvent, PointerKind};
