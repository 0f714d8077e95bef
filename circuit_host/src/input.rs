//! Normalized input events
//!
//! Hosts translate their native keyboard and pointer events into these
//! types. Pointer positions are already in grid cells.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Keyboard event
    Key(KeyEvent),
    /// Pointer event in grid coordinates
    Pointer(PointerEvent),
}

impl InputEvent {
    /// Creates a key event
    pub fn key(event: KeyEvent) -> Self {
        Self::Key(event)
    }

    /// Creates a pointer event
    pub fn pointer(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }

    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(event) => Some(event),
            Self::Pointer(_) => None,
        }
    }

    pub fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::Pointer(event) => Some(event),
            Self::Key(_) => None,
        }
    }
}

/// Keyboard state change
///
/// Auto-repeat arrives as further `Pressed` events for a key that is
/// already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn new(code: KeyCode, state: KeyState) -> Self {
        Self { code, state }
    }

    /// Creates a key pressed event
    pub fn pressed(code: KeyCode) -> Self {
        Self::new(code, KeyState::Pressed)
    }

    /// Creates a key released event
    pub fn released(code: KeyCode) -> Self {
        Self::new(code, KeyState::Released)
    }

    pub fn is_pressed(&self) -> bool {
        self.state == KeyState::Pressed
    }
}

/// Key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => write!(f, "pressed"),
            Self::Released => write!(f, "released"),
        }
    }
}

/// Logical key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Numbers
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Special keys
    Space,
    Escape,
    Enter,
    LeftShift,
    LeftCtrl,
    LeftAlt,

    // Punctuation
    LeftBracket,
    RightBracket,
    Minus,
    Equal,

    // Unknown/unmapped key
    Unknown,
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Pointer event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    /// Primary button pressed
    Down,
    /// Pointer moved, button state unchanged
    Move,
    /// Primary button released
    Up,
}

/// Pointer event at a grid cell
///
/// Coordinates are signed; positions off the grid are passed through and
/// ignored by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: i32,
    pub y: i32,
    pub kind: PointerKind,
}

impl PointerEvent {
    pub fn new(x: i32, y: i32, kind: PointerKind) -> Self {
        Self { x, y, kind }
    }

    pub fn down(x: i32, y: i32) -> Self {
        Self::new(x, y, PointerKind::Down)
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self::new(x, y, PointerKind::Move)
    }

    pub fn up(x: i32, y: i32) -> Self {
        Self::new(x, y, PointerKind::Up)
    }
}
