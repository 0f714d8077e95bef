//! Rebindable key bindings

use crate::input::KeyCode;
use serde::{Deserialize, Serialize};

/// Logical action a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAction {
    /// Must be held for destructive actions
    Guard,
    Reset,
    Pause,
    Slower,
    Faster,
    ModeWire,
    ModeProtect,
    ModeForcedWire,
    ModeGoal,
    GoalIgnore,
    GoalAll,
    GoalAny,
    GoalChange,
    /// Held: drags clear instead of draw, additive paste subtracts
    Subtract,
    Copy,
    Cut,
    Erase,
    Paste,
    AdditivePaste,
    FlipVertical,
    FlipHorizontal,
    RotateCcw,
    RotateCw,
}

impl KeyAction {
    /// Every action, in lookup priority order
    pub const ALL: [KeyAction; 23] = [
        KeyAction::Faster,
        KeyAction::Slower,
        KeyAction::Guard,
        KeyAction::Reset,
        KeyAction::Pause,
        KeyAction::ModeWire,
        KeyAction::ModeProtect,
        KeyAction::ModeForcedWire,
        KeyAction::ModeGoal,
        KeyAction::GoalIgnore,
        KeyAction::GoalAll,
        KeyAction::GoalAny,
        KeyAction::GoalChange,
        KeyAction::Subtract,
        KeyAction::Copy,
        KeyAction::Cut,
        KeyAction::Erase,
        KeyAction::Paste,
        KeyAction::AdditivePaste,
        KeyAction::FlipVertical,
        KeyAction::FlipHorizontal,
        KeyAction::RotateCcw,
        KeyAction::RotateCw,
    ];

    /// Speed keys act on every press, including auto-repeat
    pub fn repeats(&self) -> bool {
        matches!(self, KeyAction::Faster | KeyAction::Slower)
    }
}

/// Key assigned to every action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub guard: KeyCode,
    pub reset: KeyCode,
    pub pause: KeyCode,
    pub slower: KeyCode,
    pub faster: KeyCode,
    pub mode_wire: KeyCode,
    pub mode_protect: KeyCode,
    pub mode_forced_wire: KeyCode,
    pub mode_goal: KeyCode,
    pub goal_ignore: KeyCode,
    pub goal_all: KeyCode,
    pub goal_any: KeyCode,
    pub goal_change: KeyCode,
    pub subtract: KeyCode,
    pub copy: KeyCode,
    pub cut: KeyCode,
    pub erase: KeyCode,
    pub paste: KeyCode,
    pub additive_paste: KeyCode,
    pub flip_vertical: KeyCode,
    pub flip_horizontal: KeyCode,
    pub rotate_ccw: KeyCode,
    pub rotate_cw: KeyCode,
}

impl KeyBindings {
    /// Key bound to `action`
    pub fn key(&self, action: KeyAction) -> KeyCode {
        match action {
            KeyAction::Guard => self.guard,
            KeyAction::Reset => self.reset,
            KeyAction::Pause => self.pause,
            KeyAction::Slower => self.slower,
            KeyAction::Faster => self.faster,
            KeyAction::ModeWire => self.mode_wire,
            KeyAction::ModeProtect => self.mode_protect,
            KeyAction::ModeForcedWire => self.mode_forced_wire,
            KeyAction::ModeGoal => self.mode_goal,
            KeyAction::GoalIgnore => self.goal_ignore,
            KeyAction::GoalAll => self.goal_all,
            KeyAction::GoalAny => self.goal_any,
            KeyAction::GoalChange => self.goal_change,
            KeyAction::Subtract => self.subtract,
            KeyAction::Copy => self.copy,
            KeyAction::Cut => self.cut,
            KeyAction::Erase => self.erase,
            KeyAction::Paste => self.paste,
            KeyAction::AdditivePaste => self.additive_paste,
            KeyAction::FlipVertical => self.flip_vertical,
            KeyAction::FlipHorizontal => self.flip_horizontal,
            KeyAction::RotateCcw => self.rotate_ccw,
            KeyAction::RotateCw => self.rotate_cw,
        }
    }

    /// Actions bound to `code`, in priority order
    pub fn actions(&self, code: KeyCode) -> impl Iterator<Item = KeyAction> + '_ {
        KeyAction::ALL
            .into_iter()
            .filter(move |action| self.key(*action) == code)
    }

    /// First action bound to `code`
    pub fn action(&self, code: KeyCode) -> Option<KeyAction> {
        self.actions(code).next()
    }

    /// Keys bound to more than one action
    pub fn conflicts(&self) -> Vec<KeyCode> {
        let mut seen = Vec::new();
        let mut conflicts = Vec::new();
        for action in KeyAction::ALL {
            let code = self.key(action);
            if seen.contains(&code) {
                if !conflicts.contains(&code) {
                    conflicts.push(code);
                }
            } else {
                seen.push(code);
            }
        }
        conflicts
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            guard: KeyCode::G,
            reset: KeyCode::R,
            pause: KeyCode::Space,
            slower: KeyCode::LeftBracket,
            faster: KeyCode::RightBracket,
            mode_wire: KeyCode::Num1,
            mode_protect: KeyCode::Num2,
            mode_forced_wire: KeyCode::Num3,
            mode_goal: KeyCode::Num4,
            goal_ignore: KeyCode::Num5,
            goal_all: KeyCode::Num6,
            goal_any: KeyCode::Num7,
            goal_change: KeyCode::Num8,
            subtract: KeyCode::D,
            copy: KeyCode::C,
            cut: KeyCode::X,
            erase: KeyCode::E,
            paste: KeyCode::V,
            additive_paste: KeyCode::B,
            flip_vertical: KeyCode::I,
            flip_horizontal: KeyCode::K,
            rotate_ccw: KeyCode::J,
            rotate_cw: KeyCode::L,
        }
    }
}
