//! Input adapter and frame driver

use std::collections::HashSet;

use circuit_editor::{
    CircuitEditor, ClearMode, FrameReport, GoalMode, ImportError, Invalidation, PasteMode,
    RasterImage,
};
use serde::{Deserialize, Serialize};
use sim_engine::{FrameClock, GridEngine, SimEngine, Timestamp};
use thiserror::Error;

use crate::bindings::KeyAction;
use crate::config::{ConfigError, HostConfig};
use crate::input::{InputEvent, KeyCode, KeyEvent, KeyState, PointerEvent, PointerKind};

/// Host errors
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}

pub type HostResult<T> = Result<T, HostError>;

/// What a pointer click or drag does when no clipboard key is held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditMode {
    /// Click toggles wire, drag draws a line
    #[default]
    Wire,
    /// Click toggles protection, drag protects a rectangle
    Protect,
    /// Like `Wire`, but protected cells are edited too
    ForcedWire,
    /// Click or drag release toggles a goal
    Goal,
}

impl EditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::Wire => "wire",
            EditMode::Protect => "protect",
            EditMode::ForcedWire => "forced wire",
            EditMode::Goal => "goal",
        }
    }

    /// Edits in this mode override protection
    pub fn is_forced(&self) -> bool {
        *self == EditMode::ForcedWire
    }
}

/// Result of handling one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    /// Nothing changed
    Continue,
    /// A pointer gesture edited the circuit
    Edited,
    /// The clipboard was transformed
    ClipboardChanged,
    /// Running state after a pause toggle
    RunToggled { running: bool },
    /// Signals and iteration count were reset
    Reset,
    SpeedChanged(i32),
    ModeChanged(EditMode),
    GoalModeChanged(GoalMode),
    /// Paste preview should be shown or hidden
    PastePreview(bool),
}

/// Turns input events into editor calls and drives frames
pub struct CircuitHost<E: SimEngine = GridEngine> {
    editor: CircuitEditor<E>,
    config: HostConfig,
    mode: EditMode,
    held: HashSet<KeyCode>,
    drag_start: Option<(i32, i32)>,
    hover: (i32, i32),
    status: String,
}

impl CircuitHost<GridEngine> {
    /// Create a host with an empty grid engine sized from `config`
    pub fn new(config: HostConfig) -> HostResult<Self> {
        config.validate()?;
        let editor = CircuitEditor::new(GridEngine::new(config.grid_size()));
        Self::with_editor(config, editor)
    }

    /// Like [`CircuitHost::new`], timed by `clock`
    pub fn with_clock(config: HostConfig, clock: Box<dyn FrameClock>) -> HostResult<Self> {
        config.validate()?;
        let editor = CircuitEditor::with_clock(GridEngine::new(config.grid_size()), clock);
        Self::with_editor(config, editor)
    }
}

impl<E: SimEngine> CircuitHost<E> {
    /// Wrap an existing editor
    ///
    /// The editor keeps its grid; speed and frame budget come from `config`.
    pub fn with_editor(config: HostConfig, mut editor: CircuitEditor<E>) -> HostResult<Self> {
        config.validate()?;
        for code in config.key_bindings.conflicts() {
            log::warn!("key {} is bound to more than one action", code);
        }

        editor.set_speed(config.clamp_speed(config.initial_speed));
        editor.set_frame_budget_micros(config.frame_budget_micros);

        Ok(Self {
            editor,
            config,
            mode: EditMode::default(),
            held: HashSet::new(),
            drag_start: None,
            hover: (0, 0),
            status: String::from("Stopped"),
        })
    }

    pub fn editor(&self) -> &CircuitEditor<E> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut CircuitEditor<E> {
        &mut self.editor
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    /// Latest status line
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Last pointer position
    pub fn hover(&self) -> (i32, i32) {
        self.hover
    }

    /// Returns true while the key bound to `action` is held
    pub fn is_held(&self, action: KeyAction) -> bool {
        self.held.contains(&self.config.key_bindings.key(action))
    }

    /// Returns true when the renderer should draw the clipboard at the
    /// hover position
    pub fn paste_preview(&self) -> bool {
        !self.editor.is_running()
            && (self.is_held(KeyAction::Paste) || self.is_held(KeyAction::AdditivePaste))
    }

    /// Apply one input event
    pub fn handle_event(&mut self, event: InputEvent) -> HostAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer),
        }
    }

    /// Run one frame that began at `now`
    pub fn frame(&mut self, now: Timestamp) -> FrameReport {
        let report = self.editor.step(now);
        match report {
            FrameReport::Running { .. } | FrameReport::Completed { .. } => {
                self.status = report.to_string();
            }
            FrameReport::Stopped { .. } | FrameReport::Throttled { .. } => {}
        }
        report
    }

    /// Replace the circuit with a raster
    pub fn import_raster(&mut self, image: &RasterImage) -> HostResult<()> {
        self.editor.import_raster(image)?;
        self.status = String::from("Loaded from image");
        Ok(())
    }

    /// Change the grid size; sizes below the minimum are ignored
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        let resized = self.editor.resize(width, height);
        if resized {
            self.config.grid_width = width;
            self.config.grid_height = height;
        }
        resized
    }

    pub fn clear(&mut self, mode: ClearMode) {
        self.editor.clear(mode);
    }

    fn handle_key(&mut self, event: KeyEvent) -> HostAction {
        let action = self.config.key_bindings.action(event.code);

        if event.state == KeyState::Released {
            self.held.remove(&event.code);
            return match action {
                Some(KeyAction::Paste) | Some(KeyAction::AdditivePaste) => {
                    self.editor.dirty_mut().mark(Invalidation::Redraw);
                    HostAction::PastePreview(false)
                }
                _ => HostAction::Continue,
            };
        }

        // Speed keys ignore the repeat guard
        if let Some(action) = action.filter(KeyAction::repeats) {
            let step = if action == KeyAction::Faster { -1 } else { 1 };
            let speed = self
                .config
                .clamp_speed(self.editor.speed().saturating_add(step));
            self.editor.set_speed(speed);
            log::debug!("speed set to {}", speed);
            return HostAction::SpeedChanged(speed);
        }

        if !self.held.insert(event.code) {
            return HostAction::Continue;
        }

        let action = match action {
            Some(action) => action,
            None => return HostAction::Continue,
        };

        match action {
            KeyAction::ModeWire => self.select_mode(EditMode::Wire),
            KeyAction::ModeProtect => self.select_mode(EditMode::Protect),
            KeyAction::ModeForcedWire => self.select_mode(EditMode::ForcedWire),
            KeyAction::ModeGoal => self.select_mode(EditMode::Goal),
            KeyAction::GoalIgnore => self.select_goal_mode(GoalMode::Ignore),
            KeyAction::GoalAll => self.select_goal_mode(GoalMode::All),
            KeyAction::GoalAny => self.select_goal_mode(GoalMode::Any),
            KeyAction::GoalChange => self.select_goal_mode(GoalMode::Change),
            KeyAction::Pause => {
                let running = self.editor.toggle_running();
                if !running {
                    self.status = FrameReport::Stopped {
                        total_iterations: self.editor.total_iterations(),
                    }
                    .to_string();
                }
                HostAction::RunToggled { running }
            }
            KeyAction::Reset => {
                if !self.is_held(KeyAction::Guard) {
                    return HostAction::Continue;
                }
                self.editor.reset();
                self.status = String::from("Reset");
                HostAction::Reset
            }
            KeyAction::FlipVertical => {
                self.editor.flip_clipboard_vertical();
                HostAction::ClipboardChanged
            }
            KeyAction::FlipHorizontal => {
                self.editor.flip_clipboard_horizontal();
                HostAction::ClipboardChanged
            }
            KeyAction::RotateCcw => {
                self.editor.rotate_clipboard_ccw();
                HostAction::ClipboardChanged
            }
            KeyAction::RotateCw => {
                self.editor.rotate_clipboard_cw();
                HostAction::ClipboardChanged
            }
            KeyAction::Paste | KeyAction::AdditivePaste => {
                self.editor.dirty_mut().mark(Invalidation::Redraw);
                HostAction::PastePreview(self.paste_preview())
            }
            KeyAction::Guard
            | KeyAction::Subtract
            | KeyAction::Copy
            | KeyAction::Cut
            | KeyAction::Erase
            | KeyAction::Faster
            | KeyAction::Slower => HostAction::Continue,
        }
    }

    fn select_mode(&mut self, mode: EditMode) -> HostAction {
        self.mode = mode;
        HostAction::ModeChanged(mode)
    }

    fn select_goal_mode(&mut self, mode: GoalMode) -> HostAction {
        self.editor.set_goal_mode(mode);
        HostAction::GoalModeChanged(mode)
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> HostAction {
        self.hover = (event.x, event.y);
        match event.kind {
            PointerKind::Down => {
                self.drag_start = Some((event.x, event.y));
                HostAction::Continue
            }
            PointerKind::Move => {
                if self.paste_preview() {
                    self.editor.dirty_mut().mark(Invalidation::Redraw);
                }
                HostAction::Continue
            }
            PointerKind::Up => {
                let start = self.drag_start.take().unwrap_or((event.x, event.y));
                let applied = if start == (event.x, event.y) {
                    self.click(event.x, event.y)
                } else {
                    self.drag(start, (event.x, event.y))
                };
                if applied {
                    HostAction::Edited
                } else {
                    HostAction::Continue
                }
            }
        }
    }

    fn click(&mut self, x: i32, y: i32) -> bool {
        let force = self.mode.is_forced();

        if self.is_held(KeyAction::Paste) {
            log::debug!("paste at ({}, {})", x, y);
            return self.editor.rect_paste(x, y, PasteMode::Replace, force);
        }
        if self.is_held(KeyAction::AdditivePaste) {
            let mode = if self.is_held(KeyAction::Subtract) {
                PasteMode::Subtractive
            } else {
                PasteMode::Additive
            };
            log::debug!("{} paste at ({}, {})", mode.as_str(), x, y);
            return self.editor.rect_paste(x, y, mode, force);
        }

        log::debug!("{} click at ({}, {})", self.mode.as_str(), x, y);
        match self.mode {
            EditMode::Wire => self.editor.toggle_point(x, y, false),
            EditMode::Protect => self.editor.toggle_protect(x, y),
            EditMode::ForcedWire => self.editor.toggle_point(x, y, true),
            EditMode::Goal => self.editor.toggle_goal(x, y),
        }
    }

    fn drag(&mut self, (x1, y1): (i32, i32), (x2, y2): (i32, i32)) -> bool {
        let force = self.mode.is_forced();

        if self.is_held(KeyAction::Copy) {
            log::debug!("copy ({}, {}) to ({}, {})", x1, y1, x2, y2);
            return self.editor.rect_copy(x1, y1, x2, y2);
        }
        if self.is_held(KeyAction::Cut) {
            log::debug!("cut ({}, {}) to ({}, {})", x1, y1, x2, y2);
            return self.editor.rect_cut(x1, y1, x2, y2, force);
        }
        if self.is_held(KeyAction::Erase) {
            log::debug!("erase ({}, {}) to ({}, {})", x1, y1, x2, y2);
            return self.editor.rect_erase(x1, y1, x2, y2, force);
        }

        let set_to = !self.is_held(KeyAction::Subtract);
        log::debug!(
            "{} drag ({}, {}) to ({}, {}), set {}",
            self.mode.as_str(),
            x1,
            y1,
            x2,
            y2,
            set_to
        );
        match self.mode {
            EditMode::Wire => self.editor.draw_line(x1, y1, x2, y2, set_to, false),
            EditMode::Protect => self.editor.rect_protect(x1, y1, x2, y2, set_to),
            EditMode::ForcedWire => self.editor.draw_line(x1, y1, x2, y2, set_to, true),
            EditMode::Goal => self.editor.toggle_goal(x2, y2),
        }
    }
}
