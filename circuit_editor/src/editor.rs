//! CircuitEditor aggregate
//!
//! Owns the engine together with every piece of controller state. Edit
//! operations live in [`crate::edit`]; this module holds construction,
//! run control, frame stepping and the bulk operations that touch the whole
//! grid.

use std::fmt;

use circuit_types::{CellFlags, GridSize};
use sim_engine::{FrameClock, GridEngine, SimEngine, SystemClock, Timestamp};

use crate::{
    classify_pixel, ClipboardBuffer, CircuitSnapshot, DirtyState, FrameReport, GoalMode, GoalSet,
    ImportError, Invalidation, RasterImage, RunState, StepScheduler,
};

/// Editor and step controller for one circuit
pub struct CircuitEditor<E: SimEngine = GridEngine> {
    pub(crate) engine: E,
    pub(crate) goals: GoalSet,
    pub(crate) clipboard: ClipboardBuffer,
    pub(crate) dirty: DirtyState,
    pub(crate) scheduler: StepScheduler,
    pub(crate) clock: Box<dyn FrameClock>,
    pub(crate) goal_mode: GoalMode,
}

impl<E: SimEngine> CircuitEditor<E> {
    /// Create an editor timed by the system clock
    pub fn new(engine: E) -> Self {
        Self::with_clock(engine, Box::new(SystemClock::new()))
    }

    /// Create an editor timed by `clock`
    pub fn with_clock(engine: E, clock: Box<dyn FrameClock>) -> Self {
        Self {
            engine,
            goals: GoalSet::new(),
            clipboard: ClipboardBuffer::new(),
            dirty: DirtyState::new(),
            scheduler: StepScheduler::new(),
            clock,
            goal_mode: GoalMode::default(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Direct engine access
    ///
    /// Both invalidations are marked, since the caller may change anything.
    /// Goal registrations are not touched.
    pub fn engine_mut(&mut self) -> &mut E {
        self.dirty.mark_all();
        &mut self.engine
    }

    pub fn size(&self) -> GridSize {
        self.engine.size()
    }

    pub fn goals(&self) -> &GoalSet {
        &self.goals
    }

    pub fn clipboard(&self) -> &ClipboardBuffer {
        &self.clipboard
    }

    /// Replace the clipboard contents
    pub fn set_clipboard(&mut self, clipboard: ClipboardBuffer) {
        self.clipboard = clipboard;
        self.dirty.mark(Invalidation::Redraw);
    }

    pub fn dirty(&self) -> &DirtyState {
        &self.dirty
    }

    /// Invalidation state, for consumers that take or subscribe
    pub fn dirty_mut(&mut self) -> &mut DirtyState {
        &mut self.dirty
    }

    pub fn scheduler(&self) -> &StepScheduler {
        &self.scheduler
    }

    pub fn run_state(&self) -> RunState {
        self.scheduler.state()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn speed(&self) -> i32 {
        self.scheduler.speed()
    }

    pub fn set_speed(&mut self, speed: i32) {
        self.scheduler.set_speed(speed);
    }

    pub fn set_frame_budget_micros(&mut self, micros: u64) {
        self.scheduler.set_frame_budget_micros(micros);
    }

    pub fn total_iterations(&self) -> u64 {
        self.scheduler.total_iterations()
    }

    pub fn goal_mode(&self) -> GoalMode {
        self.goal_mode
    }

    pub fn set_goal_mode(&mut self, mode: GoalMode) {
        self.goal_mode = mode;
    }

    /// Enter Running and resynchronize goal memory
    ///
    /// Returns false if already running.
    pub fn start(&mut self) -> bool {
        if !self.scheduler.start() {
            return false;
        }
        self.goals.resync(&self.engine);
        log::info!(
            "simulation started at speed {} ({} goals, mode {})",
            self.scheduler.speed(),
            self.goals.len(),
            self.goal_mode.as_str()
        );
        true
    }

    /// Enter Stopped; returns false if already stopped
    pub fn stop(&mut self) -> bool {
        if !self.scheduler.stop() {
            return false;
        }
        log::info!(
            "simulation stopped after {} iterations",
            self.scheduler.total_iterations()
        );
        true
    }

    /// Start when stopped, stop when running; returns the new running state
    pub fn toggle_running(&mut self) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.is_running()
    }

    /// Run one frame that began at `now`
    pub fn step(&mut self, now: Timestamp) -> FrameReport {
        let mode = self.goal_mode;
        let Self {
            engine,
            goals,
            scheduler,
            clock,
            ..
        } = self;

        let report = scheduler.run_frame(now, &mut **clock, || {
            engine.tick();
            goals.evaluate(mode, &*engine)
        });

        if report.ticks() > 0 {
            self.dirty.mark(Invalidation::Redraw);
            log::debug!("{}", report);
        }
        if report.is_completed() {
            log::info!(
                "goal reached ({}) after {} iterations",
                self.goal_mode.as_str(),
                report.total_iterations()
            );
        }
        report
    }

    /// Clear every signal, resynchronize goals and zero the iteration count
    pub fn reset(&mut self) {
        for coord in self.engine.size().coords() {
            self.engine.sub_from_cell(coord, CellFlags::SIGNAL);
        }
        self.goals.resync(&self.engine);
        self.scheduler.reset_iterations();
        self.dirty.mark_all();
        log::info!("circuit reset");
    }

    /// Change the grid dimensions
    ///
    /// Goals that are no longer interior are dropped; survivors keep their
    /// memory. Returns false, leaving everything unchanged, if either
    /// dimension is below the minimum.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        let size = GridSize::new(width, height);
        if !size.is_valid() {
            log::warn!("ignoring resize to {}: below minimum grid size", size);
            return false;
        }

        let old = self.engine.size();
        self.engine.resize(size);
        self.goals.retain(|goal| size.is_interior(goal.coord()));
        self.dirty.mark_all();
        log::info!(
            "grid resized from {} to {} ({} goals kept)",
            old,
            size,
            self.goals.len()
        );
        true
    }

    /// Replace the circuit with the contents of a raster
    ///
    /// The grid takes the raster's dimensions and every existing goal is
    /// dropped. Goal pixels on the border are loaded as protected wire
    /// without registration. Nothing changes when the raster is rejected.
    pub fn import_raster(&mut self, image: &RasterImage) -> Result<(), ImportError> {
        let size = image.check_grid_size()?;

        self.engine.resize(size);
        self.goals.clear();
        for (coord, pixel) in size.coords().zip(image.pixels()) {
            let class = classify_pixel(*pixel);
            let mut flags = class.flags;
            if class.goal {
                if size.is_interior(coord) {
                    self.goals.insert(coord);
                } else {
                    flags.remove(CellFlags::GOAL);
                }
            }
            self.engine.set_cell(coord, flags);
        }

        self.scheduler.reset_iterations();
        self.dirty.mark_all();
        log::info!(
            "imported {} raster with {} goals",
            size,
            self.goals.len()
        );
        Ok(())
    }

    /// Decode packed RGBA bytes and import them
    pub fn import_rgba(
        &mut self,
        width: usize,
        height: usize,
        bytes: &[u8],
    ) -> Result<(), ImportError> {
        let image = RasterImage::from_rgba(width, height, bytes)?;
        self.import_raster(&image)
    }

    /// Mirror the clipboard left to right
    pub fn flip_clipboard_horizontal(&mut self) {
        self.clipboard.flip_horizontal();
        self.dirty.mark(Invalidation::Redraw);
    }

    /// Mirror the clipboard top to bottom
    pub fn flip_clipboard_vertical(&mut self) {
        self.clipboard.flip_vertical();
        self.dirty.mark(Invalidation::Redraw);
    }

    pub fn rotate_clipboard_ccw(&mut self) {
        self.clipboard.rotate_ccw();
        self.dirty.mark(Invalidation::Redraw);
    }

    pub fn rotate_clipboard_cw(&mut self) {
        self.clipboard.rotate_cw();
        self.dirty.mark(Invalidation::Redraw);
    }

    /// Get a complete snapshot of controller state
    pub fn snapshot(&self) -> CircuitSnapshot {
        let size = self.engine.size();
        CircuitSnapshot {
            size,
            cells: size.coords().map(|coord| self.engine.get_cell(coord)).collect(),
            goals: self.goals.coords().collect(),
            clipboard_width: self.clipboard.width(),
            clipboard_height: self.clipboard.height(),
            run_state: self.scheduler.state(),
            speed: self.scheduler.speed(),
            total_iterations: self.scheduler.total_iterations(),
            goal_mode: self.goal_mode,
        }
    }
}

impl<E: SimEngine + fmt::Debug> fmt::Debug for CircuitEditor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitEditor")
            .field("engine", &self.engine)
            .field("goals", &self.goals.len())
            .field("clipboard", &(self.clipboard.width(), self.clipboard.height()))
            .field("dirty", &self.dirty)
            .field("scheduler", &self.scheduler)
            .field("goal_mode", &self.goal_mode)
            .finish()
    }
}
