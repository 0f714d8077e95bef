//! Adaptive step scheduler
//!
//! Turns a user-chosen speed into a per-frame tick budget and runs the
//! bounded tick loop for one frame.
//!
//! ## Speed
//!
//! - `speed >= 0`: one tick every `speed + 1` frames
//! - `-120 < speed < 0`: `120 / (speed + 120)` ticks per frame (integer division)
//! - `speed <= -120`: unbounded, limited only by the frame time budget or a goal hit
//!
//! Whatever the budget, a frame stops ticking once the clock shows more than
//! the frame time budget has passed since the frame began.

use serde::{Deserialize, Serialize};
use sim_engine::{FrameClock, Timestamp};
use std::fmt;

/// Speed at and below which the per-frame budget is unbounded
pub const SPEED_SCALE: i32 = 120;

/// Default wall-clock time one frame may spend ticking (1 ms)
pub const DEFAULT_FRAME_BUDGET_MICROS: u64 = 1_000;

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    Stopped,
    Running,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Stopped => "STOPPED",
            RunState::Running => "RUNNING",
        }
    }
}

/// Maximum number of ticks a frame may perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IterationBudget {
    Limited(u32),
    Unbounded,
}

impl IterationBudget {
    /// Budget of a frame that is not throttled
    pub fn for_speed(speed: i32) -> Self {
        if speed >= 0 {
            IterationBudget::Limited(1)
        } else if speed > -SPEED_SCALE {
            // speed + SPEED_SCALE is in 1..SPEED_SCALE here
            let divisor = (speed + SPEED_SCALE) as u32;
            IterationBudget::Limited(SPEED_SCALE as u32 / divisor)
        } else {
            IterationBudget::Unbounded
        }
    }

    /// Returns true if another tick fits after `done` ticks
    pub fn allows(&self, done: u64) -> bool {
        match self {
            IterationBudget::Limited(limit) => done < u64::from(*limit),
            IterationBudget::Unbounded => true,
        }
    }
}

impl fmt::Display for IterationBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationBudget::Limited(limit) => write!(f, "{}", limit),
            IterationBudget::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameReport {
    /// The scheduler is stopped; nothing ran
    Stopped { total_iterations: u64 },
    /// The speed throttle skipped this frame
    Throttled { total_iterations: u64 },
    /// Ticks ran without reaching the goal
    Running {
        ticks: u64,
        budget: IterationBudget,
        total_iterations: u64,
    },
    /// The goal was reached; the scheduler is now stopped
    Completed { ticks: u64, total_iterations: u64 },
}

impl FrameReport {
    /// Ticks performed during the frame
    pub fn ticks(&self) -> u64 {
        match self {
            FrameReport::Running { ticks, .. } | FrameReport::Completed { ticks, .. } => *ticks,
            FrameReport::Stopped { .. } | FrameReport::Throttled { .. } => 0,
        }
    }

    pub fn total_iterations(&self) -> u64 {
        match self {
            FrameReport::Stopped { total_iterations }
            | FrameReport::Throttled { total_iterations }
            | FrameReport::Running {
                total_iterations, ..
            }
            | FrameReport::Completed {
                total_iterations, ..
            } => *total_iterations,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, FrameReport::Completed { .. })
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameReport::Stopped { total_iterations } => {
                write!(f, "Stopped: iteration count {}", total_iterations)
            }
            FrameReport::Throttled { total_iterations } => {
                write!(f, "Running: waiting, iteration count {}", total_iterations)
            }
            FrameReport::Running {
                ticks,
                budget,
                total_iterations,
            } => write!(
                f,
                "Running: cycles per frame {} out of target {}, iteration count {}",
                ticks, budget, total_iterations
            ),
            FrameReport::Completed {
                total_iterations, ..
            } => write!(f, "Complete: iteration count {}", total_iterations),
        }
    }
}

/// Two-state scheduler driving the engine's tick primitive
#[derive(Debug, Clone)]
pub struct StepScheduler {
    state: RunState,
    speed: i32,
    slow_count: i32,
    total_iterations: u64,
    frame_budget_micros: u64,
}

impl StepScheduler {
    pub fn new() -> Self {
        Self::with_frame_budget(DEFAULT_FRAME_BUDGET_MICROS)
    }

    pub fn with_frame_budget(frame_budget_micros: u64) -> Self {
        Self {
            state: RunState::Stopped,
            speed: 0,
            slow_count: 0,
            total_iterations: 0,
            frame_budget_micros,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed;
    }

    pub fn total_iterations(&self) -> u64 {
        self.total_iterations
    }

    pub fn reset_iterations(&mut self) {
        self.total_iterations = 0;
    }

    pub fn frame_budget_micros(&self) -> u64 {
        self.frame_budget_micros
    }

    pub fn set_frame_budget_micros(&mut self, micros: u64) {
        self.frame_budget_micros = micros;
    }

    /// Enters Running; returns false if already running
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = RunState::Running;
        true
    }

    /// Enters Stopped; returns false if already stopped
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = RunState::Stopped;
        true
    }

    /// Applies the speed throttle and returns this frame's budget, or `None`
    /// when the frame is skipped
    pub fn plan_frame(&mut self) -> Option<IterationBudget> {
        if self.speed >= 0 {
            if self.slow_count < self.speed {
                self.slow_count += 1;
                return None;
            }
            self.slow_count = 0;
        }
        Some(IterationBudget::for_speed(self.speed))
    }

    /// Runs one frame that began at `now`
    ///
    /// `tick` advances the engine once and reports whether the goal is now
    /// achieved. The loop stops after the tick that achieves the goal, after
    /// the budget is spent, or after the tick that pushes `clock` past the
    /// frame time budget.
    pub fn run_frame<C, F>(&mut self, now: Timestamp, clock: &mut C, mut tick: F) -> FrameReport
    where
        C: FrameClock + ?Sized,
        F: FnMut() -> bool,
    {
        if !self.is_running() {
            return FrameReport::Stopped {
                total_iterations: self.total_iterations,
            };
        }

        let budget = match self.plan_frame() {
            Some(budget) => budget,
            None => {
                return FrameReport::Throttled {
                    total_iterations: self.total_iterations,
                }
            }
        };

        let mut ticks = 0u64;
        let mut achieved = false;
        while budget.allows(ticks) {
            achieved = tick();
            ticks += 1;
            if achieved {
                break;
            }
            if clock.now().micros_since(now) > self.frame_budget_micros {
                break;
            }
        }

        self.total_iterations = self.total_iterations.saturating_add(ticks);

        if achieved {
            self.state = RunState::Stopped;
            FrameReport::Completed {
                ticks,
                total_iterations: self.total_iterations,
            }
        } else {
            FrameReport::Running {
                ticks,
                budget,
                total_iterations: self.total_iterations,
            }
        }
    }
}

impl Default for StepScheduler {
    fn default() -> Self {
        Self::new()
    }
}
