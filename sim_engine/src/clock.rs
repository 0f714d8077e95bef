//! # Frame Clocks
//!
//! Monotonic time sources used to cap how long a single frame may spend
//! ticking the engine.
//!
//! ## Use Cases
//!
//! - [`SystemClock`] for real-time hosts
//! - [`ManualClock`] for tests and headless batch drivers, where time only
//!   moves when the caller says so, or by a fixed step per poll so that
//!   frames with an unbounded tick budget still end

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A point in time, in microseconds since an arbitrary clock origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The clock origin
    pub const ZERO: Self = Self(0);

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000))
    }

    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Microseconds elapsed since `earlier`, zero if `earlier` is later
    pub const fn micros_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Returns this timestamp moved forward by `micros`
    pub const fn plus_micros(&self, micros: u64) -> Self {
        Self(self.0.saturating_add(micros))
    }
}

/// Monotonic time source
///
/// Implementations must never return a value smaller than a previous one.
pub trait FrameClock {
    /// Returns the current time
    fn now(&mut self) -> Timestamp;
}

/// Wall-clock time measured from the moment the clock was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now(&mut self) -> Timestamp {
        let micros = self.origin.elapsed().as_micros();
        Timestamp::from_micros(u64::try_from(micros).unwrap_or(u64::MAX))
    }
}

/// Deterministic clock with controllable time progression
///
/// Clones share the same time, so a test can keep one handle while the
/// editor owns another. With an auto-advance step every poll returns the
/// current time and then moves it forward, which simulates work that takes
/// time.
///
/// # Examples
///
/// ```
/// use sim_engine::{FrameClock, ManualClock, Timestamp};
///
/// let mut clock = ManualClock::new();
/// let handle = clock.clone();
///
/// handle.advance(250);
/// assert_eq!(clock.now(), Timestamp::from_micros(250));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Rc<Cell<u64>>,
    auto_advance: u64,
}

impl ManualClock {
    /// Creates a clock at time zero that never advances on its own
    ///
    /// Time only moves through [`ManualClock::advance`], so a frame-time cap
    /// measured against this clock never trips within a frame. Loops with no
    /// other bound, such as an unbounded per-frame tick budget, need
    /// [`ManualClock::with_auto_advance`] instead.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock at time zero that advances `micros` after every poll
    pub fn with_auto_advance(micros: u64) -> Self {
        Self {
            micros: Rc::new(Cell::new(0)),
            auto_advance: micros,
        }
    }

    /// Moves time forward
    pub fn advance(&self, micros: u64) {
        self.micros.set(self.micros.get().saturating_add(micros));
    }

    /// Returns the current time without polling
    pub fn current(&self) -> Timestamp {
        Timestamp::from_micros(self.micros.get())
    }
}

impl FrameClock for ManualClock {
    fn now(&mut self) -> Timestamp {
        let now = self.current();
        self.advance(self.auto_advance);
        now
    }
}
