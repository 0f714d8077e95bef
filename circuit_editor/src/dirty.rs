//! Invalidation tracking
//!
//! Producers of change mark an [`Invalidation`]; each consumer clears only
//! its own kind with [`DirtyState::take`]. Observers are told when a kind
//! goes from clear to set, so consumers need not poll.

use std::fmt;

/// Kind of invalidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invalidation {
    /// Background and overlay must be repainted in full
    Redraw,
    /// Circuit contents changed (persistence, summaries)
    Downstream,
}

/// Callback notified when an invalidation becomes pending
pub type InvalidationObserver = Box<dyn FnMut(Invalidation)>;

/// Two independent invalidation flags plus their observers
pub struct DirtyState {
    redraw: bool,
    downstream: bool,
    observers: Vec<InvalidationObserver>,
}

impl DirtyState {
    /// Creates a state with both invalidations pending, so the first frame
    /// paints everything
    pub fn new() -> Self {
        Self {
            redraw: true,
            downstream: true,
            observers: Vec::new(),
        }
    }

    /// Registers an observer
    pub fn subscribe(&mut self, observer: InvalidationObserver) {
        self.observers.push(observer);
    }

    /// Marks `kind` pending
    pub fn mark(&mut self, kind: Invalidation) {
        let flag = self.flag_mut(kind);
        let was_set = *flag;
        *flag = true;
        if !was_set {
            for observer in &mut self.observers {
                observer(kind);
            }
        }
    }

    /// Marks both kinds pending
    pub fn mark_all(&mut self) {
        self.mark(Invalidation::Redraw);
        self.mark(Invalidation::Downstream);
    }

    pub fn is_set(&self, kind: Invalidation) -> bool {
        match kind {
            Invalidation::Redraw => self.redraw,
            Invalidation::Downstream => self.downstream,
        }
    }

    /// Clears `kind` and returns whether it was pending
    pub fn take(&mut self, kind: Invalidation) -> bool {
        std::mem::replace(self.flag_mut(kind), false)
    }

    fn flag_mut(&mut self, kind: Invalidation) -> &mut bool {
        match kind {
            Invalidation::Redraw => &mut self.redraw,
            Invalidation::Downstream => &mut self.downstream,
        }
    }
}

impl Default for DirtyState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DirtyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyState")
            .field("redraw", &self.redraw)
            .field("downstream", &self.downstream)
            .field("observers", &self.observers.len())
            .finish()
    }
}
