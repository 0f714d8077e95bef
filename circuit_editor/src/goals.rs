//! Goal set and completion predicates

use circuit_types::{CellFlags, Coord};
use serde::{Deserialize, Serialize};
use sim_engine::SimEngine;
use std::collections::HashMap;

/// Completion predicate evaluated over the goal set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalMode {
    /// Never achieved
    #[default]
    Ignore,
    /// Every goal is signaled (and there is at least one goal)
    All,
    /// At least one goal is signaled
    Any,
    /// At least one goal changed since the previous evaluation
    Change,
}

impl GoalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalMode::Ignore => "ignore",
            GoalMode::All => "all",
            GoalMode::Any => "any",
            GoalMode::Change => "change",
        }
    }
}

/// A watched cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal {
    coord: Coord,
    /// `None` until the first observation; never equal to a real cell state.
    last_observed: Option<CellFlags>,
}

impl Goal {
    fn new(coord: Coord) -> Self {
        Self {
            coord,
            last_observed: None,
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn last_observed(&self) -> Option<CellFlags> {
        self.last_observed
    }
}

/// Insertion-ordered set of goals keyed by coordinate
///
/// Order only matters for iteration. Removal swaps the last goal into the
/// freed slot.
#[derive(Debug, Clone, Default)]
pub struct GoalSet {
    goals: Vec<Goal>,
    index: HashMap<Coord, usize>,
}

impl GoalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.index.contains_key(&coord)
    }

    pub fn get(&self, coord: Coord) -> Option<&Goal> {
        self.index.get(&coord).map(|&slot| &self.goals[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter()
    }

    /// Coordinates in iteration order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.goals.iter().map(Goal::coord)
    }

    /// Registers a goal; returns false if one already exists at `coord`
    pub fn insert(&mut self, coord: Coord) -> bool {
        if self.index.contains_key(&coord) {
            return false;
        }
        self.index.insert(coord, self.goals.len());
        self.goals.push(Goal::new(coord));
        true
    }

    /// Unregisters the goal at `coord`
    pub fn remove(&mut self, coord: Coord) -> Option<Goal> {
        let slot = self.index.remove(&coord)?;
        let goal = self.goals.swap_remove(slot);
        if let Some(moved) = self.goals.get(slot) {
            self.index.insert(moved.coord, slot);
        }
        Some(goal)
    }

    /// Keeps only the goals matching `keep`, preserving their memory
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Goal) -> bool,
    {
        self.goals.retain(keep);
        self.rebuild_index();
    }

    pub fn clear(&mut self) {
        self.goals.clear();
        self.index.clear();
    }

    /// Refreshes every goal's memory from the engine without evaluating
    pub fn resync<E: SimEngine + ?Sized>(&mut self, engine: &E) {
        for goal in &mut self.goals {
            goal.last_observed = Some(engine.get_cell(goal.coord));
        }
    }

    /// Evaluates `mode`, then refreshes every goal's memory
    ///
    /// The refresh happens regardless of mode; it is what makes
    /// [`GoalMode::Change`] edge-triggered.
    pub fn evaluate<E: SimEngine + ?Sized>(&mut self, mode: GoalMode, engine: &E) -> bool {
        let achieved = match mode {
            GoalMode::Ignore => false,
            GoalMode::All => {
                !self.goals.is_empty()
                    && self
                        .goals
                        .iter()
                        .all(|goal| engine.get_cell(goal.coord).is_signaled())
            }
            GoalMode::Any => self
                .goals
                .iter()
                .any(|goal| engine.get_cell(goal.coord).is_signaled()),
            GoalMode::Change => self
                .goals
                .iter()
                .any(|goal| goal.last_observed != Some(engine.get_cell(goal.coord))),
        };

        self.resync(engine);
        achieved
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .goals
            .iter()
            .enumerate()
            .map(|(slot, goal)| (goal.coord, slot))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_types::GridSize;
    use sim_engine::GridEngine;

    fn engine() -> GridEngine {
        GridEngine::new(GridSize::new(8, 8))
    }

    fn place(engine: &mut GridEngine, goals: &mut GoalSet, x: usize, y: usize) -> Coord {
        let coord = Coord::new(x, y);
        goals.insert(coord);
        engine.add_to_cell(coord, CellFlags::WIRE | CellFlags::PROTECTED | CellFlags::GOAL);
        coord
    }

    fn energize(engine: &mut GridEngine, coord: Coord, on: bool) {
        let level = if on { 1 } else { 0 };
        let cell = engine.get_cell(coord).with_signal_level(level);
        engine.set_cell(coord, cell);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut goals = GoalSet::new();
        assert!(goals.insert(Coord::new(1, 1)));
        assert!(!goals.insert(Coord::new(1, 1)));
        assert_eq!(goals.len(), 1);
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut goals = GoalSet::new();
        goals.insert(Coord::new(1, 1));
        goals.insert(Coord::new(2, 2));
        goals.insert(Coord::new(3, 3));

        let removed = goals.remove(Coord::new(1, 1));
        assert_eq!(removed.map(|goal| goal.coord()), Some(Coord::new(1, 1)));
        assert!(!goals.contains(Coord::new(1, 1)));
        assert!(goals.contains(Coord::new(2, 2)));
        assert!(goals.contains(Coord::new(3, 3)));

        // The swapped goal must still be removable through the index
        assert!(goals.remove(Coord::new(3, 3)).is_some());
        assert!(goals.remove(Coord::new(2, 2)).is_some());
        assert!(goals.is_empty());
        assert!(goals.remove(Coord::new(2, 2)).is_none());
    }

    #[test]
    fn test_retain_preserves_memory() {
        let mut engine = engine();
        let mut goals = GoalSet::new();
        place(&mut engine, &mut goals, 1, 1);
        place(&mut engine, &mut goals, 6, 6);
        goals.resync(&engine);

        goals.retain(|goal| goal.coord().x < 5);

        assert_eq!(goals.len(), 1);
        let kept = goals.get(Coord::new(1, 1)).copied();
        assert_eq!(
            kept.and_then(|goal| goal.last_observed()),
            Some(CellFlags::DESIGN)
        );
        assert!(!goals.contains(Coord::new(6, 6)));
    }

    #[test]
    fn test_ignore_never_achieved() {
        let mut engine = engine();
        let mut goals = GoalSet::new();
        let at = place(&mut engine, &mut goals, 2, 2);
        energize(&mut engine, at, true);

        assert!(!goals.evaluate(GoalMode::Ignore, &engine));
    }

    #[test]
    fn test_all_on_empty_set_never_achieved() {
        let engine = engine();
        let mut goals = GoalSet::new();
        assert!(!goals.evaluate(GoalMode::All, &engine));
    }

    #[test]
    fn test_any_on_empty_set_not_achieved() {
        let engine = engine();
        let mut goals = GoalSet::new();
        assert!(!goals.evaluate(GoalMode::Any, &engine));
    }

    #[test]
    fn test_all_requires_every_goal() {
        let mut engine = engine();
        let mut goals = GoalSet::new();
        let a = place(&mut engine, &mut goals, 2, 2);
        let b = place(&mut engine, &mut goals, 4, 4);

        energize(&mut engine, a, true);
        assert!(!goals.evaluate(GoalMode::All, &engine));

        energize(&mut engine, b, true);
        assert!(goals.evaluate(GoalMode::All, &engine));
    }

    #[test]
    fn test_any_requires_one_goal() {
        let mut engine = engine();
        let mut goals = GoalSet::new();
        place(&mut engine, &mut goals, 2, 2);
        let b = place(&mut engine, &mut goals, 4, 4);

        assert!(!goals.evaluate(GoalMode::Any, &engine));
        energize(&mut engine, b, true);
        assert!(goals.evaluate(GoalMode::Any, &engine));
    }

    #[test]
    fn test_adding_signaled_goal_is_monotone() {
        let mut engine = engine();
        let mut goals = GoalSet::new();
        let a = place(&mut engine, &mut goals, 2, 2);
        energize(&mut engine, a, true);

        let any_before = goals.evaluate(GoalMode::Any, &engine);
        let all_before = goals.evaluate(GoalMode::All, &engine);

        let b = place(&mut engine, &mut goals, 5, 5);
        energize(&mut engine, b, true);

        // Adding a signaled goal can only move towards achieved
        assert!(goals.evaluate(GoalMode::Any, &engine) >= any_before);
        assert!(goals.evaluate(GoalMode::All, &engine) >= all_before);
        assert!(goals.evaluate(GoalMode::All, &engine));
    }

    #[test]
    fn test_change_fires_on_first_evaluation() {
        let mut engine = engine();
        let mut goals = GoalSet::new();
        place(&mut engine, &mut goals, 2, 2);

        // Fresh goals carry the sentinel
        assert!(goals.evaluate(GoalMode::Change, &engine));
        assert!(!goals.evaluate(GoalMode::Change, &engine));
    }

    #[test]
    fn test_change_is_edge_triggered() {
        let mut engine = engine();
        let mut goals = GoalSet::new();
        let at = place(&mut engine, &mut goals, 3, 3);
        goals.resync(&engine);

        assert!(!goals.evaluate(GoalMode::Change, &engine));
        assert!(!goals.evaluate(GoalMode::Change, &engine));

        energize(&mut engine, at, true);
        assert!(goals.evaluate(GoalMode::Change, &engine));
        assert!(!goals.evaluate(GoalMode::Change, &engine));
    }

    #[test]
    fn test_memory_refreshed_in_every_mode() {
        let mut engine = engine();
        let mut goals = GoalSet::new();
        let at = place(&mut engine, &mut goals, 3, 3);
        goals.resync(&engine);

        energize(&mut engine, at, true);
        // Evaluating in another mode still consumes the edge
        goals.evaluate(GoalMode::Ignore, &engine);
        assert!(!goals.evaluate(GoalMode::Change, &engine));
    }

    #[test]
    fn test_mode_strings() {
        assert_eq!(GoalMode::Ignore.as_str(), "ignore");
        assert_eq!(GoalMode::All.as_str(), "all");
        assert_eq!(GoalMode::Any.as_str(), "any");
        assert_eq!(GoalMode::Change.as_str(), "change");
    }
}
