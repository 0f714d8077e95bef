//! Circuit snapshot for determinism testing

use crate::goals::GoalMode;
use crate::scheduler::RunState;
use circuit_types::{CellFlags, Coord, GridSize};
use serde::{Deserialize, Serialize};

/// Complete controller-visible state
///
/// Two editors fed the same events with the same clock produce equal
/// snapshots. This is not a save format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitSnapshot {
    pub size: GridSize,
    pub cells: Vec<CellFlags>,
    /// Goal coordinates in iteration order
    pub goals: Vec<Coord>,
    pub clipboard_width: usize,
    pub clipboard_height: usize,
    pub run_state: RunState,
    pub speed: i32,
    pub total_iterations: u64,
    pub goal_mode: GoalMode,
}

impl CircuitSnapshot {
    /// Number of cells carrying wire
    pub fn wire_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.has_wire()).count()
    }

    /// Compute a deterministic digest of the snapshot state
    #[cfg(test)]
    pub fn hash(&self) -> u64 {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();

        hasher.update((self.size.width as u64).to_le_bytes());
        hasher.update((self.size.height as u64).to_le_bytes());

        let bits: Vec<u8> = self.cells.iter().map(CellFlags::bits).collect();
        hasher.update(&bits);

        for goal in &self.goals {
            hasher.update((goal.x as u64).to_le_bytes());
            hasher.update((goal.y as u64).to_le_bytes());
        }

        hasher.update((self.clipboard_width as u64).to_le_bytes());
        hasher.update((self.clipboard_height as u64).to_le_bytes());
        hasher.update(self.run_state.as_str().as_bytes());
        hasher.update(self.speed.to_le_bytes());
        hasher.update(self.total_iterations.to_le_bytes());
        hasher.update(self.goal_mode.as_str().as_bytes());

        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        u64::from_le_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CircuitSnapshot {
        CircuitSnapshot {
            size: GridSize::new(4, 4),
            cells: vec![CellFlags::empty(); 16],
            goals: vec![Coord::new(1, 1)],
            clipboard_width: 0,
            clipboard_height: 0,
            run_state: RunState::Stopped,
            speed: 0,
            total_iterations: 0,
            goal_mode: GoalMode::Ignore,
        }
    }

    #[test]
    fn test_snapshot_hash_deterministic() {
        let snapshot = sample();
        assert_eq!(snapshot.hash(), snapshot.clone().hash());
    }

    #[test]
    fn test_snapshot_hash_tracks_cells() {
        let before = sample();
        let mut after = sample();
        after.cells[5] = CellFlags::WIRE;
        assert_ne!(before.hash(), after.hash());
        assert_eq!(after.wire_count(), 1);
    }

    #[test]
    fn test_snapshot_hash_tracks_goal_order() {
        let mut a = sample();
        a.goals = vec![Coord::new(1, 1), Coord::new(2, 2)];
        let mut b = sample();
        b.goals = vec![Coord::new(2, 2), Coord::new(1, 1)];
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = sample();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: CircuitSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
