//! Edit operations
//!
//! Point, line and rectangle mutators on [`CircuitEditor`]. Every operation
//! takes raw signed grid coordinates and silently does nothing when they
//! are out of range; the return value only says whether the operation was
//! applied.
//!
//! ## Rules
//!
//! - Point and line edits require the one-cell border margin; rectangle
//!   edits accept the whole grid (border writes are the engine's business)
//! - Protected cells change only under a forced edit
//! - Clearing a protected cell by force also unregisters any goal there
//! - Registered goals keep their protection through rectangle protect and
//!   protect toggles

use circuit_types::{CellFlags, Coord};
use serde::{Deserialize, Serialize};
use sim_engine::SimEngine;

use crate::{CircuitEditor, Invalidation};

/// How a paste combines clipboard cells with the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PasteMode {
    /// Destination material is replaced by source material
    Replace,
    /// Source material is OR-ed into the destination
    Additive,
    /// Destination material is cleared under non-empty source cells
    Subtractive,
}

impl PasteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasteMode::Replace => "replace",
            PasteMode::Additive => "additive",
            PasteMode::Subtractive => "subtractive",
        }
    }
}

/// What a whole-grid clear removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClearMode {
    /// Material of every unprotected cell
    Circuit,
    /// Protection everywhere except on goals
    Protection,
    /// Every goal registration and goal flag
    Goals,
}

impl ClearMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClearMode::Circuit => "circuit",
            ClearMode::Protection => "protection",
            ClearMode::Goals => "goals",
        }
    }
}

/// Cells visited by an L-shaped connector between two points
///
/// The longer axis is walked first at the start point's perpendicular
/// coordinate, then the shorter axis at the end point's coordinate. The
/// corner is visited twice.
pub(crate) fn l_path(from: Coord, to: Coord) -> Vec<Coord> {
    let (min_x, max_x) = (from.x.min(to.x), from.x.max(to.x));
    let (min_y, max_y) = (from.y.min(to.y), from.y.max(to.y));
    let dx = max_x - min_x;
    let dy = max_y - min_y;

    let mut path = Vec::with_capacity(dx + dy + 2);
    if dx >= dy {
        path.extend((min_x..=max_x).map(|x| Coord::new(x, from.y)));
        path.extend((min_y..=max_y).map(|y| Coord::new(to.x, y)));
    } else {
        path.extend((min_y..=max_y).map(|y| Coord::new(from.x, y)));
        path.extend((min_x..=max_x).map(|x| Coord::new(x, to.y)));
    }
    path
}

impl<E: SimEngine> CircuitEditor<E> {
    /// Toggle wire at an interior cell
    ///
    /// Adds wire to a cell without it, otherwise clears all material. A
    /// protected cell only changes when `force` is set; if it is left
    /// without wire its goal is removed.
    pub fn toggle_point(&mut self, x: i32, y: i32, force: bool) -> bool {
        let coord = match self.engine.size().interior_coord(x, y) {
            Some(coord) => coord,
            None => return false,
        };

        let cell = self.engine.get_cell(coord);
        if cell.is_protected() && !force {
            return false;
        }

        if cell.has_wire() {
            self.engine.sub_from_cell(coord, CellFlags::MATERIAL);
        } else {
            self.engine.add_to_cell(coord, CellFlags::WIRE);
        }
        if cell.is_protected() && !self.engine.get_cell(coord).has_wire() {
            self.release_goal(coord);
        }

        self.mark_edited();
        true
    }

    /// Draw or clear an L-shaped line between two interior endpoints
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, set_to: bool, force: bool) -> bool {
        let size = self.engine.size();
        let (from, to) = match (size.interior_coord(x1, y1), size.interior_coord(x2, y2)) {
            (Some(from), Some(to)) => (from, to),
            _ => return false,
        };

        for coord in l_path(from, to) {
            self.edit_cell(coord, set_to, force);
        }
        self.mark_edited();
        true
    }

    /// Set or clear protection on every non-goal cell of a rectangle
    pub fn rect_protect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, set_to: bool) -> bool {
        let (min, max) = match self.region(x1, y1, x2, y2) {
            Some(region) => region,
            None => return false,
        };

        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let coord = Coord::new(x, y);
                if !self.goals.contains(coord) {
                    self.engine.set_in_cell(coord, CellFlags::PROTECTED, set_to);
                }
            }
        }
        self.mark_edited();
        true
    }

    /// Snapshot a rectangle into the clipboard
    pub fn rect_copy(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        let (min, max) = match self.region(x1, y1, x2, y2) {
            Some(region) => region,
            None => return false,
        };

        self.clipboard.resize(max.x - min.x + 1, max.y - min.y + 1);
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let cell = self.engine.get_cell(Coord::new(x, y));
                self.clipboard.set(x - min.x, y - min.y, cell);
            }
        }

        self.dirty.mark(Invalidation::Redraw);
        log::debug!(
            "copied {}x{} region at {}",
            self.clipboard.width(),
            self.clipboard.height(),
            min
        );
        true
    }

    /// Clear wire, goal and signal on every cell of a rectangle
    pub fn rect_erase(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, force: bool) -> bool {
        let (min, max) = match self.region(x1, y1, x2, y2) {
            Some(region) => region,
            None => return false,
        };

        for y in min.y..=max.y {
            for x in min.x..=max.x {
                self.edit_cell(Coord::new(x, y), false, force);
            }
        }
        self.mark_edited();
        true
    }

    /// Copy a rectangle into the clipboard, then erase it
    pub fn rect_cut(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, force: bool) -> bool {
        self.rect_copy(x1, y1, x2, y2) && self.rect_erase(x1, y1, x2, y2, force)
    }

    /// Paste the clipboard with its top-left corner at `(x, y)`
    ///
    /// The anchor must be off the top and left border. Cells that would
    /// land on or past the right or bottom border are dropped. Forcing an
    /// empty-wire source onto a protected goal removes that goal, as does
    /// any forced paste that leaves a goal without wire.
    pub fn rect_paste(&mut self, x: i32, y: i32, mode: PasteMode, force: bool) -> bool {
        let size = self.engine.size();
        let anchor = match size.coord(x, y) {
            Some(anchor) if anchor.x >= 1 && anchor.y >= 1 => anchor,
            _ => return false,
        };

        for by in 0..self.clipboard.height() {
            let dy = anchor.y + by;
            if dy + 1 >= size.height {
                break;
            }
            for bx in 0..self.clipboard.width() {
                let dx = anchor.x + bx;
                if dx + 1 >= size.width {
                    break;
                }
                let source = match self.clipboard.get(bx, by) {
                    Some(source) => source,
                    None => continue,
                };

                let dest = Coord::new(dx, dy);
                let protected = self.engine.get_cell(dest).is_protected();
                if !protected || force {
                    match mode {
                        PasteMode::Subtractive => {
                            if !source.is_empty() {
                                self.engine.sub_from_cell(dest, CellFlags::MATERIAL);
                            }
                        }
                        PasteMode::Additive => {
                            self.engine.add_to_cell(dest, source.material());
                        }
                        PasteMode::Replace => {
                            self.engine.sub_from_cell(dest, CellFlags::MATERIAL);
                            self.engine.add_to_cell(dest, source.material());
                        }
                    }
                }
                if protected
                    && force
                    && (!source.has_wire() || !self.engine.get_cell(dest).has_wire())
                {
                    self.release_goal(dest);
                }
            }
        }

        self.mark_edited();
        log::debug!("{} paste at {}", mode.as_str(), anchor);
        true
    }

    /// Toggle protection on a cell that is not a goal
    pub fn toggle_protect(&mut self, x: i32, y: i32) -> bool {
        let coord = match self.engine.size().coord(x, y) {
            Some(coord) => coord,
            None => return false,
        };
        if self.goals.contains(coord) {
            return false;
        }

        self.engine.toggle_in_cell(coord, CellFlags::PROTECTED);
        self.mark_edited();
        true
    }

    /// Place or remove a goal at an interior cell
    ///
    /// Placing stamps protected wire. Removing keeps wire and protection.
    pub fn toggle_goal(&mut self, x: i32, y: i32) -> bool {
        let coord = match self.engine.size().interior_coord(x, y) {
            Some(coord) => coord,
            None => return false,
        };

        if self.goals.remove(coord).is_some() {
            self.engine.sub_from_cell(coord, CellFlags::GOAL);
        } else {
            self.goals.insert(coord);
            self.engine.add_to_cell(coord, CellFlags::DESIGN);
        }
        self.mark_edited();
        true
    }

    /// Whole-grid clear
    pub fn clear(&mut self, mode: ClearMode) {
        match mode {
            ClearMode::Circuit => {
                for coord in self.engine.size().coords() {
                    if !self.engine.get_cell(coord).is_protected() {
                        self.engine.sub_from_cell(coord, CellFlags::MATERIAL);
                    }
                }
            }
            ClearMode::Protection => {
                for coord in self.engine.size().coords() {
                    self.engine.sub_from_cell(coord, CellFlags::PROTECTED);
                }
                for coord in self.goals.coords() {
                    self.engine.add_to_cell(coord, CellFlags::PROTECTED);
                }
            }
            ClearMode::Goals => {
                for coord in self.goals.coords() {
                    self.engine.sub_from_cell(coord, CellFlags::GOAL);
                }
                self.goals.clear();
            }
        }

        self.mark_edited();
        log::info!("cleared {}", mode.as_str());
    }

    /// Guarded single-cell edit shared by lines and erase
    fn edit_cell(&mut self, coord: Coord, set_to: bool, force: bool) {
        let protected = self.engine.get_cell(coord).is_protected();
        if protected && !force {
            return;
        }

        if set_to {
            self.engine.add_to_cell(coord, CellFlags::WIRE);
        } else {
            self.engine
                .sub_from_cell(coord, CellFlags::WIRE | CellFlags::GOAL | CellFlags::SIGNAL);
            self.release_goal(coord);
        }
    }

    /// Unregister the goal at `coord` and clear its flag
    fn release_goal(&mut self, coord: Coord) {
        if self.goals.remove(coord).is_some() {
            self.engine.sub_from_cell(coord, CellFlags::GOAL);
        }
    }

    /// Normalized corners of a rectangle with both corners on the grid
    fn region(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> Option<(Coord, Coord)> {
        let size = self.engine.size();
        let a = size.coord(x1, y1)?;
        let b = size.coord(x2, y2)?;
        Some((
            Coord::new(a.x.min(b.x), a.y.min(b.y)),
            Coord::new(a.x.max(b.x), a.y.max(b.y)),
        ))
    }

    fn mark_edited(&mut self) {
        self.dirty.mark_all();
    }
}
