//! Engine contract

use circuit_types::{CellFlags, Coord, GridSize};

/// Simulation engine contract
///
/// The engine owns cell storage and the tick transition rule. Callers must
/// pass coordinates inside [`SimEngine::size`]; the engine is not required
/// to bounds-check them.
///
/// The flag-editing operations have default implementations in terms of
/// [`SimEngine::get_cell`] and [`SimEngine::set_cell`]. Engines with cheaper
/// native forms may override them.
pub trait SimEngine {
    /// Returns the current grid dimensions
    fn size(&self) -> GridSize;

    /// Re-registers the cell buffer with new dimensions
    fn resize(&mut self, size: GridSize);

    /// Advances the simulation by one step
    fn tick(&mut self);

    /// Reads the raw flags of a cell
    fn get_cell(&self, coord: Coord) -> CellFlags;

    /// Overwrites the flags of a cell
    fn set_cell(&mut self, coord: Coord, flags: CellFlags);

    /// Sets `flags` in a cell (bitwise OR)
    fn add_to_cell(&mut self, coord: Coord, flags: CellFlags) {
        let cell = self.get_cell(coord);
        self.set_cell(coord, cell | flags);
    }

    /// Clears `flags` in a cell (bitwise AND-NOT)
    fn sub_from_cell(&mut self, coord: Coord, flags: CellFlags) {
        let cell = self.get_cell(coord);
        self.set_cell(coord, cell.difference(flags));
    }

    /// Flips `flags` in a cell
    fn toggle_in_cell(&mut self, coord: Coord, flags: CellFlags) {
        let mut cell = self.get_cell(coord);
        cell.toggle(flags);
        self.set_cell(coord, cell);
    }

    /// Sets or clears `flags` in a cell
    fn set_in_cell(&mut self, coord: Coord, flags: CellFlags, value: bool) {
        let mut cell = self.get_cell(coord);
        cell.set(flags, value);
        self.set_cell(coord, cell);
    }
}

impl<E: SimEngine + ?Sized> SimEngine for Box<E> {
    fn size(&self) -> GridSize {
        (**self).size()
    }

    fn resize(&mut self, size: GridSize) {
        (**self).resize(size)
    }

    fn tick(&mut self) {
        (**self).tick()
    }

    fn get_cell(&self, coord: Coord) -> CellFlags {
        (**self).get_cell(coord)
    }

    fn set_cell(&mut self, coord: Coord, flags: CellFlags) {
        (**self).set_cell(coord, flags)
    }

    fn add_to_cell(&mut self, coord: Coord, flags: CellFlags) {
        (**self).add_to_cell(coord, flags)
    }

    fn sub_from_cell(&mut self, coord: Coord, flags: CellFlags) {
        (**self).sub_from_cell(coord, flags)
    }

    fn toggle_in_cell(&mut self, coord: Coord, flags: CellFlags) {
        (**self).toggle_in_cell(coord, flags)
    }

    fn set_in_cell(&mut self, coord: Coord, flags: CellFlags, value: bool) {
        (**self).set_in_cell(coord, flags, value)
    }
}
