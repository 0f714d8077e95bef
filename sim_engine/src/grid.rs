//! In-memory reference engine

use crate::engine::SimEngine;
use circuit_types::{CellFlags, Coord, GridSize};

/// Transition rule applied to the whole cell buffer on every tick
pub type TickRule = Box<dyn FnMut(&mut [CellFlags], GridSize)>;

/// In-memory simulation engine
///
/// Stores one [`CellFlags`] per cell and delegates the tick transition to a
/// pluggable [`TickRule`]. Without a rule a tick only advances the counter,
/// which is what editor tests and headless hosts need.
///
/// The one-cell border is reserved for layout: reads are valid anywhere,
/// writes to border cells are dropped.
///
/// # Examples
///
/// ```
/// use circuit_types::{CellFlags, Coord, GridSize};
/// use sim_engine::{GridEngine, SimEngine};
///
/// let mut engine = GridEngine::new(GridSize::new(8, 8));
/// engine.add_to_cell(Coord::new(2, 2), CellFlags::WIRE);
/// engine.tick();
///
/// assert!(engine.get_cell(Coord::new(2, 2)).has_wire());
/// assert_eq!(engine.tick_count(), 1);
/// ```
pub struct GridEngine {
    size: GridSize,
    cells: Vec<CellFlags>,
    ticks: u64,
    rule: Option<TickRule>,
}

impl GridEngine {
    /// Creates an empty engine
    ///
    /// # Panics
    ///
    /// Panics if `size` is below the minimum grid size or its cell count
    /// overflows `usize`.
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: Self::allocate(size),
            ticks: 0,
            rule: None,
        }
    }

    /// Creates an empty engine driven by `rule`
    pub fn with_rule(size: GridSize, rule: TickRule) -> Self {
        let mut engine = Self::new(size);
        engine.rule = Some(rule);
        engine
    }

    /// Replaces the tick rule
    pub fn set_rule(&mut self, rule: TickRule) {
        self.rule = Some(rule);
    }

    /// Number of ticks performed since creation
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Raw cell buffer in row-major order
    pub fn cells(&self) -> &[CellFlags] {
        &self.cells
    }

    fn allocate(size: GridSize) -> Vec<CellFlags> {
        assert!(
            size.is_valid(),
            "Grid size {} is below the minimum dimension",
            size
        );
        let count = size.cell_count().expect("Grid cell count overflows");
        vec![CellFlags::empty(); count]
    }

    fn writable_index(&self, coord: Coord) -> Option<usize> {
        debug_assert!(
            self.size.contains(coord),
            "Cell {} is out of bounds for {}",
            coord,
            self.size
        );
        if self.size.is_interior(coord) {
            Some(self.size.index(coord))
        } else {
            None
        }
    }
}

impl SimEngine for GridEngine {
    fn size(&self) -> GridSize {
        self.size
    }

    fn resize(&mut self, size: GridSize) {
        let mut cells = Self::allocate(size);

        let copy_width = self.size.width.min(size.width);
        let copy_height = self.size.height.min(size.height);
        for y in 1..copy_height.saturating_sub(1) {
            for x in 1..copy_width.saturating_sub(1) {
                let coord = Coord::new(x, y);
                if size.is_interior(coord) {
                    cells[size.index(coord)] = self.cells[self.size.index(coord)];
                }
            }
        }

        log::trace!("engine resized from {} to {}", self.size, size);
        self.size = size;
        self.cells = cells;
    }

    fn tick(&mut self) {
        self.ticks += 1;
        if let Some(rule) = self.rule.as_mut() {
            rule(&mut self.cells, self.size);
        }
    }

    fn get_cell(&self, coord: Coord) -> CellFlags {
        debug_assert!(
            self.size.contains(coord),
            "Cell {} is out of bounds for {}",
            coord,
            self.size
        );
        self.cells[self.size.index(coord)]
    }

    fn set_cell(&mut self, coord: Coord, flags: CellFlags) {
        if let Some(index) = self.writable_index(coord) {
            self.cells[index] = flags;
        }
    }

    fn add_to_cell(&mut self, coord: Coord, flags: CellFlags) {
        if let Some(index) = self.writable_index(coord) {
            self.cells[index].insert(flags);
        }
    }

    fn sub_from_cell(&mut self, coord: Coord, flags: CellFlags) {
        if let Some(index) = self.writable_index(coord) {
            self.cells[index].remove(flags);
        }
    }

    fn toggle_in_cell(&mut self, coord: Coord, flags: CellFlags) {
        if let Some(index) = self.writable_index(coord) {
            self.cells[index].toggle(flags);
        }
    }

    fn set_in_cell(&mut self, coord: Coord, flags: CellFlags, value: bool) {
        if let Some(index) = self.writable_index(coord) {
            self.cells[index].set(flags, value);
        }
    }
}

impl std::fmt::Debug for GridEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridEngine")
            .field("size", &self.size)
            .field("ticks", &self.ticks)
            .field("has_rule", &self.rule.is_some())
            .finish()
    }
}
