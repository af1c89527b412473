//! Per-cell elevation tables and the fixed tile grid of a block.

use super::{BLOCK_NUM_TILES_X, BLOCK_NUM_TILES_Y};

/// Number of elevation levels in every table
pub const ELEVATION_COUNT: usize = 256;

/// Stacks of tile references for elevations 0 through 255.
///
/// Always holds exactly [`ELEVATION_COUNT`] entries; an entry may be empty.
/// Within a stack the first reference is drawn first (bottom).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationTable<T> {
    layers: Vec<Vec<T>>,
}

impl<T> ElevationTable<T> {
    /// A table with every elevation empty.
    pub fn new() -> Self {
        Self { layers: (0..ELEVATION_COUNT).map(|_| Vec::new()).collect() }
    }

    /// The stack at `elevation`.
    pub fn layer(&self, elevation: u8) -> &[T] {
        &self.layers[elevation as usize]
    }

    /// Replace the stack at `elevation`.
    pub fn set_layer(&mut self, elevation: u8, stack: Vec<T>) {
        self.layers[elevation as usize] = stack;
    }

    /// Builder form of [`ElevationTable::set_layer`].
    pub fn with_layer(mut self, elevation: u8, stack: Vec<T>) -> Self {
        self.set_layer(elevation, stack);
        self
    }

    /// Iterate `(elevation, stack)` for all 256 elevations.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[T])> {
        self.layers.iter().enumerate().map(|(e, stack)| (e as u8, stack.as_slice()))
    }

    /// Iterate only the elevations that hold at least one reference.
    pub fn occupied(&self) -> impl Iterator<Item = (u8, &[T])> {
        self.iter().filter(|(_, stack)| !stack.is_empty())
    }

    /// True when no elevation holds a reference.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Vec::is_empty)
    }

    /// Total number of references across all elevations.
    pub fn ref_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> ElevationTable<U> {
        ElevationTable { layers: self.layers.iter().map(|s| s.iter().map(&mut f).collect()).collect() }
    }
}

impl<T> Default for ElevationTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The `BLOCK_NUM_TILES_X` x `BLOCK_NUM_TILES_Y` cells of a block, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid<T> {
    cells: Vec<ElevationTable<T>>,
}

impl<T> TileGrid<T> {
    pub fn new() -> Self {
        Self { cells: (0..BLOCK_NUM_TILES_X * BLOCK_NUM_TILES_Y).map(|_| ElevationTable::new()).collect() }
    }

    /// The cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is outside the block.
    pub fn get(&self, x: usize, y: usize) -> &ElevationTable<T> {
        assert!(x < BLOCK_NUM_TILES_X && y < BLOCK_NUM_TILES_Y, "cell ({x}, {y}) outside block");
        &self.cells[y * BLOCK_NUM_TILES_X + x]
    }

    /// Mutable access to the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is outside the block.
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut ElevationTable<T> {
        assert!(x < BLOCK_NUM_TILES_X && y < BLOCK_NUM_TILES_Y, "cell ({x}, {y}) outside block");
        &mut self.cells[y * BLOCK_NUM_TILES_X + x]
    }

    /// Iterate `(x, y, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &ElevationTable<T>)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (i % BLOCK_NUM_TILES_X, i / BLOCK_NUM_TILES_X, cell))
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> TileGrid<U> {
        TileGrid { cells: self.cells.iter().map(|cell| cell.map(&mut f)).collect() }
    }

    pub(crate) fn from_cells(cells: Vec<ElevationTable<T>>) -> Self {
        debug_assert_eq!(cells.len(), BLOCK_NUM_TILES_X * BLOCK_NUM_TILES_Y);
        Self { cells }
    }
}

impl<T> Default for TileGrid<T> {
    fn default() -> Self {
        Self::new()
    }
}
