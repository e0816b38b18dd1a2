//! Placement grid holding the reconstructed layout
//!
//! Cells are addressed `(col, row)` and hold an optional tile id. The grid
//! refuses to overwrite a filled cell and refuses to place a tile twice, so
//! every id appears at most once.

use bitvec::vec::BitVec;
use ndarray::Array2;

use crate::io::error::{Result, out_of_range};

/// Result of a single placement attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The tile now occupies the cell
    Placed,
    /// The cell already holds another tile
    CellOccupied,
    /// The tile already sits in a different cell
    AlreadyPlaced,
}

/// 2D arrangement of tile ids
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementGrid {
    /// Tile ids indexed by `[row, col]`
    cells: Array2<Option<usize>>,
    /// Which tile ids are already placed
    placed: BitVec,
}

impl PlacementGrid {
    /// Create an empty grid for `tile_count` tiles
    pub fn new(cols: usize, rows: usize, tile_count: usize) -> Self {
        let mut placed = BitVec::with_capacity(tile_count);
        placed.resize(tile_count, false);
        Self {
            cells: Array2::from_elem((rows, cols), None),
            placed,
        }
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Whether `(col, row)` lies inside the grid
    pub fn in_bounds(&self, col: usize, row: usize) -> bool {
        col < self.cols() && row < self.rows()
    }

    /// Tile placed at `(col, row)`, `None` when empty or out of bounds
    pub fn get(&self, col: usize, row: usize) -> Option<usize> {
        self.cells.get([row, col]).copied().flatten()
    }

    /// Whether a tile id has been placed anywhere
    pub fn is_placed(&self, tile: usize) -> bool {
        self.placed.get(tile).is_some_and(|bit| *bit)
    }

    /// Put a tile into an empty cell
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error if the cell lies outside the grid or the
    /// tile id exceeds the tile count the grid was created for
    pub fn place(&mut self, col: usize, row: usize, tile: usize) -> Result<PlacementOutcome> {
        let (cols, rows) = (self.cols(), self.rows());
        let tile_count = self.placed.len();
        if tile >= tile_count {
            return Err(out_of_range("tile id", &tile, &tile_count));
        }
        let cell = self
            .cells
            .get_mut([row, col])
            .ok_or_else(|| out_of_range("placement cell", &(col, row), &(cols, rows)))?;

        if cell.is_some() {
            return Ok(PlacementOutcome::CellOccupied);
        }
        if self.placed.get(tile).is_some_and(|bit| *bit) {
            return Ok(PlacementOutcome::AlreadyPlaced);
        }

        *cell = Some(tile);
        self.placed.set(tile, true);
        Ok(PlacementOutcome::Placed)
    }

    /// Cell holding a tile id, if it was placed
    pub fn position_of(&self, tile: usize) -> Option<(usize, usize)> {
        if !self.is_placed(tile) {
            return None;
        }
        self.cells
            .indexed_iter()
            .find(|(_, cell)| **cell == Some(tile))
            .map(|((row, col), _)| (col, row))
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.placed.count_ones()
    }

    /// Empty cells as `(col, row)` in row-major order
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_none())
            .map(|((row, col), _)| (col, row))
            .collect()
    }

    /// Tile ids never placed, ascending
    pub fn unplaced_tiles(&self) -> Vec<usize> {
        self.placed.iter_zeros().collect()
    }

    /// All cells as `((col, row), tile)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), Option<usize>)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((col, row), *cell))
    }
}
