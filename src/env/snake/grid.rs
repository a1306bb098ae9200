//! Coordinate grid
//!
//! The grid is the observable world state of every game: a contiguous
//! `games × height × width` buffer of [`Cell`] codes. The simulation only
//! ever writes to it; collision logic is derived from the body store and
//! food locations, and the grid is kept in sync as a projection of them.

use super::{
    compact::retain_chunks,
    types::{Cell, GridDims, Position},
};

/// Per-game occupancy grids stored back to back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dims: GridDims,
    rows: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Allocate `rows` empty grids
    ///
    /// Call [`Grid::initialize`] before use to draw the walls.
    pub fn new(dims: GridDims, rows: usize) -> Self {
        Self { dims, rows, cells: vec![Cell::Empty.code(); rows * dims.cells()] }
    }

    /// Grid dimensions
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Number of games stored
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Resize to `rows` games; every row must be re-initialized afterwards
    pub fn resize_rows(&mut self, rows: usize) {
        self.rows = rows;
        self.cells.resize(rows * self.dims.cells(), Cell::Empty.code());
    }

    /// Walls on the border, empty interior, for every row
    pub fn initialize(&mut self) {
        let width = self.dims.width;
        let height = self.dims.height;
        for game in self.cells.chunks_exact_mut(self.dims.cells()) {
            for (r, line) in game.chunks_exact_mut(width).enumerate() {
                let border_row = r == 0 || r == height - 1;
                for (c, cell) in line.iter_mut().enumerate() {
                    let border = border_row || c == 0 || c == width - 1;
                    *cell = if border { Cell::Wall.code() } else { Cell::Empty.code() };
                }
            }
        }
    }

    /// Batched write: set `coords[i]` of row `rows[i]` to `cell`
    ///
    /// Coordinates must be in bounds; callers only pass interior cells.
    pub fn mark_cells(&mut self, rows: &[usize], coords: &[Position], cell: Cell) {
        debug_assert_eq!(rows.len(), coords.len());
        for (&row, &pos) in rows.iter().zip(coords) {
            self.mark(row, pos, cell);
        }
    }

    /// Set a single cell
    pub fn mark(&mut self, row: usize, pos: Position, cell: Cell) {
        debug_assert!(self.dims.in_bounds(pos));
        let index = row * self.dims.cells() + self.dims.offset(pos);
        self.cells[index] = cell.code();
    }

    /// Read a single cell
    pub fn cell(&self, row: usize, pos: Position) -> Cell {
        let index = row * self.dims.cells() + self.dims.offset(pos);
        Cell::decode(self.cells[index])
    }

    /// Raw codes of one game, row-major
    pub fn row(&self, row: usize) -> &[u8] {
        let size = self.dims.cells();
        &self.cells[row * size..(row + 1) * size]
    }

    /// Raw codes of every game
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Number of cells in `row` holding `cell`
    pub fn count(&self, row: usize, cell: Cell) -> usize {
        self.row(row).iter().filter(|&&code| code == cell.code()).count()
    }

    /// Keep only rows whose flag is set, preserving order
    pub fn retain_rows(&mut self, keep: &[bool]) {
        retain_chunks(&mut self.cells, self.dims.cells(), keep);
        self.rows = self.cells.len() / self.dims.cells();
    }
}
