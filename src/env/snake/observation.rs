//! Read-only observation views
//!
//! Policies consume the grid either as raw cell codes or as one-hot planes
//! (`games × 4 × height × width`, one channel per cell code) suitable for a
//! convolutional network.

use super::types::{Cell, GridDims, Position};

/// Borrowed view of every game's grid
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    cells: &'a [u8],
    dims: GridDims,
    games: usize,
}

impl<'a> GridView<'a> {
    pub(crate) fn new(cells: &'a [u8], dims: GridDims, games: usize) -> Self {
        debug_assert_eq!(cells.len(), games * dims.cells());
        Self { cells, dims, games }
    }

    /// `[games, height, width]`
    pub fn shape(&self) -> [usize; 3] {
        [self.games, self.dims.height, self.dims.width]
    }

    /// Number of games in view
    pub fn num_games(&self) -> usize {
        self.games
    }

    /// Raw cell codes, game-major then row-major
    pub fn as_slice(&self) -> &'a [u8] {
        self.cells
    }

    /// Raw cell codes of one game
    pub fn game(&self, game: usize) -> &'a [u8] {
        let size = self.dims.cells();
        &self.cells[game * size..(game + 1) * size]
    }

    /// Decoded cell of one game
    pub fn cell(&self, game: usize, pos: Position) -> Cell {
        Cell::decode(self.game(game)[self.dims.offset(pos)])
    }

    /// Count of `cell` in one game
    pub fn count(&self, game: usize, cell: Cell) -> usize {
        self.game(game).iter().filter(|&&code| code == cell.code()).count()
    }

    /// One-hot encode into `games × 4 × height × width` planes
    pub fn to_planes(&self) -> Vec<f32> {
        let plane = self.dims.cells();
        let mut planes = vec![0.0; self.games * Cell::COUNT * plane];
        for game in 0..self.games {
            let base = game * Cell::COUNT * plane;
            for (offset, &code) in self.game(game).iter().enumerate() {
                debug_assert!((code as usize) < Cell::COUNT, "invalid cell code {code}");
                planes[base + code as usize * plane + offset] = 1.0;
            }
        }
        planes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::snake::grid::Grid;

    #[test]
    fn test_view_shape_and_cells() {
        let dims = GridDims::new(4, 5);
        let mut grid = Grid::new(dims, 2);
        grid.initialize();
        grid.mark(1, Position::new(2, 3), Cell::Food);

        let view = GridView::new(grid.as_slice(), dims, 2);
        assert_eq!(view.shape(), [2, 4, 5]);
        assert_eq!(view.cell(1, Position::new(2, 3)), Cell::Food);
        assert_eq!(view.cell(0, Position::new(0, 0)), Cell::Wall);
        assert_eq!(view.count(1, Cell::Food), 1);
        assert_eq!(view.count(0, Cell::Food), 0);
    }

    #[test]
    fn test_planes_one_hot() {
        let dims = GridDims::new(4, 5);
        let mut grid = Grid::new(dims, 1);
        grid.initialize();
        grid.mark(0, Position::new(2, 1), Cell::Body);
        grid.mark(0, Position::new(1, 3), Cell::Food);

        let planes = GridView::new(grid.as_slice(), dims, 1).to_planes();
        assert_eq!(planes.len(), 4 * 20);

        // Every cell is hot in exactly one channel
        for offset in 0..20 {
            let hot: f32 = (0..4).map(|channel| planes[channel * 20 + offset]).sum();
            assert_eq!(hot, 1.0);
        }
        let body_plane = &planes[2 * 20..3 * 20];
        assert_eq!(body_plane.iter().sum::<f32>(), 1.0);
        assert_eq!(body_plane[dims.offset(Position::new(2, 1))], 1.0);
        let wall_plane = &planes[20..40];
        assert_eq!(wall_plane.iter().sum::<f32>(), 14.0);
    }
}
