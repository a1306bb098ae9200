//! Food allocation
//!
//! At reset every game draws two distinct interior cells, one for the head
//! and one for the food. After a meal the new food is drawn from the
//! interior cells the snake does not cover. That candidate set differs per
//! game, so placement is a loop over the games that ate.

use anyhow::Result;

use super::{
    body::BodyStore,
    error::SnakeError,
    random::RandomSource,
    types::{GridDims, Position},
};

/// Picks free interior cells for food placement
#[derive(Debug, Clone)]
pub struct FoodAllocator {
    dims: GridDims,
    /// Interior positions, row-major
    interior: Vec<Position>,
}

impl FoodAllocator {
    /// Create an allocator for grids of `dims`
    pub fn new(dims: GridDims) -> Self {
        Self { dims, interior: dims.interior_positions() }
    }

    /// Playable cells, row-major
    pub fn interior(&self) -> &[Position] {
        &self.interior
    }

    /// Draw `(head, food)` for a fresh game, never equal
    pub fn spawn(&self, source: &mut impl RandomSource) -> (Position, Position) {
        let (food, head) = source.pick_distinct_pair(self.interior.len());
        (self.interior[head], self.interior[food])
    }

    /// Interior cells not covered by the valid body of `row`
    pub fn free_cells(&self, body: &BodyStore, row: usize) -> Vec<Position> {
        let mut occupied = vec![false; self.dims.cells()];
        for segment in body.segments(row) {
            occupied[self.dims.offset(segment)] = true;
        }
        self.interior.iter().copied().filter(|&pos| !occupied[self.dims.offset(pos)]).collect()
    }

    /// Draw a new food location for `row`
    pub fn relocate(
        &self,
        body: &BodyStore,
        row: usize,
        source: &mut impl RandomSource,
    ) -> Result<Position> {
        let free = self.free_cells(body, row);
        if free.is_empty() {
            return Err(SnakeError::NoFreeCell { game: row }.into());
        }
        Ok(free[source.pick(free.len())])
    }

    /// Place food for every row flagged in `ate`, writing into `food`
    ///
    /// Returns the rows that received new food.
    pub fn relocate_eaten(
        &self,
        body: &BodyStore,
        food: &mut [Position],
        ate: &[bool],
        source: &mut impl RandomSource,
    ) -> Result<Vec<usize>> {
        let mut placed = Vec::new();
        for (row, &hit) in ate.iter().enumerate() {
            if !hit {
                continue;
            }
            food[row] = self.relocate(body, row, source)?;
            placed.push(row);
        }
        Ok(placed)
    }
}
