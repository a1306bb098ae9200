//! Collision and transition engine
//!
//! A step is split into a pure planning pass and a mutating pass. Planning
//! computes the next heads and the wall, self and food masks for the whole
//! batch without touching any store, which lets the orchestrator reject a
//! step before anything changes. Applying then advances every body, ended
//! or not.

use super::{
    body::BodyStore,
    types::{Direction, GridDims, Position},
};

/// Outcome masks of one planned step, one entry per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Head position after the move
    pub next_heads: Vec<Position>,
    /// Next head lies on the border
    pub wall_hit: Vec<bool>,
    /// Next head lies on the neck-to-tail segment
    pub self_hit: Vec<bool>,
    /// Next head lies on the food
    pub food_hit: Vec<bool>,
    /// `wall_hit || self_hit`
    pub game_end: Vec<bool>,
}

impl Transition {
    /// Rows that keep playing after this step
    pub fn live_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.game_end.iter().enumerate().filter(|(_, ended)| !**ended).map(|(row, _)| row)
    }
}

/// Compute next heads and hit masks for every row
///
/// Self collision compares against slots `1..=end_index` only: the current
/// head (slot 0) is excluded and the current tail is included even though
/// it would be vacated by this very move.
pub fn plan(body: &BodyStore, food: &[Position], dims: GridDims, moves: &[Direction]) -> Transition {
    let rows = body.num_rows();
    debug_assert_eq!(moves.len(), rows);
    debug_assert_eq!(food.len(), rows);

    let next_heads: Vec<Position> =
        moves.iter().enumerate().map(|(row, &dir)| body.head(row).add_direction(dir)).collect();

    let wall_hit: Vec<bool> = next_heads.iter().map(|&head| dims.is_border(head)).collect();
    let self_hit: Vec<bool> =
        next_heads.iter().enumerate().map(|(row, &head)| body.occupies(row, head, 1)).collect();
    let food_hit: Vec<bool> = next_heads.iter().zip(food).map(|(head, food)| head == food).collect();
    let game_end: Vec<bool> = wall_hit.iter().zip(&self_hit).map(|(&wall, &hit)| wall || hit).collect();

    Transition { next_heads, wall_hit, self_hit, food_hit, game_end }
}

/// Advance every body by its planned head
///
/// Returns the tail cell each row vacated, `None` for rows that grew.
pub fn apply(body: &mut BodyStore, transition: &Transition) -> Vec<Option<Position>> {
    transition
        .next_heads
        .iter()
        .zip(&transition.food_hit)
        .enumerate()
        .map(|(row, (&head, &grew))| body.advance(row, head, grew))
        .collect()
}
