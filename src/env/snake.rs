//! Batched Snake environment
//!
//! Many independent single-player Snake games advanced in lock-step.
//! - Walled grid, one food cell per game
//! - Each snake grows by one segment when eating food
//! - A game ends when its snake hits a wall or its own body
//! - Ended games are compacted out of the batch at the end of the step
//!
//! Games are not objects: the batch keeps a few index-aligned stores (grid,
//! body rings with end indices, food locations) and every operation is a
//! pass over those stores.

use anyhow::Result;

// Re-export main components
pub use compact::Compaction;
pub use config::{BatchConfig, RewardConfig};
pub use environment::{GameLayout, SnakeBatch, StepOutcome};
pub use error::SnakeError;
pub use observation::GridView;
pub use random::{RandomSource, ScriptedSource};
pub use types::{Cell, Direction, GridDims, Position, DIRECTIONS};

// Submodules
pub mod body;
pub mod compact;
mod config;
pub mod engine;
mod environment;
mod error;
pub mod food;
pub mod grid;
mod observation;
mod random;
mod types;

/// Create a snake batch of `num_games` games on a `width`×`height` grid
pub fn make_snake_batch(width: usize, height: usize, num_games: usize) -> Result<SnakeBatch> {
    SnakeBatch::new(BatchConfig::new().width(width).height(height).num_games(num_games))
}
