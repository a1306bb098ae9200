//! # Batch Snake
//!
//! Lock-step batched Snake simulation for fast rollout generation
//!
//! Batch Snake advances many independent Snake games with whole-batch passes
//! over a handful of index-aligned stores instead of per-game objects. Games
//! that end are compacted out of every store in the same step, so row `i`
//! always names the same surviving game everywhere.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batch_snake::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = BatchConfig::new().width(10).height(10).num_games(32).seed(7);
//! let mut batch = SnakeBatch::new(config)?;
//!
//! while !batch.is_finished() {
//!     let moves = vec![Direction::Right.code(); batch.num_games()];
//!     let outcome = batch.step(&moves)?;
//!     println!("{} games ended", outcome.num_ended());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Environment traits and implementations
pub mod env;

/// Prelude module for convenient imports
///
/// This module re-exports commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::env::{
        snake::{
            BatchConfig, Cell, Direction, GameLayout, GridDims, Position, RandomSource,
            RewardConfig, SnakeBatch, SnakeError, StepOutcome,
        },
        BatchEnvironment, BatchStepResult, SpaceInfo, SpaceType,
    };
}

/// Current version of batch-snake
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
