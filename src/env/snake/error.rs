//! Errors raised by the batched Snake simulation
//!
//! All of these are caller bugs or exhausted preconditions rather than
//! transient conditions, so nothing here is retried. They travel inside
//! `anyhow::Error` and can be recovered with `downcast_ref::<SnakeError>()`.

use thiserror::Error;

/// Fatal simulation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnakeError {
    /// The moves slice does not have one entry per live game
    #[error("expected {expected} moves (one per live game), got {actual}")]
    MoveCountMismatch {
        /// Current batch size
        expected: usize,
        /// Number of moves supplied
        actual: usize,
    },
    /// A move code outside `0..4`
    #[error("game {game}: move code {code} is not in 0..4")]
    InvalidMove {
        /// Row of the offending move
        game: usize,
        /// The rejected code
        code: i64,
    },
    /// Food must be placed but the snake covers every interior cell
    #[error("game {game}: no free interior cell left for food")]
    NoFreeCell {
        /// Row of the full board
        game: usize,
    },
    /// Every game has ended; `reset()` is required before stepping again
    #[error("all games have ended, reset the batch")]
    BatchFinished,
    /// An explicit game layout is not a valid Snake position
    #[error("layout {game}: {reason}")]
    InvalidLayout {
        /// Index of the layout
        game: usize,
        /// What is wrong with it
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_downcast() {
        let err: anyhow::Error = SnakeError::InvalidMove { game: 2, code: 7 }.into();
        assert_eq!(err.to_string(), "game 2: move code 7 is not in 0..4");
        assert_eq!(
            SnakeError::MoveCountMismatch { expected: 3, actual: 1 }.to_string(),
            "expected 3 moves (one per live game), got 1"
        );
        assert_eq!(SnakeError::NoFreeCell { game: 0 }.to_string(), "game 0: no free interior cell left for food");
        assert_eq!(SnakeError::BatchFinished.to_string(), "all games have ended, reset the batch");
        assert_eq!(
            err.downcast_ref::<SnakeError>(),
            Some(&SnakeError::InvalidMove { game: 2, code: 7 })
        );
    }
}
