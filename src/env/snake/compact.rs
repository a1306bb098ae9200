//! Batch compaction
//!
//! Removes ended games from every parallel store with one shared mask, so
//! that row `i` keeps naming the same game in the grid, the body store, the
//! end indices and the food locations. Survivors keep their relative order.

use super::{body::BodyStore, grid::Grid, types::Position};

/// What a compaction pass did to the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compaction {
    /// No game ended this step
    Unchanged,
    /// Some games ended and were removed
    Removed {
        /// Rows dropped
        removed: usize,
        /// Rows left
        remaining: usize,
    },
    /// Every game ended; the stores were left as they are for inspection
    AllEnded,
}

/// Stable in-place filter over a buffer of fixed-size rows
///
/// `data` holds `keep.len()` consecutive chunks of `chunk` elements. Chunks
/// whose flag is `false` are dropped and the rest are packed to the front.
pub fn retain_chunks<T: Copy>(data: &mut Vec<T>, chunk: usize, keep: &[bool]) {
    debug_assert_eq!(data.len(), chunk * keep.len());
    let mut write = 0;
    for (read, &kept) in keep.iter().enumerate() {
        if !kept {
            continue;
        }
        if write != read {
            data.copy_within(read * chunk..(read + 1) * chunk, write * chunk);
        }
        write += 1;
    }
    data.truncate(write * chunk);
}

/// Drop every row flagged in `game_end` from all stores at once
pub fn compact(
    game_end: &[bool],
    grid: &mut Grid,
    body: &mut BodyStore,
    food: &mut Vec<Position>,
) -> Compaction {
    let removed = game_end.iter().filter(|&&ended| ended).count();
    if removed == 0 {
        return Compaction::Unchanged;
    }
    if removed == game_end.len() {
        return Compaction::AllEnded;
    }

    let keep: Vec<bool> = game_end.iter().map(|&ended| !ended).collect();
    grid.retain_rows(&keep);
    body.retain_rows(&keep);
    retain_chunks(food, 1, &keep);

    Compaction::Removed { removed, remaining: keep.len() - removed }
}
