//! Injected randomness for food and head placement
//!
//! The simulation never reaches for a global RNG. Every batch owns a
//! [`RandomSource`], which is any `rand::Rng` in production and a
//! [`ScriptedSource`] when a test needs exact placements.

use std::collections::VecDeque;

/// Uniform sampling from a dynamically-sized candidate set
pub trait RandomSource {
    /// Pick an index uniformly from `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Pick two distinct indices uniformly from `0..len`, `len >= 2`
    fn pick_distinct_pair(&mut self, len: usize) -> (usize, usize) {
        let first = self.pick(len);
        let mut second = self.pick(len - 1);
        if second >= first {
            second += 1;
        }
        (first, second)
    }
}

impl<R: rand::Rng> RandomSource for R {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Replays a fixed list of picks
///
/// Each value is reduced modulo the requested length, so a script written
/// for one candidate set stays in range for another. An exhausted script
/// keeps returning 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    picks: VecDeque<usize>,
}

impl ScriptedSource {
    /// Create a source that yields `picks` in order
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self { picks: picks.into_iter().collect() }
    }

    /// Append more picks to the script
    pub fn push(&mut self, pick: usize) {
        self.picks.push_back(pick);
    }

    /// Number of picks not yet consumed
    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl RandomSource for ScriptedSource {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }
}
