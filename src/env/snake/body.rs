//! Snake body store
//!
//! Every game owns a fixed-capacity ring of coordinates. Logical slot 0 is
//! the head and slots `1..=end_index` run from neck to tail; anything past
//! `end_index` is stale and is never read.
//!
//! Advancing a snake moves the ring's start back by one and writes the new
//! head there. Without growth the old tail simply falls off the valid range;
//! with growth `end_index` grows by one so the old tail stays valid. This is
//! O(1) per game instead of shifting the whole body.

use super::{compact::retain_chunks, types::Position};

/// Ordered occupied-cell history of every game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyStore {
    /// Ring capacity per game
    capacity: usize,
    /// Ring storage, `capacity` slots per game
    slots: Vec<Position>,
    /// Physical index of logical slot 0 within each ring
    start: Vec<usize>,
    /// Last valid logical slot, body length minus one
    end_index: Vec<usize>,
}

impl BodyStore {
    /// Allocate `rows` rings of `capacity` slots, each a one-segment snake
    /// at the origin
    pub fn new(capacity: usize, rows: usize) -> Self {
        Self {
            capacity,
            slots: vec![Position::default(); capacity * rows],
            start: vec![0; rows],
            end_index: vec![0; rows],
        }
    }

    /// Number of games stored
    pub fn num_rows(&self) -> usize {
        self.end_index.len()
    }

    /// Slots per game
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resize to `rows` games; every row must be reset afterwards
    pub fn resize_rows(&mut self, rows: usize) {
        self.slots.resize(self.capacity * rows, Position::default());
        self.start.resize(rows, 0);
        self.end_index.resize(rows, 0);
    }

    /// Make `row` a single-segment snake at `head`
    pub fn reset_row(&mut self, row: usize, head: Position) {
        self.start[row] = 0;
        self.end_index[row] = 0;
        self.slots[row * self.capacity] = head;
    }

    /// Load `segments` (head first) into `row`
    pub fn place(&mut self, row: usize, segments: &[Position]) {
        debug_assert!(!segments.is_empty() && segments.len() <= self.capacity);
        let base = row * self.capacity;
        self.slots[base..base + segments.len()].copy_from_slice(segments);
        self.start[row] = 0;
        self.end_index[row] = segments.len() - 1;
    }

    /// Head of `row` (logical slot 0)
    pub fn head(&self, row: usize) -> Position {
        self.slot(row, 0)
    }

    /// Last valid slot of `row`
    pub fn end_index(&self, row: usize) -> usize {
        self.end_index[row]
    }

    /// End indices of every row
    pub fn end_indices(&self) -> &[usize] {
        &self.end_index
    }

    /// Tail of `row` (logical slot `end_index`)
    pub fn tail(&self, row: usize) -> Position {
        self.slot(row, self.end_index[row])
    }

    /// Logical slot `k` of `row`
    pub fn slot(&self, row: usize, k: usize) -> Position {
        let physical = (self.start[row] + k) % self.capacity;
        self.slots[row * self.capacity + physical]
    }

    /// Valid segments of `row`, head to tail
    pub fn segments(&self, row: usize) -> impl Iterator<Item = Position> + '_ {
        (0..=self.end_index[row]).map(move |k| self.slot(row, k))
    }

    /// Whether `pos` equals a valid slot of `row` at or after `from_slot`
    pub fn occupies(&self, row: usize, pos: Position, from_slot: usize) -> bool {
        (from_slot..=self.end_index[row]).any(|k| self.slot(row, k) == pos)
    }

    /// Push `new_head` onto `row`
    ///
    /// Without growth the previous tail leaves the valid range and is
    /// returned so the caller can erase it from the grid. With growth the
    /// tail is kept and `end_index` increments.
    pub fn advance(&mut self, row: usize, new_head: Position, grew: bool) -> Option<Position> {
        let vacated = if grew {
            debug_assert!(self.end_index[row] + 1 < self.capacity);
            self.end_index[row] += 1;
            None
        } else {
            Some(self.tail(row))
        };
        self.start[row] = (self.start[row] + self.capacity - 1) % self.capacity;
        self.slots[row * self.capacity + self.start[row]] = new_head;
        vacated
    }

    /// Keep only rows whose flag is set, preserving order
    pub fn retain_rows(&mut self, keep: &[bool]) {
        retain_chunks(&mut self.slots, self.capacity, keep);
        retain_chunks(&mut self.start, 1, keep);
        retain_chunks(&mut self.end_index, 1, keep);
    }
}
