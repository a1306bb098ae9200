//! Basic types for the batched Snake simulation
//!
//! This module defines the fundamental types shared by every store in the
//! batch: move directions, grid coordinates, cell codes and grid dimensions.

/// Unit-step deltas indexed by move code: up, right, down, left.
///
/// Each entry is a `(d_row, d_col)` pair.
pub const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Direction a snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row 0
    Up,
    /// Towards the last column
    Right,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
}

impl Direction {
    /// All directions in move-code order
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Create direction from move code, `None` if the code is not in `0..4`
    pub fn from_action(action: i64) -> Option<Self> {
        match action {
            0 => Some(Direction::Up),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Move code of this direction
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Convert direction to `(d_row, d_col)` delta
    pub fn to_delta(self) -> (i32, i32) {
        DIRECTIONS[self as usize]
    }

    /// Get opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Position on the grid, row 0 being the top border
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Row index
    pub row: i32,
    /// Column index
    pub col: i32,
}

impl Position {
    /// Create new position
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Add direction delta to position
    pub fn add_direction(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.to_delta();
        Self::new(self.row + d_row, self.col + d_col)
    }

    /// Whether `other` is one orthogonal step away
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

/// Cell codes stored in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    /// Free interior cell
    Empty = 0,
    /// Border cell
    Wall = 1,
    /// Snake segment
    Body = 2,
    /// Food pellet
    Food = 3,
}

impl Cell {
    /// Number of distinct cell codes
    pub const COUNT: usize = 4;

    /// Raw code as stored in the grid
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a raw grid value
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Wall),
            2 => Some(Cell::Body),
            3 => Some(Cell::Food),
            _ => None,
        }
    }

    /// Decode a value read back from a grid
    ///
    /// Grids are only written through [`Cell::code`], so any other value is
    /// corruption and trips the debug assertion.
    pub(crate) fn decode(code: u8) -> Self {
        debug_assert!((code as usize) < Cell::COUNT, "invalid cell code {code}");
        Cell::from_code(code).unwrap_or(Cell::Empty)
    }
}

/// Grid dimensions shared by every game in a batch, border included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    /// Rows, border included
    pub height: usize,
    /// Columns, border included
    pub width: usize,
}

impl GridDims {
    /// Create new dimensions
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Cells per game, border included
    pub fn cells(&self) -> usize {
        self.height * self.width
    }

    /// Number of playable (non-border) cells
    pub fn interior_cells(&self) -> usize {
        self.height.saturating_sub(2) * self.width.saturating_sub(2)
    }

    /// Check if position is within the grid, border included
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && (pos.row as usize) < self.height && (pos.col as usize) < self.width
    }

    /// Check if position lies on the border ring
    pub fn is_border(&self, pos: Position) -> bool {
        pos.row == 0
            || pos.col == 0
            || pos.row == self.height as i32 - 1
            || pos.col == self.width as i32 - 1
    }

    /// Check if position is a playable cell
    pub fn is_interior(&self, pos: Position) -> bool {
        self.in_bounds(pos) && !self.is_border(pos)
    }

    /// Flat offset of `pos` within one game's cells
    pub fn offset(&self, pos: Position) -> usize {
        pos.row as usize * self.width + pos.col as usize
    }

    /// Interior positions in row-major order
    pub fn interior_positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(self.interior_cells());
        for row in 1..self.height.saturating_sub(1) {
            for col in 1..self.width.saturating_sub(1) {
                positions.push(Position::new(row as i32, col as i32));
            }
        }
        positions
    }
}
