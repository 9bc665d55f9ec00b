use serde::{Serialize, Deserialize};
use std::fmt;

/// A cell coordinate on a grid board.
///
/// Coordinates are signed so that a candidate move off the edge of the board
/// can be represented and rejected by bounds checking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: isize,
    pub col: isize,
}

impl Position {
    pub fn new(row: isize, col: isize) -> Self {
        Position { row, col }
    }

    /// The cell one step away in `direction`
    pub fn offset(&self, direction: Direction) -> Position {
        let (dr, dc) = direction.delta();
        Position {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// Index into a board of the given shape, or `None` when outside it
    pub fn index(&self, shape: (usize, usize)) -> Option<(usize, usize)> {
        if self.row < 0 || self.col < 0 {
            return None;
        }
        let (row, col) = (self.row as usize, self.col as usize);
        if row >= shape.0 || col >= shape.1 {
            return None;
        }
        Some((row, col))
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position::new(row as isize, col as isize)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four cardinal moves.
///
/// The discriminants are the indices used by the policy grid:
/// 0 = down, 1 = right, 2 = up, 3 = left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Down = 0,
    Right = 1,
    Up = 2,
    Left = 3,
}

impl Direction {
    /// All directions in index order
    pub const ALL: [Direction; 4] = [Direction::Down, Direction::Right, Direction::Up, Direction::Left];

    /// Row/column delta of the move
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Down => (1, 0),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Direction> {
        Direction::ALL.get(index).copied()
    }

    /// Arrow glyph used by the text renderer
    pub fn arrow(&self) -> char {
        match self {
            Direction::Down => 'v',
            Direction::Right => '>',
            Direction::Up => '^',
            Direction::Left => '<',
        }
    }
}
