use ndarray::{array, Array2};
use serde::{Serialize, Deserialize};

use crate::error::{Result, SandboxError};
use crate::types::{Direction, Position};

/// Reward reported for a move that would leave the board
pub const OUT_OF_BOUNDS_REWARD: f32 = -1.0;

/// A cell that relocates the agent on its next move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teleport {
    pub source: Position,
    pub destination: Position,
}

impl Teleport {
    pub fn new(source: Position, destination: Position) -> Self {
        Teleport { source, destination }
    }
}

/// Result of [`GridWorld::step`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// Ordinary move; `reward` belongs to the cell that was left
    Moved { reward: f32 },

    /// The agent stood on a teleport source and was relocated
    Teleported { reward: f32 },

    /// The move would have left the board; position is unchanged
    OutOfBounds,
}

impl MoveOutcome {
    /// Scalar reward, with [`OUT_OF_BOUNDS_REWARD`] standing in for a blocked move
    pub fn reward(&self) -> f32 {
        match self {
            MoveOutcome::Moved { reward } | MoveOutcome::Teleported { reward } => *reward,
            MoveOutcome::OutOfBounds => OUT_OF_BOUNDS_REWARD,
        }
    }

    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, MoveOutcome::OutOfBounds)
    }
}

/// Deterministic grid environment.
///
/// Rewards are paid on exit: a move yields the board value of the cell the
/// agent leaves, never the one it enters.
///
/// Deserialization goes through [`GridWorld::new`], so a stored world with an
/// off-board position or teleport is rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredGridWorld")]
pub struct GridWorld {
    board: Array2<f32>,
    position: Position,
    start: Position,
    teleports: Vec<Teleport>,
}

#[derive(Deserialize)]
struct StoredGridWorld {
    board: Array2<f32>,
    position: Position,
    start: Position,
    teleports: Vec<Teleport>,
}

impl TryFrom<StoredGridWorld> for GridWorld {
    type Error = SandboxError;

    fn try_from(stored: StoredGridWorld) -> Result<Self> {
        let mut world = GridWorld::new(stored.board, stored.start, stored.teleports)?;
        world.set_position(stored.position)?;
        Ok(world)
    }
}

impl GridWorld {
    pub fn new(board: Array2<f32>, start: Position, teleports: Vec<Teleport>) -> Result<Self> {
        if board.is_empty() {
            return Err(SandboxError::invalid_parameter("board", "must have at least one cell"));
        }
        let shape = board.dim();

        let check = |name: &str, position: Position| -> Result<()> {
            position.index(shape).map(|_| ()).ok_or_else(|| {
                SandboxError::invalid_parameter(
                    name.to_string(),
                    format!("{} lies outside a {}x{} board", position, shape.0, shape.1),
                )
            })
        };

        check("start", start)?;
        for (i, teleport) in teleports.iter().enumerate() {
            check("teleport.source", teleport.source)?;
            check("teleport.destination", teleport.destination)?;
            if teleports[..i].iter().any(|t| t.source == teleport.source) {
                return Err(SandboxError::invalid_parameter(
                    "teleports".to_string(),
                    format!("duplicate teleport source {}", teleport.source),
                ));
            }
        }

        Ok(GridWorld {
            board,
            position: start,
            start,
            teleports,
        })
    }

    /// The 5x5 "Book World": two rewarding key cells that teleport the agent
    /// away, starting from the centre.
    pub fn book_world() -> Self {
        let mut board = Array2::zeros((5, 5));
        board[[0, 1]] = 10.0;
        board[[0, 3]] = 5.0;

        let teleports = vec![
            Teleport::new(Position::new(0, 1), Position::new(4, 1)),
            Teleport::new(Position::new(0, 3), Position::new(2, 3)),
        ];

        GridWorld {
            board,
            position: Position::new(2, 2),
            start: Position::new(2, 2),
            teleports,
        }
    }

    /// Apply one move.
    ///
    /// Teleports are resolved before the direction is considered at all.
    pub fn step(&mut self, direction: Direction) -> MoveOutcome {
        let old = self.position;

        if let Some(teleport) = self.teleport_at(old) {
            self.position = teleport.destination;
            return MoveOutcome::Teleported { reward: self.reward_at(old) };
        }

        let candidate = old.offset(direction);
        if !self.in_bounds(candidate) {
            return MoveOutcome::OutOfBounds;
        }

        self.position = candidate;
        MoveOutcome::Moved { reward: self.reward_at(old) }
    }

    /// Teleport whose source is `position`, if any
    pub fn teleport_at(&self, position: Position) -> Option<&Teleport> {
        self.teleports.iter().find(|t| t.source == position)
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.index(self.shape()).is_some()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.board.dim()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) -> Result<()> {
        if !self.in_bounds(position) {
            return Err(SandboxError::OutOfBounds { row: position.row, col: position.col });
        }
        self.position = position;
        Ok(())
    }

    /// Return the agent to its starting cell
    pub fn reset(&mut self) {
        self.position = self.start;
    }

    pub fn board(&self) -> &Array2<f32> {
        &self.board
    }

    pub fn teleports(&self) -> &[Teleport] {
        &self.teleports
    }

    fn reward_at(&self, position: Position) -> f32 {
        // Every constructor and `step` keep the position on the board.
        self.board[[position.row as usize, position.col as usize]]
    }
}

/// Book World state values under the uniform-random policy.
///
/// These are the textbook values for γ = 0.9; at any other discount rate the
/// learned table settles elsewhere and the error curve levels off above zero.
pub fn random_policy_reference() -> Array2<f32> {
    array![
        [3.3, 8.8, 4.4, 5.3, 1.5],
        [1.5, 3.0, 2.3, 1.9, 0.5],
        [0.1, 0.7, 0.7, 0.4, -0.4],
        [-1.0, -0.4, -0.4, -0.6, -1.2],
        [-1.9, -1.3, -1.2, -1.4, -2.0],
    ]
}

/// Book World state values under the optimal policy, for γ = 0.9
pub fn value_weighted_reference() -> Array2<f32> {
    array![
        [22.0, 24.0, 22.0, 19.4, 17.5],
        [19.8, 22.0, 19.8, 17.8, 16.0],
        [17.8, 19.8, 17.8, 16.0, 14.4],
        [16.0, 17.8, 16.0, 14.4, 13.0],
        [14.4, 16.0, 14.4, 13.0, 11.7],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_world_layout() {
        let world = GridWorld::book_world();
        assert_eq!(world.shape(), (5, 5));
        assert_eq!(world.position(), Position::new(2, 2));
        assert_eq!(world.board()[[0, 1]], 10.0);
        assert_eq!(world.board()[[0, 3]], 5.0);
        assert_eq!(world.board().sum(), 15.0);
        assert_eq!(world.teleports().len(), 2);
    }

    #[test]
    fn test_reward_paid_on_exit() {
        let mut world = GridWorld::book_world();
        world.set_position(Position::new(1, 1)).unwrap();

        // Entering the key cell pays nothing; leaving it pays its value.
        assert_eq!(world.step(Direction::Up), MoveOutcome::Moved { reward: 0.0 });
        assert_eq!(world.position(), Position::new(0, 1));
        assert_eq!(world.step(Direction::Left), MoveOutcome::Teleported { reward: 10.0 });
        assert_eq!(world.position(), Position::new(4, 1));
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut world = GridWorld::book_world();
        world.step(Direction::Down);
        assert_ne!(world.position(), Position::new(2, 2));
        world.reset();
        assert_eq!(world.position(), Position::new(2, 2));
    }

    #[test]
    fn test_invalid_construction() {
        let board = Array2::zeros((3, 3));
        assert!(GridWorld::new(board.clone(), Position::new(3, 0), vec![]).is_err());

        let off_board = vec![Teleport::new(Position::new(0, 0), Position::new(0, 7))];
        assert!(GridWorld::new(board.clone(), Position::new(1, 1), off_board).is_err());

        let duplicate = vec![
            Teleport::new(Position::new(0, 0), Position::new(2, 2)),
            Teleport::new(Position::new(0, 0), Position::new(1, 2)),
        ];
        assert!(GridWorld::new(board.clone(), Position::new(1, 1), duplicate).is_err());

        assert!(GridWorld::new(Array2::zeros((0, 0)), Position::new(0, 0), vec![]).is_err());
    }

    #[test]
    fn test_stored_world_is_validated() {
        let world = GridWorld::book_world();
        let json = serde_json::to_string(&world).unwrap();
        let restored: GridWorld = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, world);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["position"] = serde_json::json!({ "row": -1, "col": 1 });
        assert!(serde_json::from_value::<GridWorld>(value).is_err());

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["teleports"][0]["destination"] = serde_json::json!({ "row": 5, "col": 1 });
        assert!(serde_json::from_value::<GridWorld>(value).is_err());
    }

    #[test]
    fn test_set_position_rejects_outside_cells() {
        let mut world = GridWorld::book_world();
        let err = world.set_position(Position::new(-1, 0)).unwrap_err();
        assert_eq!(err, SandboxError::OutOfBounds { row: -1, col: 0 });
        assert_eq!(world.position(), Position::new(2, 2));
    }
}
