use ndarray::{Array2, ArrayView2};
use rand::{Rng, RngCore};
use serde::{Serialize, Deserialize};

use crate::error::{Result, SandboxError};
use crate::types::{Direction, Position};

/// Score given to a neighbour that lies outside the board
const OFF_BOARD_SCORE: f32 = -1.0;

/// Action-selection strategy consulted by the TD learner
pub trait Policy {
    /// Choose a direction for the agent standing at `position`.
    ///
    /// `values` is the learner's current value table and has the board's shape.
    fn select_direction(
        &self,
        values: ArrayView2<f32>,
        position: Position,
        rng: &mut dyn RngCore,
    ) -> Result<Direction>;

    fn name(&self) -> &'static str;
}

/// Uniformly random direction, ignoring the value table
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn select_direction(
        &self,
        _values: ArrayView2<f32>,
        _position: Position,
        rng: &mut dyn RngCore,
    ) -> Result<Direction> {
        Ok(Direction::ALL[rng.gen_range(0..Direction::ALL.len())])
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Picks a neighbour with probability proportional to its value, considering
/// only in-bounds neighbours whose value is positive.
///
/// Fails with [`SandboxError::NoPositiveNeighbor`] when no neighbour qualifies.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueWeightedPolicy;

impl Policy for ValueWeightedPolicy {
    fn select_direction(
        &self,
        values: ArrayView2<f32>,
        position: Position,
        rng: &mut dyn RngCore,
    ) -> Result<Direction> {
        let scores = neighbour_scores(values, position);
        let total: f32 = scores.iter().filter(|&&s| s > 0.0).sum();
        if !(total > 0.0) {
            return Err(SandboxError::NoPositiveNeighbor { row: position.row, col: position.col });
        }

        let r: f32 = rng.gen();
        let mut cumulative = 0.0;
        let mut last_positive = None;
        for (direction, &score) in Direction::ALL.iter().zip(scores.iter()) {
            if score <= 0.0 {
                continue;
            }
            cumulative += score / total;
            if cumulative >= r {
                return Ok(*direction);
            }
            last_positive = Some(*direction);
        }

        // Rounding can leave the final cumulative a hair below r.
        last_positive.ok_or_else(|| {
            SandboxError::NumericalError(format!("weighted draw failed at {}", position))
        })
    }

    fn name(&self) -> &'static str {
        "value_weighted"
    }
}

/// Policy choice for configuration files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Random,
    ValueWeighted,
}

impl PolicyKind {
    pub fn build(&self) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy),
            PolicyKind::ValueWeighted => Box::new(ValueWeightedPolicy),
        }
    }
}

impl Default for PolicyKind {
    fn default() -> Self {
        PolicyKind::ValueWeighted
    }
}

/// Value of each neighbour in direction-index order, [`OFF_BOARD_SCORE`] when
/// the neighbour is off the board
pub fn neighbour_scores(values: ArrayView2<f32>, position: Position) -> [f32; 4] {
    let shape = values.dim();
    let mut scores = [OFF_BOARD_SCORE; 4];
    for (score, direction) in scores.iter_mut().zip(Direction::ALL.iter()) {
        if let Some(index) = position.offset(*direction).index(shape) {
            *score = values[index];
        }
    }
    scores
}

/// Direction with the highest neighbour value; ties go to the lowest index
pub fn greedy_direction(values: ArrayView2<f32>, position: Position) -> Direction {
    let scores = neighbour_scores(values, position);
    let mut best = 0;
    for i in 1..scores.len() {
        if scores[i] > scores[best] {
            best = i;
        }
    }
    Direction::ALL[best]
}

/// Greedy direction index for every cell of the board
pub fn greedy_policy_grid(values: ArrayView2<f32>) -> Array2<usize> {
    Array2::from_shape_fn(values.dim(), |(row, col)| {
        greedy_direction(values, Position::from((row, col))).index()
    })
}
