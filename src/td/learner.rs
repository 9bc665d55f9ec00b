use ndarray::{Array2, ArrayView2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use tracing::debug;

use super::policy::{greedy_policy_grid, Policy};
use crate::error::{Result, SandboxError};
use crate::grid::{GridWorld, MoveOutcome};
use crate::types::{Direction, Position};

/// Whether the learner has taken any step yet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LearnerPhase {
    Idle,
    Learning,
}

/// Everything that happened during one [`TdLearner::step`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TdStep {
    pub from: Position,
    pub to: Position,
    pub direction: Direction,
    pub outcome: MoveOutcome,
    pub td_error: f32,
}

/// TD(0) state-value learner on a [`GridWorld`].
///
/// Each step asks the policy for a direction, moves, and bootstraps the value
/// of the cell that was left:
///
/// `V[old] += α * (r + γ * V[new] - V[old])`
///
/// A blocked move feeds [`OUT_OF_BOUNDS_REWARD`](crate::grid::OUT_OF_BOUNDS_REWARD)
/// into the update as an ordinary reward, with `new == old`.
///
/// # Example
///
/// ```rust
/// use sandbox_rl::grid::{GridWorld, random_policy_reference};
/// use sandbox_rl::td::{TdLearner, RandomPolicy};
/// use rand::SeedableRng;
///
/// let rng = rand::rngs::StdRng::seed_from_u64(1);
/// let mut learner = TdLearner::new(GridWorld::book_world(), 0.05, 0.75, Box::new(RandomPolicy), rng).unwrap();
///
/// let mse = learner.run(1_000, Some(random_policy_reference().view())).unwrap();
/// assert_eq!(mse.len(), 1_001);
/// ```
pub struct TdLearner {
    world: GridWorld,
    values: Array2<f32>,
    learn_rate: f32,
    discount_rate: f32,
    policy: Box<dyn Policy>,
    rng: StdRng,
    steps_taken: u64,
}

impl TdLearner {
    /// Create a learner whose value table is drawn from Uniform[0, 1)
    pub fn new(
        world: GridWorld,
        learn_rate: f32,
        discount_rate: f32,
        policy: Box<dyn Policy>,
        mut rng: StdRng,
    ) -> Result<Self> {
        let values = Array2::random_using(world.shape(), Uniform::new(0.0, 1.0), &mut rng);
        Self::with_values(world, values, learn_rate, discount_rate, policy, rng)
    }

    /// Create a learner starting from a given value table
    pub fn with_values(
        world: GridWorld,
        values: Array2<f32>,
        learn_rate: f32,
        discount_rate: f32,
        policy: Box<dyn Policy>,
        rng: StdRng,
    ) -> Result<Self> {
        if values.dim() != world.shape() {
            return Err(SandboxError::dimension_mismatch(
                format!("{:?}", world.shape()),
                format!("{:?}", values.dim()),
            ));
        }
        if !(0.0..=1.0).contains(&learn_rate) {
            return Err(SandboxError::invalid_parameter("learn_rate", "must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&discount_rate) {
            return Err(SandboxError::invalid_parameter("discount_rate", "must lie in [0, 1]"));
        }

        Ok(TdLearner {
            world,
            values,
            learn_rate,
            discount_rate,
            policy,
            rng,
            steps_taken: 0,
        })
    }

    pub fn step(&mut self) -> Result<TdStep> {
        let from = self.world.position();
        let direction = self.policy.select_direction(self.values.view(), from, &mut self.rng)?;

        let outcome = self.world.step(direction);
        let to = self.world.position();

        let shape = self.world.shape();
        let old_index = from.index(shape).ok_or(SandboxError::OutOfBounds { row: from.row, col: from.col })?;
        let new_index = to.index(shape).ok_or(SandboxError::OutOfBounds { row: to.row, col: to.col })?;

        let next_value = self.values[new_index];
        let td_error = outcome.reward() + self.discount_rate * next_value - self.values[old_index];
        self.values[old_index] += self.learn_rate * td_error;
        self.steps_taken += 1;

        debug!(step = self.steps_taken, %from, %to, ?direction, td_error, "td step");
        Ok(TdStep { from, to, direction, outcome, td_error })
    }

    /// Perform `num_steps` steps.
    ///
    /// With a reference table the mean squared error against it is recorded
    /// before the first step and after every step (`num_steps + 1` entries);
    /// without one the returned series is empty.
    pub fn run(&mut self, num_steps: usize, reference: Option<ArrayView2<f32>>) -> Result<Vec<f32>> {
        let mut errors = Vec::new();
        if let Some(reference) = reference {
            errors.reserve(num_steps + 1);
            errors.push(self.mse(reference)?);
        }

        for _ in 0..num_steps {
            self.step()?;
            if let Some(reference) = reference {
                errors.push(self.mse(reference)?);
            }
        }

        Ok(errors)
    }

    /// Mean squared error between the value table and `reference`
    pub fn mse(&self, reference: ArrayView2<f32>) -> Result<f32> {
        if reference.dim() != self.values.dim() {
            return Err(SandboxError::dimension_mismatch(
                format!("{:?}", self.values.dim()),
                format!("{:?}", reference.dim()),
            ));
        }
        (&self.values - &reference)
            .mapv(|x| x * x)
            .mean()
            .ok_or_else(|| SandboxError::NumericalError("empty value table".to_string()))
    }

    /// Greedy direction index (0 = down, 1 = right, 2 = up, 3 = left) per cell
    pub fn greedy_policy(&self) -> Array2<usize> {
        greedy_policy_grid(self.values.view())
    }

    pub fn phase(&self) -> LearnerPhase {
        if self.steps_taken == 0 {
            LearnerPhase::Idle
        } else {
            LearnerPhase::Learning
        }
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn learn_rate(&self) -> f32 {
        self.learn_rate
    }

    pub fn discount_rate(&self) -> f32 {
        self.discount_rate
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::td::{RandomPolicy, ValueWeightedPolicy};
    use rand::SeedableRng;

    fn learner(learn_rate: f32, seed: u64) -> TdLearner {
        let rng = StdRng::seed_from_u64(seed);
        TdLearner::new(GridWorld::book_world(), learn_rate, 0.75, Box::new(RandomPolicy), rng).unwrap()
    }

    #[test]
    fn test_initial_values_uniform() {
        let learner = learner(0.05, 3);
        assert_eq!(learner.values().dim(), (5, 5));
        assert!(learner.values().iter().all(|&v| (0.0..1.0).contains(&v)));
        assert_eq!(learner.phase(), LearnerPhase::Idle);
    }

    #[test]
    fn test_step_updates_only_departed_cell() {
        let mut learner = learner(0.5, 9);
        let before = learner.values().clone();
        let step = learner.step().unwrap();

        let (row, col) = step.from.index((5, 5)).unwrap();
        let expected = before[[row, col]] + 0.5 * step.td_error;
        assert!((learner.values()[[row, col]] - expected).abs() < 1e-6);

        for ((r, c), &v) in learner.values().indexed_iter() {
            if (r, c) != (row, col) {
                assert_eq!(v, before[[r, c]]);
            }
        }
        assert_eq!(learner.phase(), LearnerPhase::Learning);
    }

    #[test]
    fn test_blocked_move_feeds_sentinel_into_update() {
        // Rewardless board, so the sentinel is the only signal.
        let world = GridWorld::new(Array2::zeros((3, 3)), Position::new(2, 2), vec![]).unwrap();
        let values = Array2::zeros((3, 3));
        let rng = StdRng::seed_from_u64(5);
        let mut learner = TdLearner::with_values(world, values, 0.5, 0.75, Box::new(RandomPolicy), rng).unwrap();

        loop {
            let step = learner.step().unwrap();
            if step.outcome.is_out_of_bounds() {
                assert_eq!(step.from, step.to);
                let (row, col) = step.from.index((3, 3)).unwrap();
                // -1 + 0.75 * 0 - 0, scaled by the 0.5 learning rate
                assert_eq!(learner.values()[[row, col]], -0.5);
                assert_eq!(step.td_error, -1.0);
                break;
            }
        }
    }

    #[test]
    fn test_value_weighted_policy_runs_from_positive_table() {
        let rng = StdRng::seed_from_u64(21);
        let values = Array2::from_elem((5, 5), 1.0);
        let mut learner = TdLearner::with_values(
            GridWorld::book_world(),
            values,
            0.05,
            0.75,
            Box::new(ValueWeightedPolicy),
            rng,
        )
        .unwrap();
        learner.run(200, None).unwrap();
        assert_eq!(learner.steps_taken(), 200);
    }

    #[test]
    fn test_mse_shape_mismatch() {
        let learner = learner(0.05, 0);
        let wrong = Array2::zeros((4, 5));
        assert!(matches!(learner.mse(wrong.view()), Err(SandboxError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_rejects_bad_rates() {
        let rng = StdRng::seed_from_u64(0);
        assert!(TdLearner::new(GridWorld::book_world(), 1.5, 0.75, Box::new(RandomPolicy), rng.clone()).is_err());
        assert!(TdLearner::new(GridWorld::book_world(), 0.05, -0.1, Box::new(RandomPolicy), rng).is_err());
    }
}
