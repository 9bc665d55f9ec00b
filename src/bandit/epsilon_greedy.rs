use ndarray::Array1;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::debug;

use super::reward_source::RewardSource;
use crate::error::{Result, SandboxError};

/// How an arm's estimate moves towards a freshly observed reward
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum UpdateRule {
    /// Step size 1/n for the arm's n-th pull, i.e. the running mean
    SampleAverage,

    /// Constant step size, which tracks drifting arms
    FixedStep { alpha: f32 },
}

impl UpdateRule {
    /// Fixed step when a learning rate is given, sample average otherwise
    pub fn from_learn_rate(learn_rate: Option<f32>) -> Self {
        match learn_rate {
            Some(alpha) => UpdateRule::FixedStep { alpha },
            None => UpdateRule::SampleAverage,
        }
    }

    fn step_size(&self, pulls: u64) -> f32 {
        match self {
            UpdateRule::SampleAverage => 1.0 / pulls as f32,
            UpdateRule::FixedStep { alpha } => *alpha,
        }
    }
}

/// Outcome of a single bandit step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BanditStep {
    pub action: usize,
    pub reward: f32,
}

/// Per-step record yielded by [`EpsilonGreedy::run`]
#[derive(Clone, Debug, PartialEq)]
pub struct BanditRecord {
    pub step: u64,
    pub action: usize,
    pub reward: f32,
    /// total reward / steps so far
    pub average_reward: f32,
    /// Estimate of every arm after this step's update
    pub estimates: Array1<f32>,
}

/// Learning curves of a bandit run, ready for plotting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BanditHistory {
    /// Running average reward, one entry per step
    pub average_rewards: Vec<f32>,

    /// Arm estimates, one row per step
    pub estimates_over_time: Array2<f32>,
}

/// Epsilon-greedy action-value learner over a [`RewardSource`].
///
/// # Example
///
/// ```rust
/// use sandbox_rl::bandit::{EpsilonGreedy, GaussianBandit, UpdateRule};
/// use ndarray::array;
/// use rand::SeedableRng;
///
/// let source = GaussianBandit::from_means(array![1.0, 5.0, 2.0], 1.0).unwrap();
/// let rng = rand::rngs::StdRng::seed_from_u64(3);
/// let mut learner = EpsilonGreedy::new(source, 0.1, UpdateRule::SampleAverage, rng).unwrap();
///
/// let history = learner.learn(500);
/// assert_eq!(history.average_rewards.len(), 500);
/// assert_eq!(learner.steps(), 500);
/// ```
pub struct EpsilonGreedy<S: RewardSource> {
    source: S,
    epsilon: f32,
    update_rule: UpdateRule,
    value_estimates: Array1<f32>,
    action_counts: Vec<u64>,
    total_reward: f32,
    step: u64,
    rng: StdRng,
}

impl<S: RewardSource> EpsilonGreedy<S> {
    pub fn new(source: S, epsilon: f32, update_rule: UpdateRule, rng: StdRng) -> Result<Self> {
        let num_arms = source.num_arms();
        if num_arms == 0 {
            return Err(SandboxError::invalid_parameter("num_arms", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(SandboxError::invalid_parameter("epsilon", "must lie in [0, 1]"));
        }
        if let UpdateRule::FixedStep { alpha } = update_rule {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(SandboxError::invalid_parameter("learn_rate", "must lie in (0, 1]"));
            }
        }

        Ok(EpsilonGreedy {
            source,
            epsilon,
            update_rule,
            value_estimates: Array1::zeros(num_arms),
            action_counts: vec![0; num_arms],
            total_reward: 0.0,
            step: 0,
            rng,
        })
    }

    /// Explore a uniformly random arm with probability epsilon, otherwise
    /// exploit the best estimate. Ties go to the lowest index.
    pub fn select_action(&mut self) -> usize {
        if self.rng.gen::<f32>() < self.epsilon {
            self.rng.gen_range(0..self.value_estimates.len())
        } else {
            let mut best = 0;
            for (arm, &estimate) in self.value_estimates.iter().enumerate().skip(1) {
                if estimate > self.value_estimates[best] {
                    best = arm;
                }
            }
            best
        }
    }

    pub fn step(&mut self) -> BanditStep {
        let action = self.select_action();
        let reward = self.source.pull(action, &mut self.rng);

        self.total_reward += reward;
        self.step += 1;
        self.action_counts[action] += 1;

        let step_size = self.update_rule.step_size(self.action_counts[action]);
        let estimate = &mut self.value_estimates[action];
        *estimate += step_size * (reward - *estimate);

        debug!(step = self.step, action, reward, estimate = *estimate, "bandit step");
        BanditStep { action, reward }
    }

    /// Lazily perform `num_iterations` steps.
    ///
    /// State is never reset: running again continues from where the previous
    /// run stopped.
    pub fn run(&mut self, num_iterations: usize) -> BanditRun<'_, S> {
        BanditRun {
            learner: self,
            remaining: num_iterations,
        }
    }

    /// Run `num_iterations` steps and collect both learning curves
    pub fn learn(&mut self, num_iterations: usize) -> BanditHistory {
        let num_arms = self.num_arms();
        let mut average_rewards = Vec::with_capacity(num_iterations);
        let mut estimates_over_time = Array2::zeros((num_iterations, num_arms));

        for (i, record) in self.run(num_iterations).enumerate() {
            average_rewards.push(record.average_reward);
            estimates_over_time.row_mut(i).assign(&record.estimates);
        }

        BanditHistory {
            average_rewards,
            estimates_over_time,
        }
    }

    pub fn num_arms(&self) -> usize {
        self.value_estimates.len()
    }

    pub fn value_estimates(&self) -> &Array1<f32> {
        &self.value_estimates
    }

    pub fn action_counts(&self) -> &[u64] {
        &self.action_counts
    }

    pub fn total_reward(&self) -> f32 {
        self.total_reward
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    /// Running average reward, or `None` before the first step
    pub fn average_reward(&self) -> Option<f32> {
        if self.step == 0 {
            None
        } else {
            Some(self.total_reward / self.step as f32)
        }
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn update_rule(&self) -> UpdateRule {
        self.update_rule
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Finite, single-use iterator over the steps of a bandit run
pub struct BanditRun<'a, S: RewardSource> {
    learner: &'a mut EpsilonGreedy<S>,
    remaining: usize,
}

impl<'a, S: RewardSource> Iterator for BanditRun<'a, S> {
    type Item = BanditRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let BanditStep { action, reward } = self.learner.step();
        Some(BanditRecord {
            step: self.learner.step,
            action,
            reward,
            average_reward: self.learner.total_reward / self.learner.step as f32,
            estimates: self.learner.value_estimates.clone(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, S: RewardSource> ExactSizeIterator for BanditRun<'a, S> {}
