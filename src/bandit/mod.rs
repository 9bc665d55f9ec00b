//! # Multi-Armed Bandits
//!
//! Reward sources and the epsilon-greedy learner that estimates their arms.
//!
//! - [`GaussianBandit`]: stationary arms paying Normal(mean_i, arm_std)
//! - [`DriftingBandit`]: arms whose mean shifts with their own pull count
//! - [`EpsilonGreedy`]: sample-average or fixed step-size action-value learner

pub mod reward_source;
pub mod epsilon_greedy;

pub use reward_source::{RewardSource, GaussianBandit, DriftingBandit, DriftSchedule, DriftFn};
pub use epsilon_greedy::{EpsilonGreedy, UpdateRule, BanditStep, BanditRecord, BanditHistory, BanditRun};
