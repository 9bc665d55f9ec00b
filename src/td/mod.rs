//! # Temporal-Difference Learning
//!
//! TD(0) state-value estimation on a [`GridWorld`](crate::grid::GridWorld),
//! driven by a pluggable [`Policy`].
//!
//! ## Policies
//!
//! - [`RandomPolicy`]: uniform over the four directions
//! - [`ValueWeightedPolicy`]: proportional to the positive values of in-bounds
//!   neighbours
//!
//! [`greedy_policy_grid`] derives the arg-max direction of every cell from a
//! learned value table.

pub mod policy;
pub mod learner;

pub use policy::{
    Policy, RandomPolicy, ValueWeightedPolicy, PolicyKind,
    neighbour_scores, greedy_direction, greedy_policy_grid,
};
pub use learner::{TdLearner, TdStep, LearnerPhase};
