//! # sandbox-rl - Tabular Reinforcement Learning Experiments
//!
//! Small, fully seedable reinforcement-learning experiments that share one
//! shape: simulate an environment, learn from it, and hand the learning curves
//! to a plotting collaborator.
//!
//! ## Experiments
//!
//! - **Multi-armed bandit**: epsilon-greedy action-value estimation over
//!   stationary or drifting Gaussian arms, with sample-average or fixed
//!   step-size updates
//! - **Book World**: TD(0) state-value learning on a 5x5 grid whose two key
//!   cells teleport the agent, under a random or value-weighted policy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sandbox_rl::config::{ExperimentConfig, TdConfig};
//! use sandbox_rl::experiment::run_experiment;
//! use sandbox_rl::td::PolicyKind;
//! use sandbox_rl::visualization::TextPlotter;
//!
//! let config = ExperimentConfig::TemporalDifference(
//!     TdConfig::default().policy(PolicyKind::Random).steps(10_000).seed(7),
//! );
//! let report = run_experiment(&config).unwrap();
//!
//! let mut plotter = TextPlotter::default();
//! report.plot(&mut plotter);
//! println!("{}", plotter.output());
//! ```
//!
//! ## Module Organization
//!
//! - [`bandit`] - Reward sources and the epsilon-greedy learner
//! - [`config`] - Serializable experiment configuration
//! - [`error`] - Error types and result handling
//! - [`experiment`] - `run_experiment` and the reports it produces
//! - [`grid`] - Grid world environment and Book World reference values
//! - [`metrics`] - Summary statistics
//! - [`td`] - Policies and the TD(0) learner
//! - [`types`] - Positions and directions
//! - [`visualization`] - Plotting collaborator interface, text rendering and export

pub mod bandit;
pub mod config;
pub mod error;
pub mod experiment;
pub mod grid;
pub mod metrics;
pub mod td;
pub mod types;
pub mod visualization;

#[cfg(test)]
mod tests;
