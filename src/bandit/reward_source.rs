use ndarray::Array1;
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rand::{Rng, RngCore};
use rand_distr::Distribution;
use serde::{Serialize, Deserialize};
use std::fmt;

use crate::error::{Result, SandboxError};

/// Something that pays out a stochastic reward when one of its arms is pulled.
///
/// `arm` must be below [`num_arms`](RewardSource::num_arms); implementations
/// index directly and panic otherwise.
pub trait RewardSource {
    /// Number of arms
    fn num_arms(&self) -> usize;

    /// Pull `arm` and sample its reward
    fn pull(&mut self, arm: usize, rng: &mut dyn RngCore) -> f32;

    /// Current mean reward of every arm, including any drift accumulated so far
    fn means(&self) -> Array1<f32>;

    /// Mean reward of the best arm
    fn optimal_mean(&self) -> f32 {
        self.means().iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
}

impl<S: RewardSource + ?Sized> RewardSource for Box<S> {
    fn num_arms(&self) -> usize {
        (**self).num_arms()
    }

    fn pull(&mut self, arm: usize, rng: &mut dyn RngCore) -> f32 {
        (**self).pull(arm, rng)
    }

    fn means(&self) -> Array1<f32> {
        (**self).means()
    }
}

/// Stationary bandit whose arms pay Normal(mean_i, arm_std).
#[derive(Clone, Debug)]
pub struct GaussianBandit {
    arms: Array1<f32>,
    noise: Normal<f32>,
}

impl GaussianBandit {
    /// Draw `num_arms` arm means from Normal(`mean`, `std`).
    pub fn new<R: Rng + ?Sized>(num_arms: usize, mean: f32, std: f32, arm_std: f32, rng: &mut R) -> Result<Self> {
        if num_arms == 0 {
            return Err(SandboxError::invalid_parameter("num_arms", "must be at least 1"));
        }
        let spread = Normal::new(mean, std)
            .map_err(|e| SandboxError::invalid_parameter("std".to_string(), e.to_string()))?;
        let arms = Array1::random_using(num_arms, spread, rng);
        Self::from_means(arms, arm_std)
    }

    /// Bandit with explicitly chosen arm means.
    ///
    /// An `arm_std` of zero makes every pull return the arm mean exactly.
    pub fn from_means(arms: Array1<f32>, arm_std: f32) -> Result<Self> {
        if arms.is_empty() {
            return Err(SandboxError::invalid_parameter("arms", "must contain at least one arm"));
        }
        if arms.iter().any(|m| !m.is_finite()) {
            return Err(SandboxError::invalid_parameter("arms", "means must be finite"));
        }
        let noise = Normal::new(0.0, arm_std)
            .map_err(|e| SandboxError::invalid_parameter("arm_std".to_string(), e.to_string()))?;
        Ok(GaussianBandit { arms, noise })
    }

    fn sample_around(&self, mean: f32, rng: &mut dyn RngCore) -> f32 {
        mean + self.noise.sample(rng)
    }
}

impl RewardSource for GaussianBandit {
    fn num_arms(&self) -> usize {
        self.arms.len()
    }

    fn pull(&mut self, arm: usize, rng: &mut dyn RngCore) -> f32 {
        self.sample_around(self.arms[arm], rng)
    }

    fn means(&self) -> Array1<f32> {
        self.arms.clone()
    }
}

/// Bias added to an arm's mean as a function of how often it has been pulled
pub type DriftFn = Box<dyn Fn(u64) -> f32 + Send + Sync>;

/// Serializable drift shapes for configuration files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriftSchedule {
    /// bias = slope * pulls
    Linear { slope: f32 },

    /// bias = amplitude * sin(2π * pulls / period)
    Periodic { amplitude: f32, period: f32 },
}

impl DriftSchedule {
    /// Evaluate the bias after `pulls` pulls
    pub fn bias(&self, pulls: u64) -> f32 {
        match self {
            DriftSchedule::Linear { slope } => slope * pulls as f32,
            DriftSchedule::Periodic { amplitude, period } => {
                amplitude * (std::f32::consts::TAU * pulls as f32 / period).sin()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            DriftSchedule::Linear { slope } if !slope.is_finite() => {
                Err(SandboxError::invalid_parameter("drift.slope", "must be finite"))
            }
            DriftSchedule::Periodic { amplitude, .. } if !amplitude.is_finite() => {
                Err(SandboxError::invalid_parameter("drift.amplitude", "must be finite"))
            }
            DriftSchedule::Periodic { period, .. } if !(period.is_finite() && *period > 0.0) => {
                Err(SandboxError::invalid_parameter("drift.period", "must be positive and finite"))
            }
            _ => Ok(()),
        }
    }

    pub fn into_fn(self) -> DriftFn {
        Box::new(move |pulls| self.bias(pulls))
    }
}

/// Non-stationary bandit: each arm's mean shifts by a caller-supplied function
/// of that arm's own pull count.
pub struct DriftingBandit {
    base: GaussianBandit,
    pull_counts: Vec<u64>,
    drift: DriftFn,
}

impl DriftingBandit {
    pub fn new(base: GaussianBandit, drift: DriftFn) -> Self {
        let pull_counts = vec![0; base.num_arms()];
        DriftingBandit { base, pull_counts, drift }
    }

    pub fn pull_counts(&self) -> &[u64] {
        &self.pull_counts
    }

    /// Arm means before any drift
    pub fn base_means(&self) -> Array1<f32> {
        self.base.means()
    }
}

impl RewardSource for DriftingBandit {
    fn num_arms(&self) -> usize {
        self.base.num_arms()
    }

    fn pull(&mut self, arm: usize, rng: &mut dyn RngCore) -> f32 {
        // The count moves first so the drift applies to the pull that causes it.
        self.pull_counts[arm] += 1;
        let mean = self.base.arms[arm] + (self.drift)(self.pull_counts[arm]);
        self.base.sample_around(mean, rng)
    }

    fn means(&self) -> Array1<f32> {
        let mut means = self.base.means();
        for (mean, &pulls) in means.iter_mut().zip(self.pull_counts.iter()) {
            *mean += (self.drift)(pulls);
        }
        means
    }
}

impl fmt::Debug for DriftingBandit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriftingBandit")
            .field("base", &self.base)
            .field("pull_counts", &self.pull_counts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noiseless_arm_returns_mean() {
        let mut bandit = GaussianBandit::from_means(array![1.0, 5.0, 2.0], 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(bandit.pull(1, &mut rng), 5.0);
        assert_eq!(bandit.pull(2, &mut rng), 2.0);
        assert_eq!(bandit.optimal_mean(), 5.0);
    }

    #[test]
    fn test_random_arms_drawn_from_spread() {
        let mut rng = StdRng::seed_from_u64(42);
        let bandit = GaussianBandit::new(10, 0.0, 1.0, 1.0, &mut rng).unwrap();
        assert_eq!(bandit.num_arms(), 10);
        assert!(bandit.means().iter().all(|m| m.is_finite() && m.abs() < 10.0));
    }

    #[test]
    fn test_drift_applies_to_triggering_pull() {
        let base = GaussianBandit::from_means(array![0.0, 0.0], 0.0).unwrap();
        let mut bandit = DriftingBandit::new(base, Box::new(|pulls| pulls as f32 / 100.0));
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(bandit.pull(0, &mut rng), 0.01);
        assert_eq!(bandit.pull(0, &mut rng), 0.02);
        assert_eq!(bandit.pull_counts(), &[2, 0]);
        assert_eq!(bandit.means(), array![0.02, 0.0]);
    }

    #[test]
    fn test_invalid_construction() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(GaussianBandit::new(0, 0.0, 1.0, 1.0, &mut rng).is_err());
        assert!(GaussianBandit::from_means(array![1.0], -1.0).is_err());
        assert!(GaussianBandit::from_means(Array1::zeros(0), 1.0).is_err());
    }

    #[test]
    fn test_drift_schedules() {
        assert_eq!(DriftSchedule::Linear { slope: 0.5 }.bias(4), 2.0);
        let periodic = DriftSchedule::Periodic { amplitude: 2.0, period: 4.0 };
        assert!((periodic.bias(1) - 2.0).abs() < 1e-5);
        assert!(DriftSchedule::Periodic { amplitude: 1.0, period: 0.0 }.validate().is_err());
    }

    #[test]
    fn test_drift_validation_rejects_non_finite() {
        assert!(DriftSchedule::Linear { slope: f32::NAN }.validate().is_err());
        assert!(DriftSchedule::Periodic { amplitude: f32::INFINITY, period: 4.0 }.validate().is_err());
        assert!(DriftSchedule::Periodic { amplitude: f32::NAN, period: 4.0 }.validate().is_err());
        assert!(DriftSchedule::Periodic { amplitude: 1.0, period: f32::INFINITY }.validate().is_err());
        assert!(DriftSchedule::Periodic { amplitude: 1.0, period: 4.0 }.validate().is_ok());
    }
}
