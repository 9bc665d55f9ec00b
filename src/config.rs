use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::bandit::DriftSchedule;
use crate::error::{Result, SandboxError};
use crate::td::PolicyKind;

/// Deterministic generator when a seed is given, entropy-seeded otherwise
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Parameters of an epsilon-greedy bandit experiment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanditConfig {
    /// Number of arms
    pub num_arms: usize,

    /// Mean of the distribution the arm means are drawn from
    pub mean: f32,

    /// Standard deviation of the distribution the arm means are drawn from
    pub std: f32,

    /// Reward noise of every pull
    pub arm_std: f32,

    /// Exploration probability
    pub epsilon: f32,

    /// Fixed step size; sample averaging is used when absent
    pub learn_rate: Option<f32>,

    /// Optional drift of arm means with their pull counts
    pub drift: Option<DriftSchedule>,

    pub iterations: usize,

    pub seed: Option<u64>,
}

impl Default for BanditConfig {
    fn default() -> Self {
        BanditConfig {
            num_arms: 10,
            mean: 0.0,
            std: 1.0,
            arm_std: 1.0,
            epsilon: 0.1,
            learn_rate: None,
            drift: None,
            iterations: 1000,
            seed: None,
        }
    }
}

impl BanditConfig {
    pub fn num_arms(mut self, num_arms: usize) -> Self {
        self.num_arms = num_arms;
        self
    }

    pub fn arm_distribution(mut self, mean: f32, std: f32) -> Self {
        self.mean = mean;
        self.std = std;
        self
    }

    pub fn arm_std(mut self, arm_std: f32) -> Self {
        self.arm_std = arm_std;
        self
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn learn_rate(mut self, learn_rate: f32) -> Self {
        self.learn_rate = Some(learn_rate);
        self
    }

    pub fn drift(mut self, drift: DriftSchedule) -> Self {
        self.drift = Some(drift);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_arms == 0 {
            return Err(SandboxError::invalid_parameter("num_arms", "must be at least 1"));
        }
        if !(self.std >= 0.0) || !(self.arm_std >= 0.0) {
            return Err(SandboxError::invalid_parameter("std", "standard deviations must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(SandboxError::invalid_parameter("epsilon", "must lie in [0, 1]"));
        }
        if let Some(rate) = self.learn_rate {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(SandboxError::invalid_parameter("learn_rate", "must lie in (0, 1]"));
            }
        }
        if let Some(drift) = &self.drift {
            drift.validate()?;
        }
        Ok(())
    }
}

/// Table the TD value estimates are scored against
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceTable {
    /// Skip error tracking
    Off,

    /// Known Book World values for the configured policy
    MatchPolicy,

    /// Caller-supplied values, one per board cell
    Custom { values: Array2<f32> },
}

impl Default for ReferenceTable {
    fn default() -> Self {
        ReferenceTable::MatchPolicy
    }
}

/// Parameters of a TD(0) Book World experiment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TdConfig {
    pub learn_rate: f32,
    pub discount_rate: f32,
    pub policy: PolicyKind,
    pub steps: usize,
    pub seed: Option<u64>,
    pub reference: ReferenceTable,
}

impl Default for TdConfig {
    fn default() -> Self {
        TdConfig {
            learn_rate: 0.05,
            discount_rate: 0.75,
            policy: PolicyKind::ValueWeighted,
            steps: 100_000,
            seed: None,
            reference: ReferenceTable::MatchPolicy,
        }
    }
}

impl TdConfig {
    pub fn learn_rate(mut self, learn_rate: f32) -> Self {
        self.learn_rate = learn_rate;
        self
    }

    pub fn discount_rate(mut self, discount_rate: f32) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    pub fn policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn reference(mut self, reference: ReferenceTable) -> Self {
        self.reference = reference;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.learn_rate) {
            return Err(SandboxError::invalid_parameter("learn_rate", "must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.discount_rate) {
            return Err(SandboxError::invalid_parameter("discount_rate", "must lie in [0, 1]"));
        }
        Ok(())
    }
}

/// A complete experiment description
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "experiment", rename_all = "snake_case")]
pub enum ExperimentConfig {
    Bandit(BanditConfig),
    TemporalDifference(TdConfig),
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            ExperimentConfig::Bandit(config) => config.validate(),
            ExperimentConfig::TemporalDifference(config) => config.validate(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ExperimentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_filled_from_partial_json() {
        let config = ExperimentConfig::from_json_str(r#"{"experiment": "bandit", "epsilon": 0.2}"#).unwrap();
        match config {
            ExperimentConfig::Bandit(bandit) => {
                assert_eq!(bandit.epsilon, 0.2);
                assert_eq!(bandit.num_arms, 10);
                assert_eq!(bandit.learn_rate, None);
                assert_eq!(bandit.iterations, 1000);
            }
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_td_config_json() {
        let json = r#"{
            "experiment": "temporal_difference",
            "policy": "random",
            "steps": 50,
            "reference": "off"
        }"#;
        let config = ExperimentConfig::from_json_str(json).unwrap();
        let expected = ExperimentConfig::TemporalDifference(
            TdConfig::default().policy(PolicyKind::Random).steps(50).reference(ReferenceTable::Off),
        );
        assert_eq!(config, expected);
    }

    #[test]
    fn test_drift_json() {
        let json = r#"{"experiment": "bandit", "learn_rate": 0.1, "drift": {"kind": "linear", "slope": 0.01}}"#;
        let config = ExperimentConfig::from_json_str(json).unwrap();
        let expected = ExperimentConfig::Bandit(
            BanditConfig::default().learn_rate(0.1).drift(DriftSchedule::Linear { slope: 0.01 }),
        );
        assert_eq!(config, expected);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(BanditConfig::default().num_arms(0).validate().is_err());
        assert!(BanditConfig::default().epsilon(1.5).validate().is_err());
        assert!(BanditConfig::default().learn_rate(0.0).validate().is_err());
        assert!(TdConfig::default().discount_rate(2.0).validate().is_err());
        assert!(ExperimentConfig::from_json_str(r#"{"experiment": "bandit", "num_arms": 0}"#).is_err());
    }

    #[test]
    fn test_seeded_rngs_agree() {
        use rand::Rng;
        let a: u64 = rng_from_seed(Some(9)).gen();
        let b: u64 = rng_from_seed(Some(9)).gen();
        assert_eq!(a, b);
    }
}
