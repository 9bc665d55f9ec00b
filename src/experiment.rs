use ndarray::{Array1, Array2};
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::bandit::{BanditHistory, DriftingBandit, EpsilonGreedy, GaussianBandit, RewardSource, UpdateRule};
use crate::config::{rng_from_seed, BanditConfig, ExperimentConfig, ReferenceTable, TdConfig};
use crate::error::Result;
use crate::grid::{random_policy_reference, value_weighted_reference, GridWorld};
use crate::td::{PolicyKind, TdLearner};
use crate::visualization::PlotSink;

/// Results of a bandit experiment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BanditReport {
    pub title: String,
    pub epsilon: f32,
    pub learn_rate: Option<f32>,
    pub history: BanditHistory,
    /// Arm means at the end of the run, drift included
    pub true_means: Array1<f32>,
    pub optimal_mean: f32,
    pub action_counts: Vec<u64>,
}

/// Results of a TD experiment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TdReport {
    pub title: String,
    pub policy: PolicyKind,
    /// Error against the reference before the run and after every step
    pub mse: Vec<f32>,
    pub values: Array2<f32>,
    pub reference: Option<Array2<f32>>,
    /// Greedy direction index per cell (0 = down, 1 = right, 2 = up, 3 = left)
    pub policy_grid: Array2<usize>,
    /// Environment as the run left it
    pub world: GridWorld,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "experiment", rename_all = "snake_case")]
pub enum ExperimentReport {
    Bandit(BanditReport),
    TemporalDifference(TdReport),
}

impl ExperimentReport {
    /// Hand every series of the report to a plotting collaborator
    pub fn plot(&self, sink: &mut dyn PlotSink) {
        match self {
            ExperimentReport::Bandit(report) => {
                sink.learning_curve(
                    &report.title,
                    "Average Reward",
                    &report.history.average_rewards,
                    Some(report.optimal_mean),
                );
                let title = match report.learn_rate {
                    Some(rate) => format!("Model Attempting to Approximate Arm Rewards, Learn Rate: {}", rate),
                    None => "Model Attempting to Approximate Arm Rewards, Sample Average".to_string(),
                };
                sink.estimates_over_time(&title, report.history.estimates_over_time.view(), report.true_means.view());
            }
            ExperimentReport::TemporalDifference(report) => {
                if !report.mse.is_empty() {
                    sink.learning_curve(&report.title, "Mean Squared Error", &report.mse, None);
                }
                sink.value_grid("Learned State Values", report.values.view());
                sink.policy_grid("Greedy Policy", report.policy_grid.view());
            }
        }
    }
}

/// Run the experiment described by `config`
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentReport> {
    config.validate()?;
    match config {
        ExperimentConfig::Bandit(config) => run_bandit(config).map(ExperimentReport::Bandit),
        ExperimentConfig::TemporalDifference(config) => run_td(config).map(ExperimentReport::TemporalDifference),
    }
}

pub fn run_bandit(config: &BanditConfig) -> Result<BanditReport> {
    info!(
        arms = config.num_arms,
        epsilon = config.epsilon,
        learn_rate = ?config.learn_rate,
        iterations = config.iterations,
        "starting bandit experiment"
    );

    let mut rng = rng_from_seed(config.seed);
    let stationary = GaussianBandit::new(config.num_arms, config.mean, config.std, config.arm_std, &mut rng)?;
    let source: Box<dyn RewardSource> = match &config.drift {
        Some(drift) => Box::new(DriftingBandit::new(stationary, drift.clone().into_fn())),
        None => Box::new(stationary),
    };

    let update_rule = UpdateRule::from_learn_rate(config.learn_rate);
    let mut learner = EpsilonGreedy::new(source, config.epsilon, update_rule, rng)?;
    let history = learner.learn(config.iterations);

    let true_means = learner.source().means();
    let optimal_mean = learner.source().optimal_mean();
    let final_average = history.average_rewards.last().copied().unwrap_or(0.0);
    info!(final_average, optimal_mean, "bandit experiment finished");

    Ok(BanditReport {
        title: format!("Learning Progress of EpsGreedy Algorithm with Eps = {}", config.epsilon),
        epsilon: config.epsilon,
        learn_rate: config.learn_rate,
        history,
        true_means,
        optimal_mean,
        action_counts: learner.action_counts().to_vec(),
    })
}

pub fn run_td(config: &TdConfig) -> Result<TdReport> {
    info!(
        policy = ?config.policy,
        learn_rate = config.learn_rate,
        discount_rate = config.discount_rate,
        steps = config.steps,
        "starting td experiment"
    );

    let reference = match &config.reference {
        ReferenceTable::Off => None,
        ReferenceTable::MatchPolicy => Some(match config.policy {
            PolicyKind::Random => random_policy_reference(),
            PolicyKind::ValueWeighted => value_weighted_reference(),
        }),
        ReferenceTable::Custom { values } => Some(values.clone()),
    };

    let rng = rng_from_seed(config.seed);
    let mut learner = TdLearner::new(
        GridWorld::book_world(),
        config.learn_rate,
        config.discount_rate,
        config.policy.build(),
        rng,
    )?;
    let mse = learner.run(config.steps, reference.as_ref().map(|r| r.view()))?;

    if let (Some(first), Some(last)) = (mse.first(), mse.last()) {
        if last > first {
            warn!(initial = first, last, "value error grew over the run");
        }
        info!(initial_mse = first, final_mse = last, "td experiment finished");
    } else {
        info!(steps = learner.steps_taken(), "td experiment finished");
    }

    Ok(TdReport {
        title: format!("TD(0) Book World, {} policy", learner.policy_name()),
        policy: config.policy,
        mse,
        values: learner.values().clone(),
        reference,
        policy_grid: learner.greedy_policy(),
        world: learner.world().clone(),
    })
}
