//! Epsilon-greedy on drifting arms: sample averages against a fixed step size.
//!
//! Run with `RUST_LOG=sandbox_rl=debug` to see every pull.

use sandbox_rl::bandit::DriftSchedule;
use sandbox_rl::config::{BanditConfig, ExperimentConfig};
use sandbox_rl::experiment::run_experiment;
use sandbox_rl::visualization::TextPlotter;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let base = BanditConfig::default()
        .num_arms(10)
        .epsilon(0.1)
        .drift(DriftSchedule::Linear { slope: 0.002 })
        .iterations(2_000)
        .seed(42);

    for config in [base.clone(), base.learn_rate(0.1)] {
        let report = run_experiment(&ExperimentConfig::Bandit(config))?;

        let mut plotter = TextPlotter::default();
        report.plot(&mut plotter);
        println!("{}", plotter.output());
    }

    Ok(())
}
