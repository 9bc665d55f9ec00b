//! TD(0) on the Book World under both policies.
//!
//! Pass a JSON experiment file as the first argument to run that instead.

use sandbox_rl::config::{ExperimentConfig, ReferenceTable, TdConfig};
use sandbox_rl::experiment::run_experiment;
use sandbox_rl::td::PolicyKind;
use sandbox_rl::visualization::TextPlotter;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let configs = match std::env::args().nth(1) {
        Some(path) => vec![ExperimentConfig::from_json_file(path)?],
        None => vec![
            ExperimentConfig::TemporalDifference(
                TdConfig::default()
                    .policy(PolicyKind::Random)
                    .discount_rate(0.9)
                    .learn_rate(0.02)
                    .seed(7),
            ),
            ExperimentConfig::TemporalDifference(
                TdConfig::default()
                    .policy(PolicyKind::ValueWeighted)
                    .reference(ReferenceTable::Off)
                    .seed(7),
            ),
        ],
    };

    for config in &configs {
        let report = run_experiment(config)?;

        let mut plotter = TextPlotter::default();
        report.plot(&mut plotter);
        println!("{}", plotter.output());
    }

    Ok(())
}
