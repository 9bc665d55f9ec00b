use ndarray::ArrayView1;
use std::io::Write;
use std::path::Path;

use crate::bandit::BanditHistory;
use crate::error::{Result, SandboxError};
use crate::experiment::ExperimentReport;

/// Write a whole report as pretty JSON
pub fn export_report_json<P: AsRef<Path>>(report: &ExperimentReport, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Write a scalar curve as `step,<label>` CSV rows
pub fn export_curve_csv<P: AsRef<Path>>(values: &[f32], label: &str, path: P) -> Result<()> {
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "step,{}", label)?;
    for (i, value) in values.iter().enumerate() {
        writeln!(file, "{},{}", i, value)?;
    }

    Ok(())
}

/// Write bandit estimates over time, one column per arm, followed by the
/// actual mean of each arm in a final `actual` row
pub fn export_estimates_csv<P: AsRef<Path>>(history: &BanditHistory, actual: ArrayView1<f32>, path: P) -> Result<()> {
    let num_arms = history.estimates_over_time.ncols();
    if actual.len() != num_arms {
        return Err(SandboxError::dimension_mismatch(
            format!("{} actual means", num_arms),
            format!("{} actual means", actual.len()),
        ));
    }

    let mut file = std::fs::File::create(path)?;

    let header: Vec<String> = (0..num_arms).map(|arm| format!("arm_{}", arm)).collect();
    writeln!(file, "step,{}", header.join(","))?;

    for (i, row) in history.estimates_over_time.outer_iter().enumerate() {
        let row_str: Vec<String> = row.iter().map(|x| x.to_string()).collect();
        writeln!(file, "{},{}", i, row_str.join(","))?;
    }

    let actual_str: Vec<String> = actual.iter().map(|x| x.to_string()).collect();
    writeln!(file, "actual,{}", actual_str.join(","))?;

    Ok(())
}
