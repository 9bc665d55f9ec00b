use ndarray::{ArrayView1, ArrayView2};

use crate::metrics::Statistics;
use crate::types::Direction;

/// Plot a series as ASCII art, optionally with a horizontal reference line
pub fn plot_series(values: &[f32], title: &str, width: usize, height: usize, reference: Option<f32>) -> String {
    if values.is_empty() || width < 10 || height < 5 {
        return format!("{}: Invalid data or dimensions", title);
    }

    let mut min_val = values.iter().copied().fold(f32::INFINITY, f32::min);
    let mut max_val = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if let Some(line) = reference {
        min_val = min_val.min(line);
        max_val = max_val.max(line);
    }

    if (max_val - min_val).abs() < f32::EPSILON {
        return format!("{}: All values are {:.4}", title, min_val);
    }

    let mut plot = vec![vec![' '; width]; height];

    // Add axes
    for row in plot.iter_mut() {
        row[0] = '|';
    }
    for j in 0..width {
        plot[height - 1][j] = '-';
    }
    plot[height - 1][0] = '+';

    let y_scale = (height - 3) as f32 / (max_val - min_val);
    let row_of = |value: f32| (height - 3).saturating_sub(((value - min_val) * y_scale) as usize).min(height - 2);

    if let Some(line) = reference {
        let y = row_of(line);
        for j in 2..width {
            plot[y][j] = '=';
        }
    }

    // Plot data points
    let x_scale = (values.len().max(2) - 1) as f32 / (width - 3) as f32;
    for (i, &value) in values.iter().enumerate() {
        let x = ((i as f32 / x_scale) as usize + 2).min(width - 1);
        plot[row_of(value)][x] = '*';
    }

    let mut output = format!("{}\n", title);
    output.push_str(&format!("Max: {:.4}\n", max_val));

    for row in plot.iter() {
        output.push_str(&row.iter().collect::<String>());
        output.push('\n');
    }

    output.push_str(&format!("Min: {:.4}\n", min_val));
    output.push_str(&format!("Points: {}\n", values.len()));
    if let Some(line) = reference {
        output.push_str(&format!("Reference (=): {:.4}\n", line));
    }

    output
}

/// Render a value table with one fixed-width column per cell, followed by a
/// range line
pub fn render_value_grid(values: ArrayView2<f32>, title: &str) -> String {
    let mut output = format!("{}\n", title);
    for row in values.outer_iter() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>8.2}", v)).collect();
        output.push_str(&cells.join(" "));
        output.push('\n');
    }

    let stats = Statistics::from_grid(values);
    output.push_str(&format!("Range: [{:.2}, {:.2}], Mean={:.2}\n", stats.min, stats.max, stats.mean));
    output
}

/// Render a grid of direction indices as arrows
pub fn render_policy_grid(directions: ArrayView2<usize>, title: &str) -> String {
    let mut output = format!("{}\n", title);
    for row in directions.outer_iter() {
        let cells: String = row
            .iter()
            .map(|&i| Direction::from_index(i).map(|d| d.arrow()).unwrap_or('?'))
            .collect();
        output.push_str(&cells);
        output.push('\n');
    }
    output
}

/// Final estimate against the actual mean for every arm.
///
/// Arms with no estimate column are reported as `n/a`.
pub fn estimates_table(estimates: ArrayView2<f32>, actual: ArrayView1<f32>, title: &str) -> String {
    let mut output = format!("{}\n", title);
    let last = estimates.nrows().checked_sub(1).map(|i| estimates.row(i));

    for (arm, &mean) in actual.iter().enumerate() {
        let estimate = match &last {
            Some(row) => row.get(arm).copied(),
            None => Some(0.0),
        };
        match estimate {
            Some(estimate) => output.push_str(&format!(
                "Arm {:>2}: Estimated={:>8.4}, Actual={:>8.4}, Error={:>8.4}\n",
                arm, estimate, mean, estimate - mean
            )),
            None => output.push_str(&format!(
                "Arm {:>2}: Estimated=     n/a, Actual={:>8.4}\n",
                arm, mean
            )),
        }
    }
    output
}

/// One-line summary of a curve
pub fn curve_summary(label: &str, values: &[f32]) -> String {
    let stats = Statistics::from_slice(values);
    let last = values.last().copied().unwrap_or(0.0);
    format!(
        "{}: Final={:.4}, Mean={:.4}, Std={:.4}, Min={:.4}, Max={:.4}, Points={}",
        label, last, stats.mean, stats.std, stats.min, stats.max, stats.count
    )
}
