//! Hand-off point to whatever draws the learning curves.
//!
//! [`PlotSink`] is the collaborator interface; [`TextPlotter`] renders to ASCII
//! so experiments can be inspected from a terminal.

pub mod text_plots;
pub mod export;

use ndarray::{ArrayView1, ArrayView2};

pub use text_plots::{plot_series, render_value_grid, render_policy_grid, estimates_table, curve_summary};
pub use export::{export_report_json, export_curve_csv, export_estimates_csv};

/// Receiver for the series an experiment produces
pub trait PlotSink {
    /// A scalar curve over time, with an optional horizontal reference
    fn learning_curve(&mut self, title: &str, label: &str, values: &[f32], reference: Option<f32>);

    /// Per-arm estimates over time (one row per step) against the actual means
    fn estimates_over_time(&mut self, title: &str, estimates: ArrayView2<f32>, actual: ArrayView1<f32>);

    fn value_grid(&mut self, title: &str, values: ArrayView2<f32>);

    /// Direction indices per cell (0 = down, 1 = right, 2 = up, 3 = left)
    fn policy_grid(&mut self, title: &str, directions: ArrayView2<usize>);
}

/// Renders everything it receives into one text buffer
pub struct TextPlotter {
    width: usize,
    height: usize,
    output: String,
}

impl TextPlotter {
    pub fn new(width: usize, height: usize) -> Self {
        TextPlotter {
            width,
            height,
            output: String::new(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

impl Default for TextPlotter {
    fn default() -> Self {
        Self::new(60, 15)
    }
}

impl PlotSink for TextPlotter {
    fn learning_curve(&mut self, title: &str, label: &str, values: &[f32], reference: Option<f32>) {
        self.output.push_str(&plot_series(values, title, self.width, self.height, reference));
        self.output.push_str(&curve_summary(label, values));
        self.output.push_str("\n\n");
    }

    fn estimates_over_time(&mut self, title: &str, estimates: ArrayView2<f32>, actual: ArrayView1<f32>) {
        self.output.push_str(&estimates_table(estimates, actual, title));
        self.output.push('\n');
    }

    fn value_grid(&mut self, title: &str, values: ArrayView2<f32>) {
        self.output.push_str(&render_value_grid(values, title));
        self.output.push('\n');
    }

    fn policy_grid(&mut self, title: &str, directions: ArrayView2<usize>) {
        self.output.push_str(&render_policy_grid(directions, title));
        self.output.push('\n');
    }
}
