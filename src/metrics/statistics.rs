use ndarray::ArrayView2;

/// Summary of a learning curve or value table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub mean: f32,
    /// Population standard deviation
    pub std: f32,
    pub min: f32,
    pub max: f32,
    pub count: usize,
}

impl Statistics {
    /// Single pass over `values` (Welford, accumulated in f64).
    ///
    /// An empty input yields all-zero statistics with `count == 0`.
    pub fn from_values<I: IntoIterator<Item = f32>>(values: I) -> Self {
        let mut count = 0usize;
        let mut mean = 0.0f64;
        let mut m2 = 0.0f64;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;

        for value in values {
            count += 1;
            let delta = value as f64 - mean;
            mean += delta / count as f64;
            m2 += delta * (value as f64 - mean);
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return Statistics { mean: 0.0, std: 0.0, min: 0.0, max: 0.0, count };
        }

        Statistics {
            mean: mean as f32,
            std: (m2 / count as f64).sqrt() as f32,
            min,
            max,
            count,
        }
    }

    pub fn from_slice(values: &[f32]) -> Self {
        Self::from_values(values.iter().copied())
    }

    /// Statistics over every cell of a table
    pub fn from_grid(grid: ArrayView2<f32>) -> Self {
        Self::from_values(grid.iter().copied())
    }
}
