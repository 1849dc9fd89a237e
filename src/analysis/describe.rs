use super::quantile::{quantile_sorted, sorted_finite};
use crate::data::{Column, ColumnKind, Dataset};

/// Row labels of the descriptive statistics table.
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Descriptive statistics of one numeric column. Undefined entries are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1).
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl ColumnStats {
    pub fn compute(column: &Column) -> Self {
        let sorted = sorted_finite(&column.numeric_values());
        let count = sorted.len();
        let q = |p: f64| quantile_sorted(&sorted, p).unwrap_or(f64::NAN);

        let mean = if count == 0 {
            f64::NAN
        } else {
            sorted.iter().sum::<f64>() / count as f64
        };
        let std = if count < 2 {
            f64::NAN
        } else {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        };

        ColumnStats {
            column: column.name.clone(),
            count,
            mean,
            std,
            min: q(0.0),
            q1: q(0.25),
            median: q(0.5),
            q3: q(0.75),
            max: q(1.0),
        }
    }

    /// Values in [`STAT_LABELS`] order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }
}

/// Statistics for every `Numeric` column, in dataset order.
pub fn describe(dataset: &Dataset) -> Vec<ColumnStats> {
    dataset
        .columns()
        .iter()
        .filter(|c| c.kind == ColumnKind::Numeric)
        .map(ColumnStats::compute)
        .collect()
}
