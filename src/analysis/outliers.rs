use std::fmt;

use serde::Serialize;

use super::quantile::{quantile_sorted, sorted_finite};
use crate::data::{Column, Dataset};

pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("IQR multiplier must be finite and non-negative, got {0}")]
pub struct InvalidMultiplier(pub f64);

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Fences derived from the first and third quartiles of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    pub fn from_quartiles(q1: f64, q3: f64, multiplier: f64) -> Self {
        let iqr = q3 - q1;
        OutlierBounds {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        }
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Strictly outside `[lower, upper]`.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Result for one evaluated column. `bounds` is `None` when the column had
/// no present values and was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOutliers {
    pub column: String,
    pub bounds: Option<OutlierBounds>,
    /// Row indices of the outlying values, ascending.
    pub rows: Vec<usize>,
}

impl ColumnOutliers {
    pub fn has_outliers(&self) -> bool {
        !self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub multiplier: f64,
    pub columns: Vec<ColumnOutliers>,
}

impl OutlierReport {
    /// Columns with at least one outlier, in evaluation order.
    pub fn flagged_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.has_outliers())
            .map(|c| c.column.as_str())
            .collect()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnOutliers> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn is_clean(&self) -> bool {
        self.columns.iter().all(|c| !c.has_outliers())
    }
}

/// The banner printed after detection.
impl fmt::Display for OutlierReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "*".repeat(47);
        let names: Vec<String> = self
            .flagged_columns()
            .iter()
            .map(|name| format!("'{name}'"))
            .collect();
        writeln!(f, "{rule}")?;
        writeln!(f, "Columns Containing Outliers Include: [{}]", names.join(", "))?;
        write!(f, "{rule}")
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// IQR-rule outlier detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierDetector {
    multiplier: f64,
}

impl Default for OutlierDetector {
    fn default() -> Self {
        OutlierDetector {
            multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

impl OutlierDetector {
    pub fn new(multiplier: f64) -> Result<Self, InvalidMultiplier> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(InvalidMultiplier(multiplier));
        }
        Ok(OutlierDetector { multiplier })
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Quartile fences for a column, `None` without present values.
    pub fn bounds(&self, column: &Column) -> Option<OutlierBounds> {
        let sorted = sorted_finite(&column.numeric_values());
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        Some(OutlierBounds::from_quartiles(q1, q3, self.multiplier))
    }

    /// Evaluate one column.
    pub fn evaluate(&self, column: &Column) -> ColumnOutliers {
        let bounds = self.bounds(column);
        let rows = match bounds {
            Some(b) => column
                .numeric_cells()
                .filter(|&(_, v)| b.is_outlier(v))
                .map(|(row, _)| row)
                .collect(),
            None => Vec::new(),
        };
        ColumnOutliers {
            column: column.name.clone(),
            bounds,
            rows,
        }
    }

    /// Evaluate each named column independently. Unknown names are skipped.
    pub fn detect<S: AsRef<str>>(&self, dataset: &Dataset, columns: &[S]) -> OutlierReport {
        let mut evaluated = Vec::with_capacity(columns.len());
        for name in columns {
            let name = name.as_ref();
            let Some(column) = dataset.column(name) else {
                log::warn!("column {name:?} not found, skipping outlier check");
                continue;
            };
            let result = self.evaluate(column);
            match &result.bounds {
                Some(b) => log::debug!(
                    "{name}: q1={} q3={} bounds=({}, {}) outliers={}",
                    b.q1,
                    b.q3,
                    b.lower,
                    b.upper,
                    result.rows.len()
                ),
                None => log::debug!("{name}: no present values, skipped"),
            }
            evaluated.push(result);
        }
        OutlierReport {
            multiplier: self.multiplier,
            columns: evaluated,
        }
    }
}
