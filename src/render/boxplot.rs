use chrono::DateTime;
use serde::Serialize;

use super::RenderError;
use crate::analysis::quantile::{quantile_sorted, sorted_finite};
use crate::analysis::OutlierBounds;
use crate::data::{Column, ColumnKind};

/// Rotation applied to x tick labels.
pub const TICK_ROTATION_DEG: f32 = 45.0;

/// Five-number summary plus the points drawn beyond the whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Whiskers reach the most extreme values still inside `bounds`.
    pub fn compute(values: &[f64], bounds: &OutlierBounds) -> Option<Self> {
        let sorted = sorted_finite(values);
        let median = quantile_sorted(&sorted, 0.5)?;
        if !bounds.lower.is_finite() || !bounds.upper.is_finite() {
            return None;
        }

        let inside = || sorted.iter().copied().filter(|&v| !bounds.is_outlier(v));
        let lower_whisker = inside().next().unwrap_or(bounds.q1);
        let upper_whisker = inside().last().unwrap_or(bounds.q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| bounds.is_outlier(v))
            .collect();

        Some(BoxStats {
            q1: bounds.q1,
            median,
            q3: bounds.q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }

    /// Smallest and largest value drawn, whiskers and outliers included.
    pub fn extent(&self) -> (f64, f64) {
        let lo = self
            .outliers
            .iter()
            .copied()
            .fold(self.lower_whisker, f64::min);
        let hi = self
            .outliers
            .iter()
            .copied()
            .fold(self.upper_whisker, f64::max);
        (lo, hi)
    }
}

/// One subplot of the outlier figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxplotPanel {
    pub column: String,
    pub kind: ColumnKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub tick_rotation_deg: f32,
    pub stats: BoxStats,
}

impl BoxplotPanel {
    pub fn new(column: &Column, bounds: &OutlierBounds) -> Result<Self, RenderError> {
        let stats = BoxStats::compute(&column.numeric_values(), bounds)
            .ok_or_else(|| RenderError::NoValues(column.name.clone()))?;
        Ok(BoxplotPanel {
            column: column.name.clone(),
            kind: column.kind,
            title: column.name.clone(),
            x_label: column.name.clone(),
            y_label: "Values".to_string(),
            tick_rotation_deg: TICK_ROTATION_DEG,
            stats,
        })
    }

    /// Human-readable axis value; temporal columns plot Unix seconds.
    pub fn format_value(&self, value: f64) -> String {
        format_axis_value(self.kind, value)
    }
}

pub fn format_axis_value(kind: ColumnKind, value: f64) -> String {
    match kind {
        ColumnKind::Temporal => DateTime::from_timestamp(value.round() as i64, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| format!("{value}")),
        _ => {
            let text = format!("{value:.4}");
            let text = text.trim_end_matches('0').trim_end_matches('.');
            if text == "-0" {
                "0".to_string()
            } else {
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(q1: f64, q3: f64) -> OutlierBounds {
        OutlierBounds::from_quartiles(q1, q3, 1.5)
    }

    #[test]
    fn whiskers_stop_at_last_inside_value() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = BoxStats::compute(&values, &bounds(2.25, 4.75)).unwrap();
        assert_eq!(stats.median, 3.5);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.extent(), (1.0, 100.0));
    }

    #[test]
    fn no_values_no_stats() {
        assert!(BoxStats::compute(&[], &bounds(0.0, 1.0)).is_none());
        assert!(BoxStats::compute(&[f64::NAN], &bounds(0.0, 1.0)).is_none());
    }

    #[test]
    fn every_value_outside_falls_back_to_quartiles() {
        let tight = OutlierBounds::from_quartiles(2.5, 7.5, 0.0);
        let stats = BoxStats::compute(&[0.0, 10.0], &tight).unwrap();
        assert_eq!((stats.lower_whisker, stats.upper_whisker), (2.5, 7.5));
        assert_eq!(stats.outliers, vec![0.0, 10.0]);
    }

    #[test]
    fn axis_values_are_trimmed() {
        assert_eq!(format_axis_value(ColumnKind::Numeric, 8.5), "8.5");
        assert_eq!(format_axis_value(ColumnKind::Numeric, 100.0), "100");
        assert_eq!(format_axis_value(ColumnKind::Numeric, -0.00001), "0");
        assert_eq!(
            format_axis_value(ColumnKind::Temporal, 86_400.0),
            "1970-01-02 00:00"
        );
    }
}
