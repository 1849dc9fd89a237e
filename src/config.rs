use crate::analysis::{InvalidMultiplier, OutlierDetector, DEFAULT_IQR_MULTIPLIER};

pub const DEFAULT_DATE_COLUMN: &str = "Date and Time";
pub const DEFAULT_HEAD_ROWS: usize = 5;

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Fence distance in IQRs beyond the quartiles.
    pub iqr_multiplier: f64,
    /// Column whose date range is reported when present.
    pub date_column: String,
    /// Rows shown in the head preview.
    pub head_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            head_rows: DEFAULT_HEAD_ROWS,
        }
    }
}

impl AnalysisConfig {
    pub fn detector(&self) -> Result<OutlierDetector, InvalidMultiplier> {
        OutlierDetector::new(self.iqr_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.date_column, "Date and Time");
        assert_eq!(config.head_rows, 5);
        assert_eq!(config.detector().unwrap(), OutlierDetector::default());
    }

    #[test]
    fn bad_multiplier_is_rejected() {
        let config = AnalysisConfig {
            iqr_multiplier: f64::INFINITY,
            ..AnalysisConfig::default()
        };
        assert!(config.detector().is_err());
    }
}
