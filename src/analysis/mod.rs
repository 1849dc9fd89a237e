//! Column classification, quantiles, descriptive statistics and IQR
//! outlier detection over a loaded [`Dataset`](crate::data::Dataset).

pub mod classify;
pub mod describe;
pub mod outliers;
pub mod quantile;

pub use classify::ColumnClassification;
pub use describe::{describe, ColumnStats};
pub use outliers::{
    ColumnOutliers, InvalidMultiplier, OutlierBounds, OutlierDetector, OutlierReport,
    DEFAULT_IQR_MULTIPLIER,
};
