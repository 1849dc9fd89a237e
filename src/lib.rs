//! Exploratory data analysis helper: loads a tabular file, prints summary
//! statistics and flags outliers with the interquartile-range rule.

pub mod analysis;
pub mod color;
pub mod config;
pub mod data;
pub mod render;
pub mod report;
