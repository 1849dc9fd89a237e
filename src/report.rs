//! Printed overview of a loaded dataset.

use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::NaiveDateTime;

use crate::analysis::describe::STAT_LABELS;
use crate::analysis::{describe, ColumnClassification};
use crate::config::AnalysisConfig;
use crate::data::infer::coerce_datetime;
use crate::data::{Column, Dataset};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to format table")]
    Table(#[from] ArrowError),
}

fn banner(out: &mut impl Write, title: &str) -> std::io::Result<()> {
    let rule = "=".repeat(40);
    writeln!(out, "{rule}\n{title}\n{rule}")
}

/// Write every overview section: shape, column names, optional date range,
/// classification, data summary, descriptive statistics and head preview.
pub fn write_overview<W: Write>(
    out: &mut W,
    dataset: &Dataset,
    classification: &ColumnClassification,
    config: &AnalysisConfig,
) -> Result<(), ReportError> {
    let (rows, cols) = dataset.shape();
    banner(out, &format!("Shape of the dataset : ({rows}, {cols})"))?;
    writeln!(out)?;

    banner(out, "Column Names")?;
    writeln!(out, "{:?}\n", dataset.column_names())?;

    if let Some(column) = dataset.column(&config.date_column) {
        banner(out, &format!("Range of the Dataset ({})", config.date_column))?;
        let (start, end) = match date_range(column) {
            Some((start, end)) => (start.to_string(), end.to_string()),
            None => ("NaT".to_string(), "NaT".to_string()),
        };
        writeln!(out, "Start Date: {start}")?;
        writeln!(out, "End Date:   {end}")?;
    }
    writeln!(out)?;

    banner(out, "Numerical Columns")?;
    writeln!(out, "{:?}\n", classification.numerical)?;
    banner(out, "Categorical Columns")?;
    writeln!(out, "{:?}\n", classification.categorical)?;

    banner(out, "Data Summary")?;
    writeln!(out, "{}", info_table(dataset)?)?;

    banner(out, "Descriptive Statistics")?;
    writeln!(out, "{}", describe_table(dataset)?)?;

    banner(out, "Dataset Overview")?;
    writeln!(out, "{}", head_table(dataset, config.head_rows)?)?;
    Ok(())
}

/// Earliest and latest value of a column read as date-times; cells that
/// are not dates are ignored.
pub fn date_range(column: &Column) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut dates = column.values.iter().filter_map(coerce_datetime);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

/// Per-column index, name, non-null count and dtype.
pub fn info_table(dataset: &Dataset) -> Result<String, ArrowError> {
    let headers = ["#", "Column", "Non-Null Count", "Dtype"];
    let rows: Vec<Vec<String>> = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                i.to_string(),
                c.name.clone(),
                format!("{} non-null", c.non_null_count()),
                c.dtype_label().to_string(),
            ]
        })
        .collect();
    string_table(&headers, &rows)
}

/// `describe()`-style table: one row per statistic, one column per
/// numeric column.
pub fn describe_table(dataset: &Dataset) -> Result<String, ArrowError> {
    let stats = describe(dataset);
    if stats.is_empty() {
        return Ok("No numeric columns to describe".to_string());
    }
    let mut headers = vec![""];
    headers.extend(stats.iter().map(|s| s.column.as_str()));

    let rows: Vec<Vec<String>> = STAT_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mut row = vec![label.to_string()];
            row.extend(stats.iter().map(|s| format_stat(s.values()[i])));
            row
        })
        .collect();
    string_table(&headers, &rows)
}

/// The first `n` rows.
pub fn head_table(dataset: &Dataset, n: usize) -> Result<String, ArrowError> {
    let mut headers = vec![""];
    headers.extend(dataset.column_names());
    let rows: Vec<Vec<String>> = (0..dataset.len().min(n))
        .map(|row| {
            let mut cells = vec![row.to_string()];
            cells.extend(dataset.columns().iter().map(|c| c.values[row].to_string()));
            cells
        })
        .collect();
    string_table(&headers, &rows)
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}

/// Render string cells through arrow's pretty printer.
fn string_table(headers: &[&str], rows: &[Vec<String>]) -> Result<String, ArrowError> {
    if headers.is_empty() || rows.is_empty() {
        return Ok("Empty table".to_string());
    }

    let fields: Vec<Field> = headers
        .iter()
        .map(|h| Field::new(*h, DataType::Utf8, true))
        .collect();
    let columns: Vec<ArrayRef> = (0..headers.len())
        .map(|c| {
            let values = rows
                .iter()
                .map(|r| r.get(c).map(String::as_str).unwrap_or(""));
            Arc::new(StringArray::from_iter_values(values)) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}
