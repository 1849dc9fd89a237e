use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a column
// ---------------------------------------------------------------------------

/// A loaded cell. The declared type of the owning [`Column`] decides how
/// the cell is interpreted; the cell itself only records what was read.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Booleans count as 0/1 and dates as Unix
    /// seconds; text and missing cells have none. NaN and infinities are
    /// missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_finite() => None,
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Date(d) => Some(d.and_utc().timestamp() as f64),
            CellValue::Text(_) | CellValue::Null => None,
        }
    }

    /// Whether the cell is a missing value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null) || matches!(self, CellValue::Float(v) if !v.is_finite())
    }
}

// ---------------------------------------------------------------------------
// Column – a named, typed sequence of cells
// ---------------------------------------------------------------------------

/// Declared type of a column, fixed when the dataset is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Temporal,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Temporal => write!(f, "temporal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(row, value)` pairs for every cell with a numeric view.
    /// Missing cells are skipped but row indices stay aligned with the
    /// dataset.
    pub fn numeric_cells(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(row, v)| v.as_f64().map(|x| (row, x)))
    }

    /// Present numeric values in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.numeric_cells().map(|(_, x)| x).collect()
    }

    pub fn non_null_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_null()).count()
    }

    /// Storage label in the style of a dataframe `dtype`.
    pub fn dtype_label(&self) -> &'static str {
        match self.kind {
            ColumnKind::Categorical => "object",
            ColumnKind::Temporal => "datetime64",
            ColumnKind::Numeric => {
                let present = || self.values.iter().filter(|v| !v.is_null());
                if present().next().is_none() {
                    "float64"
                } else if present().all(|v| matches!(v, CellValue::Bool(_))) {
                    "bool"
                } else if present().all(|v| matches!(v, CellValue::Integer(_))) {
                    "int64"
                } else {
                    "float64"
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DatasetError {
    #[error("column {column:?} has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },
}

/// Columns aligned by row index.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset, rejecting columns whose length differs from the
    /// first column.
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(DatasetError::RaggedColumn {
                column: bad.name.clone(),
                expected: n_rows,
                found: bad.len(),
            });
        }
        Ok(Dataset { columns, n_rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Dataset::new(vec![
            Column::new("a", ColumnKind::Numeric, vec![CellValue::Integer(1)]),
            Column::new("b", ColumnKind::Numeric, vec![]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::RaggedColumn {
                column: "b".to_string(),
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn numeric_cells_keep_row_indices() {
        let col = Column::new(
            "x",
            ColumnKind::Numeric,
            vec![
                CellValue::Integer(3),
                CellValue::Null,
                CellValue::Float(f64::NAN),
                CellValue::Bool(true),
            ],
        );
        let cells: Vec<_> = col.numeric_cells().collect();
        assert_eq!(cells, vec![(0, 3.0), (3, 1.0)]);
        assert_eq!(col.non_null_count(), 2);
    }

    #[test]
    fn infinities_count_as_missing() {
        let col = Column::new(
            "x",
            ColumnKind::Numeric,
            vec![
                CellValue::Float(f64::INFINITY),
                CellValue::Float(2.0),
                CellValue::Float(f64::NEG_INFINITY),
            ],
        );
        assert!(col.values[0].is_null());
        assert_eq!(col.values[2].as_f64(), None);
        assert_eq!(col.numeric_cells().collect::<Vec<_>>(), vec![(1, 2.0)]);
        assert_eq!(col.non_null_count(), 1);
    }

    #[test]
    fn dtype_labels_follow_storage() {
        let ints = Column::new("i", ColumnKind::Numeric, vec![CellValue::Integer(1), CellValue::Null]);
        let mixed = Column::new(
            "f",
            ColumnKind::Numeric,
            vec![CellValue::Integer(1), CellValue::Float(2.5)],
        );
        let flags = Column::new("b", ColumnKind::Numeric, vec![CellValue::Bool(false)]);
        let empty = Column::new("e", ColumnKind::Numeric, vec![CellValue::Null]);
        assert_eq!(ints.dtype_label(), "int64");
        assert_eq!(mixed.dtype_label(), "float64");
        assert_eq!(flags.dtype_label(), "bool");
        assert_eq!(empty.dtype_label(), "float64");
    }

    #[test]
    fn shape_counts_rows_and_columns() {
        let ds = Dataset::new(vec![
            Column::new("a", ColumnKind::Numeric, vec![CellValue::Integer(1); 3]),
            Column::new("b", ColumnKind::Categorical, vec![CellValue::Null; 3]),
        ])
        .unwrap();
        assert_eq!(ds.shape(), (3, 2));
        assert_eq!(ds.column_names(), vec!["a", "b"]);
        assert!(ds.column("c").is_none());
    }
}
