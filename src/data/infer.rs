//! Cell parsing and load-time column typing.
//!
//! Text sources hand every raw field to [`parse_cell`]; once a column is
//! complete, [`infer_column`] assigns its declared [`ColumnKind`]. Nothing
//! downstream inspects cell variants to decide a column's type.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{CellValue, Column, ColumnKind};

/// Field contents treated as missing in text sources.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Interpret one raw text field.
pub fn parse_cell(raw: &str) -> CellValue {
    let s = raw.trim();
    if MISSING_MARKERS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    CellValue::Text(s.to_string())
}

/// Parse a date or date-time string in one of the common layouts.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Coerce a cell to a date-time, `None` when it cannot be read as one.
pub fn coerce_datetime(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => parse_datetime(s),
        _ => None,
    }
}

/// Assign a declared type to a finished column of cells.
///
/// * every present cell numeric (integer, float, bool) → `Numeric`
/// * every present cell a date or date-like text → `Temporal`, text
///   cells are converted to dates
/// * anything else → `Categorical`
///
/// A column with rows but no present cells is `Numeric`; a column with no
/// rows at all is `Categorical`.
pub fn infer_column(name: impl Into<String>, mut cells: Vec<CellValue>) -> Column {
    if cells.is_empty() {
        return Column::new(name, ColumnKind::Categorical, cells);
    }

    let mut present = cells.iter().filter(|c| !c.is_null()).peekable();
    if present.peek().is_none() {
        return Column::new(name, ColumnKind::Numeric, cells);
    }

    let numeric = cells.iter().filter(|c| !c.is_null()).all(|c| {
        matches!(
            c,
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Bool(_)
        )
    });
    if numeric {
        return Column::new(name, ColumnKind::Numeric, cells);
    }

    let temporal = cells
        .iter()
        .filter(|c| !c.is_null())
        .all(|c| coerce_datetime(c).is_some());
    if temporal {
        for cell in &mut cells {
            if let CellValue::Text(s) = cell {
                if let Some(dt) = parse_datetime(s) {
                    *cell = CellValue::Date(dt);
                }
            }
        }
        return Column::new(name, ColumnKind::Temporal, cells);
    }

    Column::new(name, ColumnKind::Categorical, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalar_cells() {
        assert_eq!(parse_cell("42"), CellValue::Integer(42));
        assert_eq!(parse_cell(" 2.5 "), CellValue::Float(2.5));
        assert_eq!(parse_cell("True"), CellValue::Bool(true));
        assert_eq!(parse_cell("false"), CellValue::Bool(false));
        assert_eq!(parse_cell("abc"), CellValue::Text("abc".to_string()));
    }

    #[test]
    fn missing_markers_become_null() {
        for raw in ["", "NA", "NaN", "null", "#N/A", "  "] {
            assert_eq!(parse_cell(raw), CellValue::Null, "{raw:?}");
        }
    }

    #[test]
    fn parses_common_datetime_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap();
        assert_eq!(parse_datetime("2024-03-01 12:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-03-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_datetime("01/03/2024 12:30"), Some(expected));
        assert_eq!(
            parse_datetime("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(parse_datetime("not a date"), None);
    }

    #[test]
    fn numeric_column_tolerates_missing_cells() {
        let col = infer_column(
            "x",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Float(2.0)],
        );
        assert_eq!(col.kind, ColumnKind::Numeric);
    }

    #[test]
    fn mixed_text_and_numbers_is_categorical() {
        let col = infer_column(
            "x",
            vec![CellValue::Integer(1), CellValue::Text("b".to_string())],
        );
        assert_eq!(col.kind, ColumnKind::Categorical);
    }

    #[test]
    fn date_like_text_becomes_temporal() {
        let col = infer_column(
            "when",
            vec![
                CellValue::Text("2024-01-01".to_string()),
                CellValue::Null,
                CellValue::Text("2024-01-02 08:00:00".to_string()),
            ],
        );
        assert_eq!(col.kind, ColumnKind::Temporal);
        assert!(matches!(col.values[0], CellValue::Date(_)));
        assert!(matches!(col.values[2], CellValue::Date(_)));
    }

    #[test]
    fn all_missing_and_zero_row_columns() {
        let all_missing = infer_column("m", vec![CellValue::Null, CellValue::Null]);
        assert_eq!(all_missing.kind, ColumnKind::Numeric);

        let zero_rows = infer_column("z", Vec::new());
        assert_eq!(zero_rows.kind, ColumnKind::Categorical);
    }
}
