use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, TimeUnit, TimestampMillisecondType};
use arrow::error::ArrowError;
use calamine::{open_workbook_auto, Data, DataType as _, Reader};
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::infer::{infer_column, parse_cell};
use super::model::{CellValue, Dataset, DatasetError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported file format: {extension:?}")]
    UnsupportedFormat { extension: String },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {format} data in {}", path.display())]
    Malformed {
        format: &'static str,
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn malformed(path: &Path, format: &'static str, source: impl Into<BoxError>) -> LoadError {
    LoadError::Malformed {
        format,
        path: path.to_path_buf(),
        source: source.into(),
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv`           – delimited text with a header row
/// * `.json`                   – records array or column-oriented object
/// * `.jsonl` / `.ndjson`      – one JSON record per line
/// * `.xls` `.xlsx` `.xlsm` `.xlsb` `.ods` – first worksheet, header row first
/// * `.parquet` / `.pq`        – flat columns of scalar types
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "jsonl" | "ndjson" => load_json_lines(path)?,
        "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => load_workbook(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(LoadError::UnsupportedFormat {
                extension: other.to_string(),
            })
        }
    };

    let (rows, cols) = dataset.shape();
    log::info!("Loaded {rows} rows x {cols} columns from {}", path.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Column accumulation
// ---------------------------------------------------------------------------

/// Collects cells column by column while rows stream in. Columns first
/// seen late are back-filled with missing cells.
#[derive(Default)]
struct ColumnsBuilder {
    names: Vec<String>,
    cells: Vec<Vec<CellValue>>,
    rows: usize,
}

impl ColumnsBuilder {
    /// Positional columns. Repeated names get a `.N` suffix so every
    /// column stays addressable.
    fn with_headers(names: Vec<String>) -> Self {
        let names = dedupe_headers(names);
        let cells = vec![Vec::new(); names.len()];
        ColumnsBuilder {
            names,
            cells,
            rows: 0,
        }
    }

    fn column_index(&mut self, name: &str) -> usize {
        if let Some(idx) = self.names.iter().position(|n| n == name) {
            return idx;
        }
        self.names.push(name.to_string());
        self.cells.push(vec![CellValue::Null; self.rows]);
        self.names.len() - 1
    }

    /// Append a positional row; missing trailing cells are left null.
    fn push_row(&mut self, row: impl IntoIterator<Item = CellValue>) {
        for (col, cell) in self.cells.iter_mut().zip(row) {
            col.push(cell);
        }
        self.rows += 1;
        self.pad();
    }

    /// Append a keyed row; absent keys are null.
    fn push_record(&mut self, record: &Map<String, JsonValue>) {
        for (key, val) in record {
            let idx = self.column_index(key);
            self.cells[idx].push(json_to_cell(val));
        }
        self.rows += 1;
        self.pad();
    }

    fn pad(&mut self) {
        for col in &mut self.cells {
            col.resize(self.rows, CellValue::Null);
        }
    }

    fn finish(self) -> Result<Dataset, DatasetError> {
        let columns = self
            .names
            .into_iter()
            .zip(self.cells)
            .map(|(name, cells)| infer_column(name, cells))
            .collect();
        Dataset::new(columns)
    }
}

/// `x, x, x` becomes `x, x.1, x.2`, skipping suffixes already taken.
fn dedupe_headers(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        if seen.contains(&candidate) {
            let count = counts.entry(name.clone()).or_insert(0);
            while seen.contains(&candidate) {
                *count += 1;
                candidate = format!("{name}.{count}");
            }
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

fn normalize_header(raw: &str, idx: usize) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        format!("Unnamed: {idx}")
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per line. Rows with a
/// different field count are a parse error.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset, LoadError> {
    let format = if delimiter == b'\t' { "TSV" } else { "CSV" };
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(path, format, e))?
        .iter()
        .enumerate()
        .map(|(i, h)| normalize_header(h, i))
        .collect();

    let mut builder = ColumnsBuilder::with_headers(headers);
    for result in reader.records() {
        let record = result.map_err(|e| malformed(path, format, e))?;
        builder.push_row(record.iter().map(parse_cell));
    }

    Ok(builder.finish()?)
}

// ---------------------------------------------------------------------------
// JSON loaders
// ---------------------------------------------------------------------------

/// Accepted layouts:
///
/// ```json
/// [ { "a": 1, "b": "x" }, { "a": 2, "b": "y" } ]
/// { "a": [1, 2], "b": ["x", "y"] }
/// { "a": { "0": 1, "1": 2 }, "b": { "0": "x", "1": "y" } }
/// ```
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| malformed(path, "JSON", e))?;

    match root {
        JsonValue::Array(records) => {
            let mut builder = ColumnsBuilder::default();
            for (i, rec) in records.iter().enumerate() {
                let obj = rec
                    .as_object()
                    .ok_or_else(|| malformed(path, "JSON", format!("row {i} is not an object")))?;
                builder.push_record(obj);
            }
            Ok(builder.finish()?)
        }
        JsonValue::Object(columns) => load_json_columns(path, &columns),
        _ => Err(malformed(
            path,
            "JSON",
            "expected a top-level array of records or an object of columns",
        )),
    }
}

fn load_json_columns(path: &Path, columns: &Map<String, JsonValue>) -> Result<Dataset, LoadError> {
    // Row labels in first-seen order; list columns use positional labels.
    let mut labels: Vec<String> = Vec::new();
    for (name, col) in columns {
        let keys: Vec<String> = match col {
            JsonValue::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            JsonValue::Object(map) => map.keys().cloned().collect(),
            _ => {
                return Err(malformed(
                    path,
                    "JSON",
                    format!("column {name:?} is neither an array nor an object"),
                ))
            }
        };
        for key in keys {
            if !labels.contains(&key) {
                labels.push(key);
            }
        }
    }

    let mut builder = ColumnsBuilder::with_headers(columns.keys().cloned().collect());
    for label in &labels {
        let row = columns.values().map(|col| {
            let val = match col {
                JsonValue::Array(items) => label.parse::<usize>().ok().and_then(|i| items.get(i)),
                JsonValue::Object(map) => map.get(label),
                _ => None,
            };
            val.map(json_to_cell).unwrap_or(CellValue::Null)
        });
        builder.push_row(row);
    }
    Ok(builder.finish()?)
}

fn load_json_lines(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut builder = ColumnsBuilder::default();

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| io_error(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let value: JsonValue =
            serde_json::from_str(&line).map_err(|e| malformed(path, "JSON lines", e))?;
        let obj = value.as_object().ok_or_else(|| {
            malformed(
                path,
                "JSON lines",
                format!("line {} is not an object", line_no + 1),
            )
        })?;
        builder.push_record(obj);
    }

    Ok(builder.finish()?)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// First worksheet only; its first row holds the column names.
fn load_workbook(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| match e {
        calamine::Error::Io(source) => io_error(path, source),
        other => malformed(path, "workbook", other),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| malformed(path, "workbook", "no worksheet found"))?
        .map_err(|e| malformed(path, "workbook", e))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| normalize_header(&cell.to_string(), i))
            .collect(),
        None => Vec::new(),
    };

    let mut builder = ColumnsBuilder::with_headers(headers);
    for row in rows {
        builder.push_row(row.iter().map(excel_to_cell));
    }
    Ok(builder.finish()?)
}

fn excel_to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(CellValue::Date)
            .unwrap_or(CellValue::Null),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat scalar columns. Non-numeric, non-temporal
/// columns are cast to text; a type arrow cannot cast fails the load.
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| malformed(path, "parquet", e))?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .enumerate()
        .map(|(i, f)| normalize_header(f.name(), i))
        .collect();
    let reader = builder.build().map_err(|e| malformed(path, "parquet", e))?;

    let mut columns = ColumnsBuilder::with_headers(names);
    for batch_result in reader {
        let batch = batch_result.map_err(|e| malformed(path, "parquet", e))?;
        for (idx, array) in batch.columns().iter().enumerate() {
            let cells = arrow_to_cells(array).map_err(|e| malformed(path, "parquet", e))?;
            columns.cells[idx].extend(cells);
        }
        columns.rows += batch.num_rows();
    }
    Ok(columns.finish()?)
}

/// Convert a whole Arrow column into cells.
fn arrow_to_cells(array: &ArrayRef) -> Result<Vec<CellValue>, ArrowError> {
    let cells = match array.data_type() {
        DataType::Boolean => {
            let arr = array.as_boolean();
            cells_from(array, |i| CellValue::Bool(arr.value(i)))
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => {
            let ints = cast(array, &DataType::Int64)?;
            let arr = ints.as_primitive::<Int64Type>();
            cells_from(&ints, |i| CellValue::Integer(arr.value(i)))
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let floats = cast(array, &DataType::Float64)?;
            let arr = floats.as_primitive::<Float64Type>();
            cells_from(&floats, |i| CellValue::Float(arr.value(i)))
        }
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            let stamps = cast(array, &DataType::Timestamp(TimeUnit::Millisecond, None))?;
            let arr = stamps.as_primitive::<TimestampMillisecondType>();
            cells_from(&stamps, |i| {
                DateTime::from_timestamp_millis(arr.value(i))
                    .map(|dt| CellValue::Date(dt.naive_utc()))
                    .unwrap_or(CellValue::Null)
            })
        }
        _ => {
            let text = cast(array, &DataType::Utf8)?;
            let arr = text.as_string::<i32>();
            cells_from(&text, |i| CellValue::Text(arr.value(i).to_string()))
        }
    };
    Ok(cells)
}

fn cells_from(array: &ArrayRef, value: impl Fn(usize) -> CellValue) -> Vec<CellValue> {
    (0..array.len())
        .map(|i| {
            if array.is_null(i) {
                CellValue::Null
            } else {
                value(i)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_is_rejected_before_io() {
        let err = load_file(Path::new("/definitely/missing/data.feather")).unwrap_err();
        assert!(
            matches!(err, LoadError::UnsupportedFormat { ref extension } if extension == "feather")
        );
    }

    #[test]
    fn missing_extension_is_unsupported() {
        let err = load_file(Path::new("data")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn builder_backfills_late_columns() {
        let mut builder = ColumnsBuilder::default();
        let first: Map<String, JsonValue> =
            serde_json::from_str(r#"{"a": 1}"#).unwrap();
        let second: Map<String, JsonValue> =
            serde_json::from_str(r#"{"b": "x", "a": 2}"#).unwrap();
        builder.push_record(&first);
        builder.push_record(&second);
        let ds = builder.finish().unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b"]);
        assert_eq!(
            ds.column("b").unwrap().values,
            vec![CellValue::Null, CellValue::Text("x".to_string())]
        );
    }

    #[test]
    fn blank_and_error_workbook_cells_are_missing() {
        assert_eq!(excel_to_cell(&Data::Empty), CellValue::Null);
        assert_eq!(
            excel_to_cell(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Null
        );
        assert_eq!(excel_to_cell(&Data::String(" ".to_string())), CellValue::Null);
        assert_eq!(excel_to_cell(&Data::Int(7)), CellValue::Integer(7));
    }

    #[test]
    fn repeated_headers_get_numbered_suffixes() {
        let names = ["x", "y", "x", "x.1", "x"].map(String::from).to_vec();
        assert_eq!(dedupe_headers(names), vec!["x", "y", "x.1", "x.1.1", "x.2"]);
    }

    #[test]
    fn blank_headers_get_positional_names() {
        assert_eq!(normalize_header("\u{feff} id ", 0), "id");
        assert_eq!(normalize_header("  ", 3), "Unnamed: 3");
    }
}
