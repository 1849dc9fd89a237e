/// Data layer: core types, load-time typing, and file loading.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .jsonl / .xlsx / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → raw cells per column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  infer    │  declare Numeric | Categorical | Temporal per column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Column>, aligned by row index
///   └──────────┘
/// ```

pub mod infer;
pub mod loader;
pub mod model;

pub use loader::{load_file, LoadError};
pub use model::{CellValue, Column, ColumnKind, Dataset, DatasetError};
