/// Dataset store: core types and the one-time load.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordTable (validated once)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordTable  │  rows, header order, numeric column set
///   └─────────────┘
///        │
///        ▼
///   crate::views   pure (table, selection) → chart-ready result
/// ```

pub mod loader;
pub mod model;

pub use loader::load_file;
pub use model::{ColumnRoles, Record, RecordTable, Value};
