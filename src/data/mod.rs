/// Data layer: core types, ingestion, filter schema, and export.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + combine exports → PlayerTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ PlayerTable │  rows, column dtypes, distinct values
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐        ┌──────────┐
///   │  filter   │  ───▶  │  export   │
///   └──────────┘        └──────────┘
///   schema + active set → row indices → filtered CSV
/// ```

pub mod export;
pub mod filter;
pub mod format;
pub mod loader;
pub mod model;
