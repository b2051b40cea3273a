/// Data layer: table model, loading, assembly and aggregation.
///
/// Architecture:
/// ```text
///   data/*.csv        upload         generator
///        │               │               │
///        ▼               │               │
///   ┌──────────┐         │               │
///   │ catalog   │  files grouped by label │
///   └──────────┘         │               │
///        │               │               │
///        ▼               ▼               │
///   ┌──────────┐   ┌──────────┐          │
///   │  loader   │   │  upload  │          │
///   └──────────┘   └──────────┘          │
///        │               │               │
///        ▼               ▼               ▼
///   ┌──────────────────────────────────────┐
///   │ assemble   priority: upload > generated > local │
///   └──────────────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐   ┌───────────┐   ┌──────────────┐
///   │  schema   │ → │ aggregate  │ → │ distribution  │
///   └──────────┘   └───────────┘   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  Table → CSV bytes
///   └──────────┘
/// ```

pub mod aggregate;
pub mod assemble;
pub mod catalog;
pub mod distribution;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod schema;

pub use error::{AggregationError, ParseError};
pub use model::{CellValue, Table};
