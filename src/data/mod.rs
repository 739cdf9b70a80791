/// Data layer: core types, loading, querying and projection.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .parquet
///        │
///        ▼
///   ┌───────────┐
///   │ discovery │  config path or candidate names → file
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset (CDF, PDF)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetStore │  both tables, read-only
///   └──────────────┘
///        │                     │
///        ▼                     ▼
///   ┌──────────┐        ┌───────────┐
///   │  filter  │        │ projector │  Selection × (CDF, PDF) → chart series
///   └──────────┘        └───────────┘
///   substring query
/// ```

pub mod discovery;
pub mod filter;
pub mod loader;
pub mod model;
pub mod paging;
pub mod projector;
pub mod store;
