/// Data layer: incident types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → IncidentDataset (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Selection → indices of matching incidents
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  counts, acreage groups, county × year pivot
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  chart    │  pie slices, bars, map points → Dashboard
///   └──────────┘
/// ```

pub mod aggregate;
pub mod chart;
pub mod filter;
pub mod loader;
pub mod model;
