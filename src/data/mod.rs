/// Data layer: core types, loading, and the filter-and-rank engine.
///
/// Architecture:
/// ```text
///  .xlsx (results sheet) / .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐   ┌─────────┐
///   │  loader   │◄──│  cache   │  (path, mtime + size) → Arc<BatterTable>
///   └──────────┘   └─────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ BatterTable  │  Vec<BatterRecord>, dataset-wide stats
///   └─────────────┘
///        │  FilterCriteria, SortKey
///        ▼
///   ┌──────────┐
///   │ pipeline  │  filter → annotate_elite → summarize → rank → display
///   └──────────┘
///        │
///        ▼
///   Outcome::Empty | Outcome::Ready(FilteredResult) ──► export (CSV bytes)
/// ```

pub mod cache;
pub mod display;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod summary;
