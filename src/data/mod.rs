/// Data layer: raw rows, translation, filtering and grouping.
///
/// Architecture:
/// ```text
///  .csv / .tsv / stdin
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  schema + drop rules → Vec<CanonicalRow>, FilterReport
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  group    │  bucket by category, optional seeded sample
///   └──────────┘
/// ```

pub mod filter;
pub mod group;
pub mod loader;
pub mod model;
pub mod schema;
