/// Data layer: core types, loading, filtering and aggregation.
///
/// Nothing in here touches the UI; every function is a pure derivation
/// from an immutable dataset snapshot plus user criteria.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RateDataset (decimal separator normalised)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RateDataset  │  Vec<RateRecord>, column presence flags
///   └─────────────┘
///        │                    ┌──────────┐
///        ├───────────────────▶│ options   │  dropdown entries for the period
///        ▼                    └──────────┘
///   ┌──────────┐
///   │ pipeline  │  period → filter → summary + display rows → RateView
///   └──────────┘
/// ```
///
/// `company` is the separate, unfiltered company financials table.

pub mod company;
pub mod display;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod model;
pub mod number;
pub mod options;
pub mod pipeline;
pub mod summary;
