//! File-backed storage for Trendwatch.
//!
//! This crate implements the persistence and data-source seams defined in
//! `trendwatch-core` and `trendwatch-market-data` on top of plain files:
//! - [`JsonRankingHistoryStore`]: the two-generation rank history as one JSON document
//! - [`CsvSeriesProvider`]: daily bars read from one CSV file per instrument
//!
//! ```text
//! core (engine)        market-data (router)
//!       │                      │
//!       ▼                      ▼
//!  RankingHistoryStore    SeriesProvider
//!       │                      │
//!       └──────────┬───────────┘
//!                  ▼
//!          storage-fs (this crate)
//!                  │
//!                  ▼
//!           history.json, <code>.csv
//! ```

pub mod errors;
pub mod history;
pub mod series;
pub mod utils;

pub use errors::{IntoCore, StorageError};
pub use history::JsonRankingHistoryStore;
pub use series::CsvSeriesProvider;
pub use utils::write_json_atomic;

// Re-export from trendwatch-core for convenience
pub use trendwatch_core::errors::{Error, Result};
