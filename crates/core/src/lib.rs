//! Trendwatch Core - MA20 trend evaluation, ranking and rank history.
//!
//! This crate contains the calculation engine. It is storage-agnostic and
//! defines the [`ranking::RankingHistoryStore`] trait that is implemented
//! by the `storage-fs` crate.

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod ranking;
pub mod series;
pub mod snapshot;
pub mod trend;
pub mod utils;

pub use config::{EngineConfig, UniverseConfig};
pub use engine::{InstrumentInput, TrendEngine, TrendService};
pub use snapshot::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
