//! Core error types for the trend engine.
//!
//! Insufficient data and an unfound transition are not errors: they travel as
//! explicit values through the snapshots. Errors here are caller contract
//! violations, configuration problems and run-level aborts.

use chrono::NaiveDate;
use thiserror::Error;
use trendwatch_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the trend engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Ranking history error: {0}")]
    History(#[from] HistoryError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Too many instruments without data: {failed} of {total}")]
    TooManyFailures { failed: usize, total: usize },

    #[error("No instrument produced usable data")]
    NoUsableData,

    #[error("Backfill range {start} to {end} is empty")]
    EmptyBackfillRange { start: NaiveDate, end: NaiveDate },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised while loading or validating the universe configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("The instrument universe is empty")]
    EmptyUniverse,

    #[error("Instrument code '{0}' is configured more than once")]
    DuplicateCode(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Errors raised by ranking history bookkeeping.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Cannot record ranks for {date}: history already holds a newer generation ({latest})")]
    OutOfOrder { latest: NaiveDate, date: NaiveDate },

    #[error("Generations are not ordered: previous {previous} is not before latest {latest}")]
    Unordered {
        previous: NaiveDate,
        latest: NaiveDate,
    },
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Repository(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Repository(err.to_string())
    }
}
