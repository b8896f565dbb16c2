//! Storage-specific error types for file operations.
//!
//! These wrap I/O, JSON and CSV errors and convert them to the error types of
//! the crate whose trait is being implemented.

use std::path::PathBuf;

use thiserror::Error;
use trendwatch_core::errors::Error;
use trendwatch_market_data::MarketDataError;

/// Storage-specific errors.
///
/// Internal to the storage layer; converted to `trendwatch_core::Error` or
/// `MarketDataError` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not replace {path}: {message}")]
    PersistFailed { path: PathBuf, message: String },

    #[error("{path}, line {line}: {message}")]
    InvalidRow {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Repository(err.to_string())
    }
}

impl From<StorageError> for MarketDataError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => MarketDataError::Io(e),
            other => MarketDataError::ProviderError {
                provider: "CSV".to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Extension trait for converting storage Results to core Results.
pub trait IntoCore<T> {
    fn into_core(self) -> trendwatch_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, StorageError> {
    fn into_core(self) -> trendwatch_core::Result<T> {
        self.map_err(Error::from)
    }
}
