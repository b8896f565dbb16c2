//! Error types for the market data crate.

use thiserror::Error;

use crate::models::SeriesError;

/// Errors that can occur while fetching and normalizing a daily series.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but the provider returned no bars.
    #[error("No data for {0}")]
    NoData(String),

    /// Bars came back out of order or with duplicate dates.
    #[error("Malformed series for {code}: {source}")]
    MalformedSeries {
        code: String,
        #[source]
        source: SeriesError,
    },

    /// Data validation failed.
    /// The provider returned bars that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// No registered provider handles the instrument's source tag.
    #[error("No provider registered for source: {0}")]
    NoProviderForSource(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarketDataError {
    /// Whether the failure is specific to this instrument's data rather than
    /// the provider itself.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::SymbolNotFound(_)
                | Self::NoData(_)
                | Self::MalformedSeries { .. }
                | Self::ValidationFailed { .. }
        )
    }
}
