//! Series provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Bar, InstrumentSpec};

use super::capabilities::ProviderCapabilities;

/// Trait for daily series providers.
///
/// Source-specific fetch behavior (endpoints, symbol mapping, fallbacks,
/// retries) lives entirely behind this trait. The calculation engine only ever
/// sees the normalized [`Series`](crate::models::Series) built from the bars.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use trendwatch_market_data::provider::{ProviderCapabilities, SeriesProvider};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl SeriesProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities {
///             sources: vec!["my_source".into()],
///             max_history_days: None,
///         }
///     }
///
///     // ... implement fetch_daily
/// }
/// ```
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Describes which source tags this provider serves.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Fetch up to `days` calendar days of daily bars for an instrument.
    ///
    /// Bars should be ordered by date ascending. Ordering is verified when the
    /// router builds the series; it is never repaired.
    async fn fetch_daily(&self, spec: &InstrumentSpec, days: u32)
        -> Result<Vec<Bar>, MarketDataError>;
}
