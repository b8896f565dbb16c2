//! Routes instruments to series providers by source tag.

use std::sync::Arc;

use log::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{InstrumentSpec, Series, SourceTag};
use crate::provider::SeriesProvider;

use super::validator::BarValidator;

/// Picks the provider for each instrument and normalizes what it returns.
///
/// The first registered provider whose capabilities list the instrument's
/// source tag wins. Bars are validated and then turned into a [`Series`];
/// ordering problems are reported, never repaired.
pub struct ProviderRouter {
    providers: Vec<Arc<dyn SeriesProvider>>,
    validator: BarValidator,
}

impl ProviderRouter {
    pub fn new(providers: Vec<Arc<dyn SeriesProvider>>) -> Self {
        Self::with_validator(providers, BarValidator::new())
    }

    pub fn with_validator(providers: Vec<Arc<dyn SeriesProvider>>, validator: BarValidator) -> Self {
        Self {
            providers,
            validator,
        }
    }

    /// Provider serving `source`, if any.
    pub fn provider_for(&self, source: &SourceTag) -> Option<&Arc<dyn SeriesProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.capabilities().supports(source))
    }

    /// Fetch, validate and order-check the daily series of one instrument.
    pub async fn fetch_series(
        &self,
        spec: &InstrumentSpec,
        days: u32,
    ) -> Result<Series, MarketDataError> {
        let provider = self
            .provider_for(&spec.source)
            .ok_or_else(|| MarketDataError::NoProviderForSource(spec.source.to_string()))?;

        let days = match provider.capabilities().max_history_days {
            Some(max) if max < days => {
                debug!(
                    "{} caps history at {} days, requested {} for {}",
                    provider.id(),
                    max,
                    days,
                    spec.code
                );
                max
            }
            _ => days,
        };

        let bars = provider.fetch_daily(spec, days).await?;
        if bars.is_empty() {
            return Err(MarketDataError::NoData(spec.code.clone()));
        }

        if let Err(e) = self.validator.validate_all(&bars) {
            warn!("Rejecting series for {} from {}: {}", spec.code, provider.id(), e);
            return Err(e);
        }

        let series = Series::new(bars).map_err(|source| MarketDataError::MalformedSeries {
            code: spec.code.clone(),
            source,
        })?;

        debug!(
            "Fetched {} daily bars for {} from {}",
            series.len(),
            spec.code,
            provider.id()
        );
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bar, InstrumentCategory};
    use crate::provider::ProviderCapabilities;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    struct FixedProvider {
        id: &'static str,
        source: &'static str,
        bars: Vec<Bar>,
    }

    #[async_trait]
    impl SeriesProvider for FixedProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities {
                sources: vec![self.source.into()],
                max_history_days: None,
            }
        }

        async fn fetch_daily(
            &self,
            _spec: &InstrumentSpec,
            _days: u32,
        ) -> Result<Vec<Bar>, MarketDataError> {
            Ok(self.bars.clone())
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn spec(source: &str) -> InstrumentSpec {
        InstrumentSpec::new("HSI", "Hang Seng", InstrumentCategory::EquityRegion, source)
    }

    #[tokio::test]
    async fn test_routes_by_source_tag() {
        let router = ProviderRouter::new(vec![
            Arc::new(FixedProvider {
                id: "A",
                source: "us",
                bars: vec![],
            }),
            Arc::new(FixedProvider {
                id: "B",
                source: "hk",
                bars: vec![Bar::from_close(day(1), dec!(100)), Bar::from_close(day(2), dec!(101))],
            }),
        ]);

        assert_eq!(router.provider_for(&"hk".into()).unwrap().id(), "B");
        let series = router.fetch_series(&spec("hk"), 30).await.unwrap();
        assert_eq!(series.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_source_is_an_error() {
        let router = ProviderRouter::new(vec![]);
        let err = router.fetch_series(&spec("jp"), 30).await.unwrap_err();
        assert!(matches!(err, MarketDataError::NoProviderForSource(tag) if tag == "jp"));
    }

    #[tokio::test]
    async fn test_empty_response_is_no_data() {
        let router = ProviderRouter::new(vec![Arc::new(FixedProvider {
            id: "A",
            source: "hk",
            bars: vec![],
        })]);
        let err = router.fetch_series(&spec("hk"), 30).await.unwrap_err();
        assert!(matches!(err, MarketDataError::NoData(code) if code == "HSI"));
    }

    #[tokio::test]
    async fn test_out_of_order_bars_are_rejected() {
        let router = ProviderRouter::new(vec![Arc::new(FixedProvider {
            id: "A",
            source: "hk",
            bars: vec![Bar::from_close(day(2), dec!(100)), Bar::from_close(day(1), dec!(101))],
        })]);
        let err = router.fetch_series(&spec("hk"), 30).await.unwrap_err();
        assert!(matches!(err, MarketDataError::MalformedSeries { .. }));
    }
}
