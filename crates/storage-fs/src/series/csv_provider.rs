//! Daily bars from one CSV file per instrument.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;
use trendwatch_market_data::{
    Bar, InstrumentSpec, MarketDataError, ProviderCapabilities, SeriesProvider, SourceTag,
};

use crate::errors::StorageError;

const PROVIDER_ID: &str = "CSV";

/// Source tag served when none is configured.
pub const DEFAULT_CSV_SOURCE: &str = "csv";

/// Row shape of `<data_dir>/<code>.csv`.
///
/// Only `date` and `close` are required; missing open/high/low fall back to
/// the close.
#[derive(Debug, Deserialize)]
struct CsvBarRecord {
    date: String,
    #[serde(default)]
    open: Option<String>,
    #[serde(default)]
    high: Option<String>,
    #[serde(default)]
    low: Option<String>,
    close: String,
    #[serde(default)]
    volume: Option<String>,
}

/// Reads `<data_dir>/<code>.csv` with a `date,open,high,low,close,volume`
/// header, dates as `YYYY-MM-DD`, oldest row first.
pub struct CsvSeriesProvider {
    data_dir: PathBuf,
    sources: Vec<SourceTag>,
}

impl CsvSeriesProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_sources(data_dir, vec![SourceTag::from(DEFAULT_CSV_SOURCE)])
    }

    /// Serve every tag in `sources` from the same directory.
    pub fn with_sources(data_dir: impl Into<PathBuf>, sources: Vec<SourceTag>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sources,
        }
    }

    pub fn path_for(&self, code: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", code))
    }

    fn parse(path: &Path, raw: &str) -> Result<Vec<Bar>, StorageError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(raw.as_bytes());

        let mut bars = Vec::new();
        for row in reader.deserialize::<CsvBarRecord>() {
            let record = row?;
            let line = bars.len() as u64 + 2;
            let invalid = |message: String| StorageError::InvalidRow {
                path: path.to_path_buf(),
                line,
                message,
            };

            let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
                .map_err(|e| invalid(format!("date '{}': {}", record.date, e)))?;
            let close = parse_decimal(&record.close)
                .map_err(|e| invalid(format!("close '{}': {}", record.close, e)))?
                .ok_or_else(|| invalid("close is empty".to_string()))?;

            let optional = |name: &str, value: &Option<String>| match value {
                Some(raw) => parse_decimal(raw)
                    .map_err(|e| invalid(format!("{} '{}': {}", name, raw, e))),
                None => Ok(None),
            };

            let open = optional("open", &record.open)?.unwrap_or(close);
            let high = optional("high", &record.high)?.unwrap_or(close);
            let low = optional("low", &record.low)?.unwrap_or(close);
            let volume = optional("volume", &record.volume)?;

            bars.push(Bar::ohlcv(date, open, high, low, close, volume));
        }
        Ok(bars)
    }
}

fn parse_decimal(raw: &str) -> Result<Option<Decimal>, rust_decimal::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(Some)
}

/// Bars dated within `days` calendar days of the newest bar.
fn trim_to_window(bars: Vec<Bar>, days: u32) -> Vec<Bar> {
    let Some(newest) = bars.iter().map(|bar| bar.date).max() else {
        return bars;
    };
    let cutoff = newest - Duration::days(i64::from(days));
    bars.into_iter().filter(|bar| bar.date > cutoff).collect()
}

#[async_trait]
impl SeriesProvider for CsvSeriesProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            sources: self.sources.clone(),
            max_history_days: None,
        }
    }

    async fn fetch_daily(
        &self,
        spec: &InstrumentSpec,
        days: u32,
    ) -> Result<Vec<Bar>, MarketDataError> {
        let path = self.path_for(&spec.code);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(MarketDataError::SymbolNotFound(spec.code.clone()));
            }
            Err(e) => return Err(StorageError::Io(e).into()),
        };

        let bars = trim_to_window(Self::parse(&path, &raw)?, days);
        debug!("Read {} bars for {} from {}", bars.len(), spec.code, path.display());
        Ok(bars)
    }
}
