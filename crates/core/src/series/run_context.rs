//! Request-scoped memo of derived series.

use std::sync::Arc;

use dashmap::DashMap;
use log::debug;
use trendwatch_market_data::{Series, Timeframe};

use super::resampler::resample;

/// Per-run cache of resampled series keyed by (instrument code, timeframe).
///
/// Created fresh by the engine at the start of every run and dropped with it.
/// It is shared by the parallel per-instrument phase, hence the concurrent map.
#[derive(Default)]
pub struct RunContext {
    resampled: DashMap<(String, Timeframe), Arc<Series>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Series of `code` at `timeframe`, resampling `daily` on first use.
    pub fn series(&self, code: &str, daily: &Series, timeframe: Timeframe) -> Arc<Series> {
        let key = (code.to_string(), timeframe);
        if let Some(hit) = self.resampled.get(&key) {
            return Arc::clone(hit.value());
        }

        let derived = Arc::new(resample(daily, timeframe));
        debug!(
            "Resampled {} to {} bars ({})",
            code,
            derived.len(),
            timeframe
        );
        self.resampled.insert(key, Arc::clone(&derived));
        derived
    }

    /// Number of cached series.
    pub fn cached(&self) -> usize {
        self.resampled.len()
    }
}
