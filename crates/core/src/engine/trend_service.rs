//! Orchestrates fetching, the engine run and history persistence.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use log::{error, info, warn};
use tokio::task;
use trendwatch_market_data::{InstrumentSpec, ProviderRouter};

use super::trend_engine::{backfill_sessions, InstrumentInput, TrendEngine};
use crate::config::UniverseConfig;
use crate::errors::{Error, Result};
use crate::ranking::{RankingHistory, RankingHistoryStore};
use crate::snapshot::{BackfillOutput, RunReport};
use crate::utils::time_utils::market_date_today;

pub struct TrendService {
    engine: Arc<TrendEngine>,
    router: Arc<ProviderRouter>,
    store: Arc<dyn RankingHistoryStore>,
    instruments: Arc<[InstrumentSpec]>,
    history_days: u32,
}

impl TrendService {
    pub fn new(
        config: UniverseConfig,
        router: Arc<ProviderRouter>,
        store: Arc<dyn RankingHistoryStore>,
    ) -> Self {
        let engine = Arc::new(TrendEngine::new(config.engine_config()));
        Self {
            engine,
            router,
            store,
            history_days: config.history_days,
            instruments: config.instruments.into(),
        }
    }

    pub fn instruments(&self) -> &[InstrumentSpec] {
        &self.instruments
    }

    /// Fetch every instrument's daily series concurrently.
    ///
    /// Instruments whose fetch fails are left out of the map and will be
    /// reported as having no data.
    pub async fn fetch_inputs(&self) -> HashMap<String, InstrumentInput> {
        self.fetch_inputs_for(self.history_days).await
    }

    async fn fetch_inputs_for(&self, days: u32) -> HashMap<String, InstrumentInput> {
        let fetches = self.instruments.iter().map(|spec| async move {
            let result = self.router.fetch_series(spec, days).await;
            (spec, result)
        });

        let mut inputs = HashMap::with_capacity(self.instruments.len());
        for (spec, result) in join_all(fetches).await {
            match result {
                Ok(series) => {
                    inputs.insert(spec.code.clone(), InstrumentInput::daily(series));
                }
                Err(e) if e.is_data_error() => {
                    warn!("No usable data for {} ({}): {}", spec.code, spec.name, e)
                }
                Err(e) => error!("Failed to fetch {} ({}): {}", spec.code, spec.name, e),
            }
        }
        inputs
    }

    /// Run the whole pipeline for `record_date`.
    ///
    /// The history store is written only after a successful run; an aborted
    /// run leaves it untouched.
    pub async fn run(&self, record_date: NaiveDate) -> Result<RunReport> {
        info!(
            "Starting trend run for {} over {} instruments",
            record_date,
            self.instruments.len()
        );

        let inputs = self.fetch_inputs().await;

        // Ranking is CPU bound and the store does blocking file I/O
        let engine = Arc::clone(&self.engine);
        let store = Arc::clone(&self.store);
        let specs = Arc::clone(&self.instruments);
        let report = task::spawn_blocking(move || -> Result<RunReport> {
            let history = store.load()?;
            let output = engine.run(&specs, &inputs, &history, record_date)?;
            store.save(&output.history)?;
            Ok(output.report)
        })
        .await
        .map_err(|e| Error::Unexpected(format!("Trend run task failed: {}", e)))??;

        info!(
            "Trend run for {} complete: {} instruments, {} without data",
            record_date, report.failures.total, report.failures.no_data
        );
        Ok(report)
    }

    /// Replay every session between `start` and `end` (inclusive).
    ///
    /// Rank deltas chain from one replayed session to the next, starting from
    /// an empty history. The history store is neither read nor written.
    pub async fn backfill(&self, start: NaiveDate, end: NaiveDate) -> Result<BackfillOutput> {
        if start > end {
            return Err(Error::EmptyBackfillRange { start, end });
        }

        // Enough history for the oldest session plus everything after it
        let span = (market_date_today().max(end) - start).num_days().max(0);
        let days = self
            .history_days
            .saturating_add(u32::try_from(span).unwrap_or(u32::MAX));
        let inputs = self.fetch_inputs_for(days).await;

        let sessions = backfill_sessions(&self.instruments, &inputs, start, end);
        info!(
            "Backfilling {} sessions between {} and {}",
            sessions.len(),
            start,
            end
        );

        let engine = Arc::clone(&self.engine);
        let specs = Arc::clone(&self.instruments);
        task::spawn_blocking(move || {
            engine.backfill(&specs, &inputs, RankingHistory::empty(), &sessions)
        })
        .await
        .map_err(|e| Error::Unexpected(format!("Backfill task failed: {}", e)))?
    }
}
