use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{info, warn};
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};
use trendwatch_core::utils::time_utils::market_date_today;
use trendwatch_core::{TrendService, UniverseConfig};
use trendwatch_market_data::{ProviderRouter, SeriesProvider, SourceTag};
use trendwatch_storage_fs::{CsvSeriesProvider, JsonRankingHistoryStore};

use crate::config::Config;
use crate::report::{summary_lines, write_report, BACKFILL_MODE};
use crate::schedule::{decide, ScheduleDecision};

pub fn init_tracing() {
    let log_format = std::env::var("TW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(tracing_fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    DryRun(ScheduleDecision),
    Skipped(ScheduleDecision),
    Completed { ranked: usize, no_data: usize },
    Backfilled { sessions: usize, skipped: usize },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::DryRun(decision) => write!(f, "dry run, would {}", decision),
            RunOutcome::Skipped(decision) => write!(f, "{}", decision),
            RunOutcome::Completed { ranked, no_data } => {
                write!(f, "{} ranked, {} without data", ranked, no_data)
            }
            RunOutcome::Backfilled { sessions, skipped } => {
                write!(f, "{} sessions backfilled, {} skipped", sessions, skipped)
            }
        }
    }
}

/// Every source tag of the universe is served from the CSV data directory.
pub fn build_router(config: &Config, universe: &UniverseConfig) -> ProviderRouter {
    let sources: BTreeSet<SourceTag> = universe
        .instruments
        .iter()
        .map(|spec| spec.source.clone())
        .collect();
    let provider: Arc<dyn SeriesProvider> = Arc::new(CsvSeriesProvider::with_sources(
        &config.data_dir,
        sources.into_iter().collect(),
    ));
    ProviderRouter::new(vec![provider])
}

fn build_service(config: &Config) -> anyhow::Result<TrendService> {
    let universe = UniverseConfig::load(&config.config_path).with_context(|| {
        format!(
            "loading universe from {}",
            config.config_path.display()
        )
    })?;
    let router = Arc::new(build_router(config, &universe));
    let store = Arc::new(JsonRankingHistoryStore::new(&config.history_path));
    Ok(TrendService::new(universe, router, store))
}

/// Decide, run and report once, or replay a range when a backfill is set.
pub async fn execute(config: &Config) -> anyhow::Result<RunOutcome> {
    let check_date = config.mock_date.unwrap_or_else(market_date_today);
    if let Some(start) = config.backfill_start {
        let end = config.backfill_end.unwrap_or(check_date);
        return backfill(config, start, end).await;
    }

    let decision = decide(config.mode, check_date, config.force);
    info!(
        "{} run checked {}: {}",
        config.mode, check_date, decision
    );

    if config.dry_run {
        println!("{}", decision);
        return Ok(RunOutcome::DryRun(decision));
    }

    let record_date = match decision {
        ScheduleDecision::Run { record_date, .. } => record_date,
        skip @ ScheduleDecision::Skip { .. } => return Ok(RunOutcome::Skipped(skip)),
    };

    let service = build_service(config)?;
    let report = service
        .run(record_date)
        .await
        .with_context(|| format!("trend run for {}", record_date))?;

    for line in summary_lines(&report) {
        info!("{}", line);
    }

    if let Some(path) = &config.output_path {
        write_report(path, config.mode.as_str(), &report)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(RunOutcome::Completed {
        ranked: report.snapshots().filter(|s| s.is_ranked()).count(),
        no_data: report.failures.no_data,
    })
}

/// Replay `start..=end` and archive one report per session.
///
/// The rank history file is left alone.
async fn backfill(
    config: &Config,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<RunOutcome> {
    info!("Backfilling sessions from {} to {}", start, end);
    let service = build_service(config)?;
    let output = service
        .backfill(start, end)
        .await
        .with_context(|| format!("backfill from {} to {}", start, end))?;

    for report in &output.reports {
        let path = config
            .archive_dir
            .join(format!("{}.json", report.record_date));
        write_report(&path, BACKFILL_MODE, report)
            .with_context(|| format!("writing archive {}", path.display()))?;
    }
    for session in &output.skipped {
        warn!("No archive for {}: the run aborted", session);
    }
    info!(
        "Archived {} sessions to {}",
        output.reports.len(),
        config.archive_dir.display()
    );

    Ok(RunOutcome::Backfilled {
        sessions: output.reports.len(),
        skipped: output.skipped.len(),
    })
}
