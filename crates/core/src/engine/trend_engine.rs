//! One complete evaluation pass over the configured universe.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::{debug, info, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;
use trendwatch_market_data::{Board, InstrumentSpec, Series, Timeframe};

use crate::config::EngineConfig;
use crate::errors::{Error, Result};
use crate::ranking::{
    classify, deviation_pct, rank_by_deviation, RankChangeTracker, RankingHistory,
};
use crate::series::RunContext;
use crate::snapshot::{
    BackfillOutput, Breadth, BoardReport, FailureSummary, InstrumentSnapshot, RunOutput,
    RunReport, SnapshotStatus,
};
use crate::trend::{compose_states, evaluate, find_transition, TimeframeState, Transition};
use crate::utils::decimal_utils::percent_change;

/// Series supplied for one instrument.
///
/// Weekly and monthly series are optional; when absent they are resampled
/// from the daily series.
#[derive(Debug, Clone)]
pub struct InstrumentInput {
    pub daily: Series,
    pub weekly: Option<Series>,
    pub monthly: Option<Series>,
}

impl InstrumentInput {
    pub fn daily(daily: Series) -> Self {
        Self {
            daily,
            weekly: None,
            monthly: None,
        }
    }

    pub fn with_weekly(mut self, weekly: Series) -> Self {
        self.weekly = Some(weekly);
        self
    }

    pub fn with_monthly(mut self, monthly: Series) -> Self {
        self.monthly = Some(monthly);
        self
    }

    /// The input as it stood at the close of `date`.
    pub fn up_to(&self, date: NaiveDate) -> Self {
        Self {
            daily: self.daily.up_to(date),
            weekly: self.weekly.as_ref().map(|s| s.up_to(date)),
            monthly: self.monthly.as_ref().map(|s| s.up_to(date)),
        }
    }
}

/// Sessions between `start` and `end` (inclusive) to replay.
///
/// The calendar is taken from the first instrument in `specs` that has daily
/// bars in the range.
pub fn backfill_sessions(
    specs: &[InstrumentSpec],
    inputs: &HashMap<String, InstrumentInput>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    specs
        .iter()
        .filter_map(|spec| inputs.get(&spec.code))
        .map(|input| {
            input
                .daily
                .bars()
                .iter()
                .map(|bar| bar.date)
                .filter(|date| (start..=end).contains(date))
                .collect::<Vec<_>>()
        })
        .find(|dates| !dates.is_empty())
        .unwrap_or_default()
}

/// Board-independent evaluation of one instrument.
#[derive(Debug, Clone)]
pub struct InstrumentEvaluation {
    pub spec: InstrumentSpec,
    pub status: SnapshotStatus,
    pub as_of: Option<NaiveDate>,
    pub close: Option<Decimal>,
    pub previous_close: Option<Decimal>,
    pub day_change_pct: Option<Decimal>,
    pub daily: TimeframeState,
    pub weekly: TimeframeState,
    pub monthly: TimeframeState,
    pub deviation_pct: Option<Decimal>,
    pub transition: Option<Transition>,
    pub interval_change_pct: Option<Decimal>,
}

impl InstrumentEvaluation {
    fn no_data(spec: &InstrumentSpec) -> Self {
        Self {
            spec: spec.clone(),
            status: SnapshotStatus::NoData,
            as_of: None,
            close: None,
            previous_close: None,
            day_change_pct: None,
            daily: TimeframeState::insufficient(Timeframe::Daily, None, 0),
            weekly: TimeframeState::insufficient(Timeframe::Weekly, None, 0),
            monthly: TimeframeState::insufficient(Timeframe::Monthly, None, 0),
            deviation_pct: None,
            transition: None,
            interval_change_pct: None,
        }
    }

    fn into_snapshot(
        self,
        board: Board,
        rank: Option<u32>,
        prior_rank: Option<u32>,
        rank_delta: Option<i32>,
    ) -> InstrumentSnapshot {
        let compound = compose_states(&self.weekly, &self.monthly);
        InstrumentSnapshot {
            spec: self.spec,
            board,
            status: self.status,
            as_of: self.as_of,
            close: self.close,
            previous_close: self.previous_close,
            day_change_pct: self.day_change_pct,
            daily: self.daily,
            weekly: self.weekly,
            monthly: self.monthly,
            deviation_pct: self.deviation_pct,
            rank,
            prior_rank,
            rank_delta,
            transition: self.transition,
            interval_change_pct: self.interval_change_pct,
            compound,
            extreme: Default::default(),
        }
    }
}

/// Stateless calculation engine.
///
/// Everything it needs arrives through [`run`](Self::run) and everything it
/// produces leaves through the returned [`RunOutput`]; the history passed in
/// is never modified.
pub struct TrendEngine {
    config: EngineConfig,
}

impl TrendEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one instrument on all timeframes.
    pub fn evaluate_instrument(
        &self,
        ctx: &RunContext,
        spec: &InstrumentSpec,
        input: Option<&InstrumentInput>,
    ) -> InstrumentEvaluation {
        let Some(input) = input.filter(|i| !i.daily.is_empty()) else {
            warn!("No data for {} ({})", spec.code, spec.name);
            return InstrumentEvaluation::no_data(spec);
        };

        let daily_series = &input.daily;
        let daily = evaluate(daily_series, Timeframe::Daily);
        let weekly = match &input.weekly {
            Some(series) => evaluate(series, Timeframe::Weekly),
            None => evaluate(
                &ctx.series(&spec.code, daily_series, Timeframe::Weekly),
                Timeframe::Weekly,
            ),
        };
        let monthly = match &input.monthly {
            Some(series) => evaluate(series, Timeframe::Monthly),
            None => evaluate(
                &ctx.series(&spec.code, daily_series, Timeframe::Monthly),
                Timeframe::Monthly,
            ),
        };

        let bars = daily_series.bars();
        let close = daily.latest_close;
        let previous_close = bars.len().checked_sub(2).map(|i| bars[i].close);
        let day_change_pct = close
            .zip(previous_close)
            .and_then(|(close, previous)| percent_change(close, previous));

        let (status, deviation, transition, interval_change_pct) =
            match (close, daily.ma20, daily.state.is_above()) {
                (Some(close), Some(ma20), Some(is_above)) => {
                    let transition =
                        find_transition(daily_series, is_above, self.config.lookback_days);
                    let interval_change = match transition {
                        Transition::Found { ma20: start_ma20, .. } => {
                            percent_change(close, start_ma20)
                        }
                        Transition::NotFound => None,
                    };
                    let deviation = deviation_pct(close, ma20);
                    if deviation.is_none() {
                        warn!(
                            "Deviation of {} from its MA20 overflows (close {}, MA20 {}), leaving it unranked",
                            spec.code, close, ma20
                        );
                    }
                    (SnapshotStatus::Ok, deviation, Some(transition), interval_change)
                }
                _ => {
                    debug!(
                        "{} has {} daily bars, too few for an MA20",
                        spec.code,
                        bars.len()
                    );
                    (
                        SnapshotStatus::InsufficientData { bars: bars.len() },
                        None,
                        None,
                        None,
                    )
                }
            };

        InstrumentEvaluation {
            spec: spec.clone(),
            status,
            as_of: daily_series.last().map(|bar| bar.date),
            close,
            previous_close,
            day_change_pct,
            daily,
            weekly,
            monthly,
            deviation_pct: deviation,
            transition,
            interval_change_pct,
        }
    }

    /// Evaluate, rank and diff the whole universe for `record_date`.
    ///
    /// Instruments are evaluated in parallel; results keep the order of
    /// `specs`. Aborts with [`Error::TooManyFailures`] or
    /// [`Error::NoUsableData`] before any history is produced.
    pub fn run(
        &self,
        specs: &[InstrumentSpec],
        inputs: &HashMap<String, InstrumentInput>,
        history: &RankingHistory,
        record_date: NaiveDate,
    ) -> Result<RunOutput> {
        let ctx = RunContext::new();
        let evaluations: Vec<InstrumentEvaluation> = specs
            .par_iter()
            .map(|spec| self.evaluate_instrument(&ctx, spec, inputs.get(&spec.code)))
            .collect();

        let failures = self.check_failures(&evaluations)?;

        let mut tracker = RankChangeTracker::new(history, record_date);
        let mut boards = Vec::new();

        let mut remaining = evaluations;
        for board in Board::ALL {
            let (members, rest): (Vec<_>, Vec<_>) =
                remaining.into_iter().partition(|e| e.spec.board() == board);
            remaining = rest;
            if members.is_empty() {
                continue;
            }

            let ranked = rank_by_deviation(
                members
                    .iter()
                    .map(|e| (e.spec.code.as_str(), e.deviation_pct)),
            );
            let changes = tracker.diff(board, &ranked);
            let flags = classify(&ranked, self.config.extreme_threshold_pct);
            let breadth = Breadth::from_states(members.iter().map(|e| &e.daily.state));

            let rank_of: HashMap<&str, u32> = ranked
                .iter()
                .map(|entry| (entry.code.as_str(), entry.rank))
                .collect();

            let mut snapshots: Vec<InstrumentSnapshot> = Vec::with_capacity(members.len());
            let mut unranked = Vec::new();
            for evaluation in members {
                match rank_of.get(evaluation.spec.code.as_str()).copied() {
                    Some(rank) => {
                        let change = changes
                            .get(&evaluation.spec.code)
                            .copied()
                            .unwrap_or_default();
                        let mut snapshot = evaluation.into_snapshot(
                            board,
                            Some(rank),
                            change.prior_rank,
                            change.delta,
                        );
                        snapshot.extreme = flags.signal_for(snapshot.code());
                        snapshots.push(snapshot);
                    }
                    None => unranked.push(evaluation.into_snapshot(board, None, None, None)),
                }
            }
            snapshots.sort_by_key(|s| s.rank);
            snapshots.extend(unranked);

            info!(
                "{} board: {} ranked, {} above / {} below MA20, {} extreme(s)",
                board,
                ranked.len(),
                breadth.above,
                breadth.below,
                flags.count()
            );

            boards.push(BoardReport {
                board,
                snapshots,
                breadth,
            });
        }

        let history = tracker.finish()?;
        debug!("Resampled {} series this run", ctx.cached());

        Ok(RunOutput {
            report: RunReport {
                record_date,
                boards,
                failures,
            },
            history,
        })
    }

    /// Run the universe as of the close of `as_of`.
    ///
    /// Every series is cut at `as_of` first, so bars dated later never reach
    /// the evaluation.
    pub fn run_as_of(
        &self,
        specs: &[InstrumentSpec],
        inputs: &HashMap<String, InstrumentInput>,
        history: &RankingHistory,
        as_of: NaiveDate,
    ) -> Result<RunOutput> {
        let cut: HashMap<String, InstrumentInput> = inputs
            .iter()
            .map(|(code, input)| (code.clone(), input.up_to(as_of)))
            .collect();
        self.run(specs, &cut, history, as_of)
    }

    /// Replay `sessions` oldest first, feeding each session's ranks into the
    /// next session's deltas.
    ///
    /// A session that trips the failure guard is logged and skipped; the next
    /// one diffs against the last completed session.
    pub fn backfill(
        &self,
        specs: &[InstrumentSpec],
        inputs: &HashMap<String, InstrumentInput>,
        history: RankingHistory,
        sessions: &[NaiveDate],
    ) -> Result<BackfillOutput> {
        let mut output = BackfillOutput {
            history,
            ..BackfillOutput::default()
        };

        for (i, &session) in sessions.iter().enumerate() {
            info!("[{}/{}] Backfilling {}", i + 1, sessions.len(), session);
            match self.run_as_of(specs, inputs, &output.history, session) {
                Ok(run) => {
                    output.history = run.history;
                    output.reports.push(run.report);
                }
                Err(e @ (Error::TooManyFailures { .. } | Error::NoUsableData)) => {
                    warn!("Skipping {}: {}", session, e);
                    output.skipped.push(session);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(output)
    }

    fn check_failures(&self, evaluations: &[InstrumentEvaluation]) -> Result<FailureSummary> {
        let total = evaluations.len();
        let no_data = evaluations
            .iter()
            .filter(|e| e.status == SnapshotStatus::NoData)
            .count();
        let insufficient_data = evaluations
            .iter()
            .filter(|e| matches!(e.status, SnapshotStatus::InsufficientData { .. }))
            .count();

        if total == 0 || no_data == total {
            return Err(Error::NoUsableData);
        }

        let ratio = no_data as f64 / total as f64;
        if ratio > self.config.max_failure_ratio {
            warn!(
                "{} of {} instruments returned no data (limit {:.0}%)",
                no_data,
                total,
                self.config.max_failure_ratio * 100.0
            );
            return Err(Error::TooManyFailures {
                failed: no_data,
                total,
            });
        }

        Ok(FailureSummary {
            total,
            no_data,
            insufficient_data,
        })
    }
}
