use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trendwatch_market_data::{Board, InstrumentSpec};

use crate::ranking::{ExtremeSignal, RankingHistory};
use crate::trend::{CompoundState, TimeframeState, Transition, TrendState};

/// Whether an instrument could be evaluated this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotStatus {
    Ok,
    /// Daily series too short for an MA20
    InsufficientData { bars: usize },
    /// Nothing was supplied for the instrument
    NoData,
}

/// Per-instrument result of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSnapshot {
    pub spec: InstrumentSpec,
    pub board: Board,
    pub status: SnapshotStatus,
    /// Date of the latest daily bar
    pub as_of: Option<NaiveDate>,
    pub close: Option<Decimal>,
    pub previous_close: Option<Decimal>,
    pub day_change_pct: Option<Decimal>,
    pub daily: TimeframeState,
    pub weekly: TimeframeState,
    pub monthly: TimeframeState,
    pub deviation_pct: Option<Decimal>,
    /// `None` when unranked
    pub rank: Option<u32>,
    pub prior_rank: Option<u32>,
    pub rank_delta: Option<i32>,
    /// `None` when the daily state is undefined
    pub transition: Option<Transition>,
    /// Change from the MA20 on the transition date, in percent
    pub interval_change_pct: Option<Decimal>,
    pub compound: CompoundState,
    pub extreme: ExtremeSignal,
}

impl InstrumentSnapshot {
    pub fn code(&self) -> &str {
        &self.spec.code
    }

    pub fn daily_state(&self) -> TrendState {
        self.daily.state
    }

    pub fn daily_ma20(&self) -> Option<Decimal> {
        self.daily.ma20
    }

    pub fn transition_date(&self) -> Option<NaiveDate> {
        self.transition.and_then(|t| t.date())
    }

    /// MA20 on the transition date, the base of `interval_change_pct`.
    pub fn transition_ma20(&self) -> Option<Decimal> {
        match self.transition {
            Some(Transition::Found { ma20, .. }) => Some(ma20),
            _ => None,
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.rank.is_some()
    }
}

/// Above/below split of one board's evaluated instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadth {
    pub above: usize,
    pub below: usize,
    /// Share of `above`, in whole percent; 50 when nothing was evaluated
    pub above_pct: u32,
    pub below_pct: u32,
}

impl Breadth {
    pub fn from_states<'a, I>(states: I) -> Self
    where
        I: IntoIterator<Item = &'a TrendState>,
    {
        let (mut above, mut below) = (0usize, 0usize);
        for state in states {
            match state {
                TrendState::Above => above += 1,
                TrendState::Below => below += 1,
                TrendState::InsufficientData => {}
            }
        }

        let total = above + below;
        if total == 0 {
            return Self {
                above,
                below,
                above_pct: 50,
                below_pct: 50,
            };
        }

        let above_pct = ((above as f64 / total as f64) * 100.0).round() as u32;
        Self {
            above,
            below,
            above_pct,
            below_pct: 100 - above_pct,
        }
    }

    pub fn total(&self) -> usize {
        self.above + self.below
    }
}

/// Ordered results of one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardReport {
    pub board: Board,
    /// Ranked instruments in rank order, then unranked ones in configuration order
    pub snapshots: Vec<InstrumentSnapshot>,
    pub breadth: Breadth,
}

impl BoardReport {
    pub fn ranked(&self) -> impl Iterator<Item = &InstrumentSnapshot> {
        self.snapshots.iter().filter(|s| s.is_ranked())
    }

    pub fn unranked(&self) -> impl Iterator<Item = &InstrumentSnapshot> {
        self.snapshots.iter().filter(|s| !s.is_ranked())
    }
}

/// Counts of instruments that could not be ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureSummary {
    pub total: usize,
    pub no_data: usize,
    pub insufficient_data: usize,
}

/// Everything one run hands to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub record_date: NaiveDate,
    pub boards: Vec<BoardReport>,
    pub failures: FailureSummary,
}

impl RunReport {
    pub fn board(&self, board: Board) -> Option<&BoardReport> {
        self.boards.iter().find(|b| b.board == board)
    }

    /// All snapshots, board by board.
    pub fn snapshots(&self) -> impl Iterator<Item = &InstrumentSnapshot> {
        self.boards.iter().flat_map(|b| b.snapshots.iter())
    }

    pub fn snapshot(&self, code: &str) -> Option<&InstrumentSnapshot> {
        self.snapshots().find(|s| s.code() == code)
    }
}

/// Report plus the history the caller must persist.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: RunReport,
    pub history: RankingHistory,
}

/// Result of replaying a range of past sessions.
#[derive(Debug, Clone, Default)]
pub struct BackfillOutput {
    /// One report per completed session, oldest first
    pub reports: Vec<RunReport>,
    /// Sessions that tripped the failure guard
    pub skipped: Vec<NaiveDate>,
    /// History after the last completed session
    pub history: RankingHistory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadth_rounds_to_whole_percent() {
        let states = [
            TrendState::Above,
            TrendState::Above,
            TrendState::Below,
            TrendState::InsufficientData,
        ];
        let breadth = Breadth::from_states(states.iter());
        assert_eq!(breadth.above, 2);
        assert_eq!(breadth.below, 1);
        assert_eq!(breadth.total(), 3);
        assert_eq!(breadth.above_pct, 67);
        assert_eq!(breadth.below_pct, 33);
    }

    #[test]
    fn test_empty_breadth_is_even() {
        let breadth = Breadth::from_states([].iter());
        assert_eq!(breadth.above_pct, 50);
        assert_eq!(breadth.below_pct, 50);
    }
}
