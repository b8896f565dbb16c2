//! Day-over-day rank movement against the persisted history.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use trendwatch_market_data::Board;

use super::deviation_ranker::RankedEntry;
use super::rank_history::{RankingGeneration, RankingHistory};
use crate::errors::HistoryError;

/// Movement of one instrument since the baseline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankChange {
    pub prior_rank: Option<u32>,
    /// prior − today; positive means the instrument moved up. `None` for a new entrant.
    pub delta: Option<i32>,
}

/// Compares today's rankings with the history and builds the next generation.
///
/// The history is read through `diff` for every board and written exactly
/// once, by [`finish`](Self::finish).
pub struct RankChangeTracker<'a> {
    history: &'a RankingHistory,
    generation: RankingGeneration,
}

impl<'a> RankChangeTracker<'a> {
    pub fn new(history: &'a RankingHistory, record_date: NaiveDate) -> Self {
        Self {
            history,
            generation: RankingGeneration::new(record_date),
        }
    }

    /// Rank changes for one board's ranking, keyed by code.
    pub fn diff(&mut self, board: Board, ranked: &[RankedEntry]) -> HashMap<String, RankChange> {
        let date = self.generation.date;
        let changes = ranked
            .iter()
            .map(|entry| {
                let prior_rank = self.history.prior_rank(date, board, &entry.code);
                let delta = prior_rank.map(|prior| prior as i32 - entry.rank as i32);
                (entry.code.clone(), RankChange { prior_rank, delta })
            })
            .collect();

        self.generation.set_board(board, ranked);
        changes
    }

    /// The history with today's generation shifted in.
    pub fn finish(self) -> Result<RankingHistory, HistoryError> {
        self.history.clone().record(self.generation)
    }
}
