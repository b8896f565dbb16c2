//! Two-generation ranking history carried across runs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use trendwatch_market_data::Board;

use super::deviation_ranker::RankedEntry;
use crate::errors::HistoryError;

/// Ranks of one successful run, per board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingGeneration {
    pub date: NaiveDate,
    #[serde(default)]
    pub ranks: BTreeMap<Board, BTreeMap<String, u32>>,
}

impl RankingGeneration {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ranks: BTreeMap::new(),
        }
    }

    /// Replace the ranks recorded for `board`.
    pub fn set_board(&mut self, board: Board, ranked: &[RankedEntry]) {
        let ranks = ranked
            .iter()
            .map(|entry| (entry.code.clone(), entry.rank))
            .collect();
        self.ranks.insert(board, ranks);
    }

    pub fn rank_of(&self, board: Board, code: &str) -> Option<u32> {
        self.ranks.get(&board)?.get(code).copied()
    }
}

/// The persisted ranking history: the latest generation and the one before it.
///
/// Nothing older is ever kept. Fields are private so the only way to add a
/// generation is [`record`](Self::record), which shifts and drops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RankingHistoryRecord")]
pub struct RankingHistory {
    latest: Option<RankingGeneration>,
    previous: Option<RankingGeneration>,
}

/// Wire shape of [`RankingHistory`], validated on the way in.
#[derive(Deserialize)]
struct RankingHistoryRecord {
    #[serde(default)]
    latest: Option<RankingGeneration>,
    #[serde(default)]
    previous: Option<RankingGeneration>,
}

impl TryFrom<RankingHistoryRecord> for RankingHistory {
    type Error = HistoryError;

    fn try_from(record: RankingHistoryRecord) -> Result<Self, Self::Error> {
        match (record.latest, record.previous) {
            (Some(latest), Some(previous)) if previous.date >= latest.date => {
                Err(HistoryError::Unordered {
                    previous: previous.date,
                    latest: latest.date,
                })
            }
            (None, previous) => Ok(Self {
                latest: previous,
                previous: None,
            }),
            (latest, previous) => Ok(Self { latest, previous }),
        }
    }
}

impl RankingHistory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&RankingGeneration> {
        self.latest.as_ref()
    }

    pub fn previous(&self) -> Option<&RankingGeneration> {
        self.previous.as_ref()
    }

    /// Generations, newest first.
    pub fn generations(&self) -> impl Iterator<Item = &RankingGeneration> {
        self.latest.iter().chain(self.previous.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }

    /// Most recent generation dated strictly before `date`.
    ///
    /// A re-run on the same date therefore compares against the run before it,
    /// not against its own earlier output.
    pub fn baseline_for(&self, date: NaiveDate) -> Option<&RankingGeneration> {
        self.generations().find(|generation| generation.date < date)
    }

    pub fn prior_rank(&self, date: NaiveDate, board: Board, code: &str) -> Option<u32> {
        self.baseline_for(date)?.rank_of(board, code)
    }

    /// Shift `generation` in as the latest and drop anything older than the
    /// generation it displaces.
    ///
    /// A generation for the latest date replaces it in place. A generation
    /// older than the latest one is refused.
    pub fn record(self, generation: RankingGeneration) -> Result<Self, HistoryError> {
        match self.latest {
            None => Ok(Self {
                latest: Some(generation),
                previous: None,
            }),
            Some(latest) if latest.date == generation.date => {
                debug!("Replacing ranking generation for {}", generation.date);
                Ok(Self {
                    latest: Some(generation),
                    previous: self.previous,
                })
            }
            Some(latest) if latest.date > generation.date => Err(HistoryError::OutOfOrder {
                latest: latest.date,
                date: generation.date,
            }),
            Some(latest) => {
                if let Some(dropped) = &self.previous {
                    debug!("Dropping ranking generation for {}", dropped.date);
                }
                Ok(Self {
                    latest: Some(generation),
                    previous: Some(latest),
                })
            }
        }
    }
}
