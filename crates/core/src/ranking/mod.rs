mod deviation_ranker;
mod extreme_signals;
mod rank_change_tracker;
mod rank_history;
mod ranking_traits;

pub use deviation_ranker::{deviation_pct, rank_by_deviation, RankedEntry};
pub use extreme_signals::{classify, ExtremeFlags, ExtremeSignal};
pub use rank_change_tracker::{RankChange, RankChangeTracker};
pub use rank_history::{RankingGeneration, RankingHistory};
pub use ranking_traits::RankingHistoryStore;
