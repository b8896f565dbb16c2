//! Persistence seam for the ranking history.

use super::rank_history::RankingHistory;
use crate::errors::Result;

/// Durable storage of the [`RankingHistory`].
///
/// Read once before ranking and written once after a successful run. Writes
/// must replace the stored value atomically. Runs against the same store must
/// be serialized by the caller.
pub trait RankingHistoryStore: Send + Sync {
    /// Load the stored history; an absent store yields an empty history.
    fn load(&self) -> Result<RankingHistory>;

    /// Replace the stored history.
    fn save(&self, history: &RankingHistory) -> Result<()>;
}
