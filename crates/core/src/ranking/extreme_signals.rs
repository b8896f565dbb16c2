//! Flags the strongest and weakest deviation of a ranking.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::deviation_ranker::RankedEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtremeSignal {
    #[default]
    None,
    ExtremeStrong,
    ExtremeWeak,
}

/// At most one flagged instrument per direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtremeFlags {
    pub strong: Option<String>,
    pub weak: Option<String>,
}

impl ExtremeFlags {
    pub fn signal_for(&self, code: &str) -> ExtremeSignal {
        if self.strong.as_deref() == Some(code) {
            ExtremeSignal::ExtremeStrong
        } else if self.weak.as_deref() == Some(code) {
            ExtremeSignal::ExtremeWeak
        } else {
            ExtremeSignal::None
        }
    }

    pub fn count(&self) -> usize {
        self.strong.iter().count() + self.weak.iter().count()
    }
}

/// Classify a ranking produced by
/// [`rank_by_deviation`](super::deviation_ranker::rank_by_deviation).
///
/// The top entry is extreme-strong when its deviation is above `threshold`,
/// the bottom entry extreme-weak when its deviation is below `-threshold`.
/// Ranking order already settles ties: the better-ranked of two equal maxima
/// takes the strong flag, the worse-ranked of two equal minima the weak flag.
pub fn classify(ranked: &[RankedEntry], threshold: Decimal) -> ExtremeFlags {
    let strong = ranked
        .first()
        .filter(|top| top.deviation_pct > threshold)
        .map(|top| top.code.clone());

    let weak = ranked
        .last()
        .filter(|bottom| bottom.deviation_pct < -threshold)
        .map(|bottom| bottom.code.clone());

    ExtremeFlags { strong, weak }
}
