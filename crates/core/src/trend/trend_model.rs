use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trendwatch_market_data::Timeframe;

/// Position of the latest close relative to its MA20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendState {
    /// close >= MA20
    Above,
    /// close < MA20
    Below,
    /// Fewer than 20 bars; no average, no state.
    InsufficientData,
}

impl TrendState {
    pub fn from_close(close: Decimal, ma20: Decimal) -> Self {
        if close >= ma20 {
            TrendState::Above
        } else {
            TrendState::Below
        }
    }

    /// The boolean state, `None` when undefined.
    pub fn is_above(&self) -> Option<bool> {
        match self {
            TrendState::Above => Some(true),
            TrendState::Below => Some(false),
            TrendState::InsufficientData => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, TrendState::InsufficientData)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendState::Above => "above",
            TrendState::Below => "below",
            TrendState::InsufficientData => "n/a",
        }
    }
}

impl fmt::Display for TrendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// MA20 evaluation of one series at one timeframe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeState {
    pub timeframe: Timeframe,
    /// Close of the latest bar, `None` for an empty series
    pub latest_close: Option<Decimal>,
    /// `None` when fewer than 20 bars exist
    pub ma20: Option<Decimal>,
    pub state: TrendState,
    /// Bars the evaluation saw
    pub bars: usize,
}

impl TimeframeState {
    pub fn insufficient(timeframe: Timeframe, latest_close: Option<Decimal>, bars: usize) -> Self {
        Self {
            timeframe,
            latest_close,
            ma20: None,
            state: TrendState::InsufficientData,
            bars,
        }
    }
}

/// Weekly and monthly states combined into one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundState {
    pub weekly: TrendState,
    pub monthly: TrendState,
}

impl CompoundState {
    /// Both timeframes are above their averages.
    pub fn is_aligned_above(&self) -> bool {
        self.weekly == TrendState::Above && self.monthly == TrendState::Above
    }

    /// Both timeframes are below their averages.
    pub fn is_aligned_below(&self) -> bool {
        self.weekly == TrendState::Below && self.monthly == TrendState::Below
    }
}

impl fmt::Display for CompoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.weekly.label(), self.monthly.label())
    }
}

/// Outcome of the backward search for the start of the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transition {
    /// The current state has held continuously since `date`.
    Found {
        date: NaiveDate,
        /// MA20 as of `date`
        ma20: Decimal,
    },
    /// The state predates the search horizon or the available history.
    NotFound,
}

impl Transition {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Transition::Found { date, .. } => Some(*date),
            Transition::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_equality_counts_as_above() {
        assert_eq!(TrendState::from_close(dec!(10), dec!(10)), TrendState::Above);
        assert_eq!(TrendState::from_close(dec!(9.99), dec!(10)), TrendState::Below);
    }

    #[test]
    fn test_is_above() {
        assert_eq!(TrendState::Above.is_above(), Some(true));
        assert_eq!(TrendState::Below.is_above(), Some(false));
        assert_eq!(TrendState::InsufficientData.is_above(), None);
    }

    #[test]
    fn test_transition_serializes_tagged() {
        let found = Transition::Found {
            date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
            ma20: dec!(12.5),
        };
        let json = serde_json::to_value(found).unwrap();
        assert_eq!(json["kind"], "FOUND");
        assert_eq!(json["date"], "2024-02-05");

        let json = serde_json::to_value(Transition::NotFound).unwrap();
        assert_eq!(json["kind"], "NOT_FOUND");
    }
}
