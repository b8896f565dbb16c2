use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One OHLCV bar of a series.
///
/// Daily bars come from a provider; weekly and monthly bars are derived from
/// them and are dated by their last constituent daily bar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date of the bar
    pub date: NaiveDate,

    /// Opening price
    pub open: Decimal,

    /// High price
    pub high: Decimal,

    /// Low price
    pub low: Decimal,

    /// Closing price
    pub close: Decimal,

    /// Trading volume (absent for sources that do not report it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

impl Bar {
    /// Create a bar from a close only. Open, high and low collapse onto it.
    pub fn from_close(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }

    /// Create a full OHLCV bar
    pub fn ohlcv(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Option<Decimal>,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bar_from_close() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bar = Bar::from_close(date, dec!(3021.5));
        assert_eq!(bar.open, dec!(3021.5));
        assert_eq!(bar.high, dec!(3021.5));
        assert_eq!(bar.low, dec!(3021.5));
        assert!(bar.volume.is_none());
    }

    #[test]
    fn test_bar_serde_omits_missing_volume() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bar = Bar::ohlcv(date, dec!(10), dec!(12), dec!(9), dec!(11), None);
        let json = serde_json::to_string(&bar).unwrap();
        assert!(!json.contains("volume"));

        let back: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bar);
    }
}
