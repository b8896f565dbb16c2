//! MA20 and above/below state for any bar series.

use rust_decimal::Decimal;
use trendwatch_market_data::{Bar, Series, Timeframe};

use super::trend_model::{TimeframeState, TrendState};
use crate::constants::MA_PERIOD;

/// Mean close of the last `MA_PERIOD` bars of `bars` (the last bar included).
///
/// `None` when fewer than `MA_PERIOD` bars are given or the sum overflows.
pub fn trailing_ma20(bars: &[Bar]) -> Option<Decimal> {
    if bars.len() < MA_PERIOD {
        return None;
    }
    let window = &bars[bars.len() - MA_PERIOD..];
    let sum = window
        .iter()
        .try_fold(Decimal::ZERO, |acc, bar| acc.checked_add(bar.close))?;
    sum.checked_div(Decimal::from(MA_PERIOD as u64))
}

/// State of the last bar of `bars` against its own trailing MA20.
pub fn state_of(bars: &[Bar]) -> TrendState {
    match (bars.last(), trailing_ma20(bars)) {
        (Some(last), Some(ma20)) => TrendState::from_close(last.close, ma20),
        _ => TrendState::InsufficientData,
    }
}

/// Evaluate the latest bar of `series` at `timeframe`.
pub fn evaluate(series: &Series, timeframe: Timeframe) -> TimeframeState {
    let bars = series.bars();
    let latest_close = series.last().map(|bar| bar.close);

    match (latest_close, trailing_ma20(bars)) {
        (Some(close), Some(ma20)) => TimeframeState {
            timeframe,
            latest_close: Some(close),
            ma20: Some(ma20),
            state: TrendState::from_close(close, ma20),
            bars: bars.len(),
        },
        _ => TimeframeState::insufficient(timeframe, latest_close, bars.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    fn series(closes: &[i64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Series::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, c)| Bar::from_close(start + Duration::days(i as i64), Decimal::from(*c)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_ma20_over_last_twenty_of_twenty_five() {
        let closes: Vec<i64> = (1..=25).collect();
        let state = evaluate(&series(&closes), Timeframe::Daily);

        // Mean of 6..=25
        assert_eq!(state.ma20, Some(dec!(15.5)));
        assert_eq!(state.latest_close, Some(dec!(25)));
        assert_eq!(state.state, TrendState::Above);
        assert_eq!(state.bars, 25);
    }

    #[test]
    fn test_nineteen_bars_is_insufficient() {
        let closes: Vec<i64> = (1..=19).collect();
        let state = evaluate(&series(&closes), Timeframe::Weekly);

        assert_eq!(state.ma20, None);
        assert_eq!(state.state, TrendState::InsufficientData);
        assert_eq!(state.latest_close, Some(dec!(19)));
        assert_eq!(state.timeframe, Timeframe::Weekly);
    }

    #[test]
    fn test_exactly_twenty_bars_is_defined() {
        let closes: Vec<i64> = (1..=20).collect();
        assert_eq!(trailing_ma20(series(&closes).bars()), Some(dec!(10.5)));
    }

    #[test]
    fn test_close_equal_to_average_is_above() {
        let state = evaluate(&series(&[7; 20]), Timeframe::Daily);
        assert_eq!(state.ma20, Some(dec!(7)));
        assert_eq!(state.state, TrendState::Above);
    }

    #[test]
    fn test_falling_series_is_below() {
        let closes: Vec<i64> = (1..=30).rev().collect();
        assert_eq!(state_of(series(&closes).bars()), TrendState::Below);
    }

    #[test]
    fn test_empty_series() {
        let state = evaluate(&Series::empty(), Timeframe::Monthly);
        assert_eq!(state.latest_close, None);
        assert_eq!(state.state, TrendState::InsufficientData);
    }
}
