//! Derives weekly and monthly bars from a daily series.
//!
//! Weeks are Friday-anchored: a period runs Saturday through Friday, so weekend
//! bars (crypto) roll into the following week. Months are calendar months.
//! The trailing period is included even when it has not closed yet; its bar
//! simply carries the latest close seen so far.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use trendwatch_market_data::{Series, Timeframe};

/// Friday closing the Saturday..Friday week that contains `date`.
pub fn week_close_day(date: NaiveDate) -> NaiveDate {
    let friday = Weekday::Fri.num_days_from_monday() as i64;
    let weekday = date.weekday().num_days_from_monday() as i64;
    date + Duration::days((friday - weekday).rem_euclid(7))
}

/// Resample a daily series to `timeframe`.
///
/// Daily input is returned as is.
pub fn resample(daily: &Series, timeframe: Timeframe) -> Series {
    match timeframe {
        Timeframe::Daily => daily.clone(),
        Timeframe::Weekly => daily.aggregate_by(week_close_day),
        Timeframe::Monthly => daily.aggregate_by(|date| (date.year(), date.month())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use trendwatch_market_data::Bar;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar(d: NaiveDate, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Bar {
        Bar::ohlcv(d, open, high, low, close, Some(dec!(1000)))
    }

    #[test]
    fn test_week_close_day() {
        // 2024-01-08 is a Monday
        assert_eq!(week_close_day(date(2024, 1, 8)), date(2024, 1, 12));
        assert_eq!(week_close_day(date(2024, 1, 12)), date(2024, 1, 12));
        assert_eq!(week_close_day(date(2024, 1, 13)), date(2024, 1, 19));
        assert_eq!(week_close_day(date(2024, 1, 14)), date(2024, 1, 19));
    }

    #[test]
    fn test_five_days_make_one_weekly_bar() {
        let daily = Series::new(vec![
            bar(date(2024, 1, 8), dec!(10), dec!(11), dec!(9.5), dec!(10.5)),
            bar(date(2024, 1, 9), dec!(10.5), dec!(13), dec!(10), dec!(12)),
            bar(date(2024, 1, 10), dec!(12), dec!(12.5), dec!(8), dec!(9)),
            bar(date(2024, 1, 11), dec!(9), dec!(10), dec!(8.5), dec!(9.8)),
            bar(date(2024, 1, 12), dec!(9.8), dec!(11.2), dec!(9.6), dec!(11)),
        ])
        .unwrap();

        let weekly = resample(&daily, Timeframe::Weekly);
        assert_eq!(weekly.len(), 1);

        let week = weekly.last().unwrap();
        assert_eq!(week.date, date(2024, 1, 12));
        assert_eq!(week.open, dec!(10));
        assert_eq!(week.close, dec!(11));
        assert_eq!(week.high, dec!(13));
        assert_eq!(week.low, dec!(8));
        assert_eq!(week.volume, Some(dec!(5000)));
    }

    #[test]
    fn test_partial_trailing_week_is_kept() {
        let daily = Series::new(vec![
            bar(date(2024, 1, 11), dec!(1), dec!(1), dec!(1), dec!(1)),
            bar(date(2024, 1, 12), dec!(2), dec!(2), dec!(2), dec!(2)),
            bar(date(2024, 1, 15), dec!(3), dec!(3), dec!(3), dec!(3)),
            bar(date(2024, 1, 16), dec!(4), dec!(4), dec!(4), dec!(4)),
        ])
        .unwrap();

        let weekly = resample(&daily, Timeframe::Weekly);
        assert_eq!(weekly.len(), 2);
        let last = weekly.last().unwrap();
        assert_eq!(last.date, date(2024, 1, 16));
        assert_eq!(last.open, dec!(3));
        assert_eq!(last.close, dec!(4));
    }

    #[test]
    fn test_weekend_bars_roll_into_next_week() {
        let daily = Series::new(vec![
            bar(date(2024, 1, 12), dec!(1), dec!(1), dec!(1), dec!(1)),
            bar(date(2024, 1, 13), dec!(2), dec!(2), dec!(2), dec!(2)),
            bar(date(2024, 1, 15), dec!(3), dec!(3), dec!(3), dec!(3)),
        ])
        .unwrap();

        let weekly = resample(&daily, Timeframe::Weekly);
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly.get(1).unwrap().open, dec!(2));
    }

    #[test]
    fn test_monthly_buckets_by_calendar_month() {
        let daily = Series::new(vec![
            bar(date(2024, 1, 30), dec!(5), dec!(6), dec!(4), dec!(5)),
            bar(date(2024, 1, 31), dec!(5), dec!(7), dec!(5), dec!(6)),
            bar(date(2024, 2, 1), dec!(6), dec!(6), dec!(3), dec!(4)),
            bar(date(2025, 2, 3), dec!(4), dec!(4), dec!(4), dec!(4)),
        ])
        .unwrap();

        let monthly = resample(&daily, Timeframe::Monthly);
        assert_eq!(monthly.len(), 3);
        let january = monthly.get(0).unwrap();
        assert_eq!(january.date, date(2024, 1, 31));
        assert_eq!(january.high, dec!(7));
        assert_eq!(january.close, dec!(6));
        assert_eq!(monthly.get(2).unwrap().date, date(2025, 2, 3));
    }

    #[test]
    fn test_resampling_is_deterministic() {
        let daily = Series::new(
            (0..60)
                .map(|i| {
                    let d = date(2024, 3, 1) + Duration::days(i);
                    Bar::from_close(d, Decimal::from(100 + i))
                })
                .collect(),
        )
        .unwrap();

        assert_eq!(
            resample(&daily, Timeframe::Weekly),
            resample(&daily, Timeframe::Weekly)
        );
        assert_eq!(resample(&daily, Timeframe::Daily), daily);
    }
}
