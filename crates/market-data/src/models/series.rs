use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::bar::Bar;

/// Ordering violations detected when building a [`Series`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("Bar dated {date} at position {index} is earlier than the bar before it ({previous})")]
    NonAscending {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("Duplicate bar for {date} at position {index}")]
    Duplicate { index: usize, date: NaiveDate },
}

/// Bars ordered strictly ascending by date.
///
/// The ordering is checked once on construction and the bars are never
/// re-sorted: a caller handing over shuffled or duplicated dates gets an error.
/// Gaps (weekends, holidays) are expected and left as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, pair) in bars.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            if current.date == previous.date {
                return Err(SeriesError::Duplicate {
                    index: index + 1,
                    date: current.date,
                });
            }
            if current.date < previous.date {
                return Err(SeriesError::NonAscending {
                    index: index + 1,
                    previous: previous.date,
                    date: current.date,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// The series as it stood on `date`: bars dated on or before it.
    pub fn up_to(&self, date: NaiveDate) -> Series {
        let end = self.bars.partition_point(|bar| bar.date <= date);
        Series {
            bars: self.bars[..end].to_vec(),
        }
    }

    /// Merge runs of consecutive bars sharing the same period key into one bar.
    ///
    /// The merged bar takes the first open, the last close, the max high, the
    /// min low and the summed volume, and is dated by its last constituent.
    /// A volume sum that overflows is dropped.
    /// Keys must be non-decreasing along the series (true of any calendar
    /// bucketing), so the output stays strictly ascending.
    pub fn aggregate_by<K, F>(&self, key: F) -> Series
    where
        K: PartialEq,
        F: Fn(NaiveDate) -> K,
    {
        let mut merged: Vec<Bar> = Vec::new();
        let mut current_key: Option<K> = None;

        for bar in &self.bars {
            let bar_key = key(bar.date);
            if current_key.as_ref() == Some(&bar_key) {
                if let Some(period) = merged.last_mut() {
                    period.date = bar.date;
                    period.high = period.high.max(bar.high);
                    period.low = period.low.min(bar.low);
                    period.close = bar.close;
                    period.volume = match (period.volume, bar.volume) {
                        (Some(a), Some(b)) => a.checked_add(b),
                        (a, b) => a.or(b),
                    };
                    continue;
                }
            }
            merged.push(bar.clone());
            current_key = Some(bar_key);
        }

        Series { bars: merged }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_accepts_ascending_with_gaps() {
        let series = Series::new(vec![
            Bar::from_close(day(2), dec!(1)),
            Bar::from_close(day(3), dec!(2)),
            Bar::from_close(day(8), dec!(3)),
        ])
        .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last().unwrap().date, day(8));
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let err = Series::new(vec![
            Bar::from_close(day(2), dec!(1)),
            Bar::from_close(day(2), dec!(2)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SeriesError::Duplicate {
                index: 1,
                date: day(2)
            }
        );
    }

    #[test]
    fn test_rejects_descending_dates_without_sorting() {
        let err = Series::new(vec![
            Bar::from_close(day(2), dec!(1)),
            Bar::from_close(day(5), dec!(2)),
            Bar::from_close(day(4), dec!(3)),
        ])
        .unwrap_err();
        assert!(matches!(err, SeriesError::NonAscending { index: 2, .. }));
    }

    #[test]
    fn test_aggregate_by_merges_runs() {
        let series = Series::new(vec![
            Bar::ohlcv(day(2), dec!(10), dec!(12), dec!(9), dec!(11), Some(dec!(100))),
            Bar::ohlcv(day(3), dec!(11), dec!(15), dec!(10), dec!(14), None),
            Bar::ohlcv(day(9), dec!(14), dec!(14), dec!(8), dec!(9), Some(dec!(50))),
        ])
        .unwrap();

        let merged = series.aggregate_by(|d| d.day() / 7);
        assert_eq!(merged.len(), 2);

        let first = merged.get(0).unwrap();
        assert_eq!(first.date, day(3));
        assert_eq!(first.open, dec!(10));
        assert_eq!(first.high, dec!(15));
        assert_eq!(first.low, dec!(9));
        assert_eq!(first.close, dec!(14));
        assert_eq!(first.volume, Some(dec!(100)));

        assert_eq!(merged.get(1).unwrap().close, dec!(9));
    }

    #[test]
    fn test_aggregate_by_drops_overflowing_volume() {
        let series = Series::new(vec![
            Bar::ohlcv(day(2), dec!(1), dec!(1), dec!(1), dec!(1), Some(Decimal::MAX)),
            Bar::ohlcv(day(3), dec!(2), dec!(2), dec!(2), dec!(2), Some(Decimal::MAX)),
        ])
        .unwrap();

        let merged = series.aggregate_by(|_| 0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get(0).unwrap().close, dec!(2));
        assert_eq!(merged.get(0).unwrap().volume, None);
    }

    #[test]
    fn test_up_to_is_inclusive() {
        let series = Series::new(vec![
            Bar::from_close(day(2), dec!(1)),
            Bar::from_close(day(3), dec!(2)),
            Bar::from_close(day(8), dec!(3)),
        ])
        .unwrap();
        let cut = series.up_to(day(3));
        assert_eq!(cut.len(), 2);
        assert_eq!(cut.last().unwrap().close, dec!(2));
        assert!(series.up_to(day(1)).is_empty());
        assert_eq!(series.up_to(day(31)), series);
    }
}
