use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

/// Timezone of the exchange whose sessions the runs follow.
/// Record dates are derived in this zone, never in the host's local time.
pub const DEFAULT_MARKET_TZ: Tz = chrono_tz::Asia::Shanghai;

/// Converts a UTC instant to a market date in the given timezone.
///
/// # Arguments
/// * `instant` - The UTC timestamp to convert
/// * `tz` - The timezone to use for the conversion
pub fn market_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Equivalent to `market_date_from_utc(Utc::now(), DEFAULT_MARKET_TZ)`.
pub fn market_date_today() -> NaiveDate {
    market_date_from_utc(Utc::now(), DEFAULT_MARKET_TZ)
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date - Duration::days(1)
}
