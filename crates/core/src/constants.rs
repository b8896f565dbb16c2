/// Number of samples in the trailing moving average
pub const MA_PERIOD: usize = 20;

/// Default number of trading days the transition search walks back
pub const DEFAULT_LOOKBACK_DAYS: usize = 250;

/// Default absolute deviation (in percent) beyond which the ranking extremes are flagged
pub const DEFAULT_EXTREME_THRESHOLD_PCT: i64 = 5;

/// Default share of instruments allowed to come back without data before a run is aborted
pub const DEFAULT_MAX_FAILURE_RATIO: f64 = 1.0 / 3.0;

/// Default calendar days of daily history requested per instrument (enough for monthly MA20)
pub const DEFAULT_HISTORY_DAYS: u32 = 800;
