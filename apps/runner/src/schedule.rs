//! Decides whether a scheduled invocation should run and for which date.
//!
//! Two invocations a day are expected: an evening one after the close that
//! records the same day, and a morning one that catches up on the previous
//! session.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use trendwatch_core::utils::time_utils::{is_weekday, previous_day};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Morning,
    Evening,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Morning => "morning",
            RunMode::Evening => "evening",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown run mode '{0}', expected 'morning' or 'evening'")]
pub struct UnknownRunMode(pub String);

impl FromStr for RunMode {
    type Err = UnknownRunMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(RunMode::Morning),
            "evening" => Ok(RunMode::Evening),
            other => Err(UnknownRunMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleDecision {
    Run {
        record_date: NaiveDate,
        /// Set when a skip rule was overridden
        forced: bool,
    },
    Skip {
        record_date: NaiveDate,
        reason: &'static str,
    },
}

impl ScheduleDecision {
    pub fn record_date(&self) -> NaiveDate {
        match self {
            ScheduleDecision::Run { record_date, .. } | ScheduleDecision::Skip { record_date, .. } => {
                *record_date
            }
        }
    }

    pub fn should_run(&self) -> bool {
        matches!(self, ScheduleDecision::Run { .. })
    }
}

impl fmt::Display for ScheduleDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleDecision::Run { record_date, forced: false } => {
                write!(f, "run for {}", record_date)
            }
            ScheduleDecision::Run { record_date, forced: true } => {
                write!(f, "run for {} (forced)", record_date)
            }
            ScheduleDecision::Skip { record_date, reason } => {
                write!(f, "skip {}: {}", record_date, reason)
            }
        }
    }
}

/// Apply the skip rules of `mode` to `check_date`.
pub fn decide(mode: RunMode, check_date: NaiveDate, force: bool) -> ScheduleDecision {
    let (record_date, skip_reason) = match mode {
        RunMode::Evening => (
            check_date,
            (!is_weekday(check_date)).then_some("no session on weekends"),
        ),
        RunMode::Morning => {
            let session = previous_day(check_date);
            (
                session,
                (!is_weekday(session)).then_some("previous day was not a trading day"),
            )
        }
    };

    match skip_reason {
        Some(reason) if !force => ScheduleDecision::Skip {
            record_date,
            reason,
        },
        skipped => ScheduleDecision::Run {
            record_date,
            forced: skipped.is_some(),
        },
    }
}
