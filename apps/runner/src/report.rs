//! The JSON report handed to downstream rendering, plus a log-friendly summary.

use std::path::Path;

use serde::Serialize;
use trendwatch_core::ranking::ExtremeSignal;
use trendwatch_core::{InstrumentSnapshot, RunReport, SnapshotStatus};
use trendwatch_storage_fs::{write_json_atomic, StorageError};

/// Mode label of reports produced by a backfill.
pub const BACKFILL_MODE: &str = "backfill";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDocument<'a> {
    /// `morning`, `evening` or `backfill`
    pub mode: &'a str,
    #[serde(flatten)]
    pub report: &'a RunReport,
}

pub fn write_report(path: &Path, mode: &str, report: &RunReport) -> Result<(), StorageError> {
    write_json_atomic(path, &RunDocument { mode, report })
}

/// One line per board and per instrument, in report order.
pub fn summary_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    for board in &report.boards {
        lines.push(format!(
            "[{}] {}% above / {}% below MA20 ({} of {})",
            board.board,
            board.breadth.above_pct,
            board.breadth.below_pct,
            board.breadth.above,
            board.breadth.total()
        ));
        lines.extend(board.snapshots.iter().map(snapshot_line));
    }
    if report.failures.no_data > 0 {
        lines.push(format!(
            "{} of {} instruments had no data",
            report.failures.no_data, report.failures.total
        ));
    }
    lines
}

fn snapshot_line(s: &InstrumentSnapshot) -> String {
    let Some(rank) = s.rank else {
        let reason = match s.status {
            SnapshotStatus::InsufficientData { bars } => format!("only {} bars", bars),
            _ => "no data".to_string(),
        };
        return format!("  -  {} {}: {}", s.code(), s.spec.name, reason);
    };

    let delta = match s.rank_delta {
        Some(d) if d > 0 => format!("+{}", d),
        Some(d) => d.to_string(),
        None => "new".to_string(),
    };
    let deviation = s
        .deviation_pct
        .map(|d| format!("{:+.2}%", d.round_dp(2)))
        .unwrap_or_default();
    let since = s
        .transition_date()
        .map(|d| format!(" since {}", d))
        .unwrap_or_default();
    let extreme = match s.extreme {
        ExtremeSignal::ExtremeStrong => " [extreme strong]",
        ExtremeSignal::ExtremeWeak => " [extreme weak]",
        ExtremeSignal::None => "",
    };

    format!(
        "{:>3} ({}) {} {}: {} {}{} w/m {}{}",
        rank,
        delta,
        s.code(),
        s.spec.name,
        deviation,
        s.daily_state(),
        since,
        s.compound,
        extreme
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::RunMode;
    use chrono::NaiveDate;
    use trendwatch_core::{BoardReport, Breadth, FailureSummary};

    fn empty_report() -> RunReport {
        RunReport {
            record_date: NaiveDate::from_ymd_opt(2024, 10, 11).unwrap(),
            boards: vec![BoardReport {
                board: trendwatch_market_data::Board::Major,
                snapshots: Vec::new(),
                breadth: Breadth::from_states([].iter()),
            }],
            failures: FailureSummary {
                total: 3,
                no_data: 1,
                insufficient_data: 0,
            },
        }
    }

    #[test]
    fn test_summary_mentions_breadth_and_failures() {
        let lines = summary_lines(&empty_report());
        assert_eq!(lines[0], "[major] 50% above / 50% below MA20 (0 of 0)");
        assert_eq!(lines[1], "1 of 3 instruments had no data");
    }

    #[test]
    fn test_document_flattens_report_next_to_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&path, RunMode::Morning.as_str(), &empty_report()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["mode"], "morning");
        assert_eq!(raw["recordDate"], "2024-10-11");
        assert_eq!(raw["failures"]["noData"], 1);
    }
}
