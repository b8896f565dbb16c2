//! End-to-end run over CSV files with a JSON history on disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use trendwatch_core::ranking::RankingHistoryStore;
use trendwatch_core::{SnapshotStatus, TrendService, UniverseConfig};
use trendwatch_market_data::{Board, ProviderRouter};
use trendwatch_storage_fs::{CsvSeriesProvider, JsonRankingHistoryStore};

const UNIVERSE: &str = r#"{
    "lookback_days": 250,
    "extreme_threshold_pct": 5,
    "instruments": [
        { "code": "UP",   "name": "Rising",  "category": "major_index", "source": "csv" },
        { "code": "DOWN", "name": "Falling", "category": "major_index", "source": "csv" },
        { "code": "SEC",  "name": "Banks",   "category": "sector",      "source": "csv" },
        { "code": "GONE", "name": "Missing", "category": "sector",      "source": "csv" }
    ]
}"#;

fn write_series(dir: &Path, code: &str, closes: impl Iterator<Item = i64>) {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let mut body = String::from("date,open,high,low,close,volume\n");
    for (i, close) in closes.enumerate() {
        let date = start + Duration::days(i as i64);
        body.push_str(&format!(
            "{},{c},{c},{c},{c},1000\n",
            date.format("%Y-%m-%d"),
            c = close
        ));
    }
    fs::write(dir.join(format!("{}.csv", code)), body).unwrap();
}

fn service(data_dir: &Path, history_path: &Path) -> TrendService {
    let config = UniverseConfig::from_json_str(UNIVERSE).unwrap();
    let router = Arc::new(ProviderRouter::new(vec![Arc::new(CsvSeriesProvider::new(
        data_dir,
    ))]));
    let store = Arc::new(JsonRankingHistoryStore::new(history_path));
    TrendService::new(config, router, store)
}

#[tokio::test]
async fn run_ranks_from_csv_and_persists_history() {
    let tmp = tempfile::tempdir().unwrap();
    let data_dir = tmp.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    write_series(&data_dir, "UP", 100..140);
    write_series(&data_dir, "DOWN", (100..140).rev());
    write_series(&data_dir, "SEC", std::iter::repeat(50).take(40));
    let history_path = tmp.path().join("state").join("history.json");

    let report = service(&data_dir, &history_path)
        .run(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap())
        .await
        .unwrap();

    let major = report.board(Board::Major).unwrap();
    assert_eq!(major.snapshots[0].code(), "UP");
    assert_eq!(major.snapshots[1].code(), "DOWN");
    assert_eq!(major.breadth.above, 1);

    let sector = report.board(Board::Sector).unwrap();
    assert_eq!(sector.snapshots[0].code(), "SEC");
    assert_eq!(sector.snapshots[0].rank, Some(1));
    assert_eq!(
        report.snapshot("GONE").unwrap().status,
        SnapshotStatus::NoData
    );

    let stored = JsonRankingHistoryStore::new(&history_path).load().unwrap();
    let latest = stored.latest().unwrap();
    assert_eq!(latest.rank_of(Board::Major, "DOWN"), Some(2));
    assert_eq!(latest.rank_of(Board::Sector, "GONE"), None);
}

#[tokio::test]
async fn second_day_reports_rank_moves() {
    let tmp = tempfile::tempdir().unwrap();
    let data_dir = tmp.path().to_path_buf();
    let history_path = tmp.path().join("history.json");
    write_series(&data_dir, "UP", 100..140);
    write_series(&data_dir, "DOWN", (100..140).rev());
    write_series(&data_dir, "SEC", std::iter::repeat(50).take(40));

    service(&data_dir, &history_path)
        .run(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap())
        .await
        .unwrap();

    // Swap the two majors overnight
    write_series(&data_dir, "UP", (100..140).rev());
    write_series(&data_dir, "DOWN", 100..140);

    let report = service(&data_dir, &history_path)
        .run(NaiveDate::from_ymd_opt(2024, 4, 11).unwrap())
        .await
        .unwrap();

    let up = report.snapshot("UP").unwrap();
    assert_eq!(up.prior_rank, Some(1));
    assert_eq!(up.rank_delta, Some(-1));
    assert_eq!(report.snapshot("DOWN").unwrap().rank_delta, Some(1));
}

#[tokio::test]
async fn aborted_run_leaves_history_file_alone() {
    let tmp = tempfile::tempdir().unwrap();
    let data_dir = tmp.path().to_path_buf();
    let history_path = tmp.path().join("history.json");
    write_series(&data_dir, "UP", 100..140);

    let result = service(&data_dir, &history_path)
        .run(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap())
        .await;

    assert!(result.is_err());
    assert!(!history_path.exists());
}
