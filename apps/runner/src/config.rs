use std::env;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;

use crate::schedule::RunMode;

/// Runner settings read from the environment (and an optional `.env` file).
#[derive(Debug, Clone)]
pub struct Config {
    /// Universe JSON (`TW_CONFIG_PATH`)
    pub config_path: PathBuf,
    /// Directory of `<code>.csv` files (`TW_DATA_DIR`)
    pub data_dir: PathBuf,
    /// Rank history JSON (`TW_HISTORY_PATH`)
    pub history_path: PathBuf,
    /// Where the JSON report goes; no report file when unset (`TW_OUTPUT_PATH`)
    pub output_path: Option<PathBuf>,
    pub mode: RunMode,
    /// Pretend today is this date (`TW_MOCK_DATE`, `YYYY-MM-DD`)
    pub mock_date: Option<NaiveDate>,
    pub force: bool,
    pub dry_run: bool,
    /// Replay past sessions from this date instead of a scheduled run
    /// (`TW_BACKFILL_START`); the scheduling flags are ignored
    pub backfill_start: Option<NaiveDate>,
    /// Last session to replay, defaults to today (`TW_BACKFILL_END`)
    pub backfill_end: Option<NaiveDate>,
    /// One `<date>.json` report per replayed session (`TW_ARCHIVE_DIR`)
    pub archive_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mode = env::var("TW_RUN_MODE")
            .unwrap_or_else(|_| "evening".to_string())
            .parse::<RunMode>()?;

        let mock_date = date_var("TW_MOCK_DATE")?;
        let backfill_start = date_var("TW_BACKFILL_START")?;
        let backfill_end = date_var("TW_BACKFILL_END")?;
        if backfill_end.is_some() && backfill_start.is_none() {
            anyhow::bail!("TW_BACKFILL_END is set without TW_BACKFILL_START");
        }

        Ok(Self {
            config_path: path_var("TW_CONFIG_PATH", "config/universe.json"),
            data_dir: path_var("TW_DATA_DIR", "data"),
            history_path: path_var("TW_HISTORY_PATH", "state/rank_history.json"),
            output_path: env::var("TW_OUTPUT_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            mode,
            mock_date,
            force: flag_var("TW_FORCE"),
            dry_run: flag_var("TW_DRY_RUN"),
            backfill_start,
            backfill_end,
            archive_dir: path_var("TW_ARCHIVE_DIR", "archive"),
        })
    }
}

fn date_var(key: &str) -> anyhow::Result<Option<NaiveDate>> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_date(raw.trim())
            .map(Some)
            .with_context(|| format!("{} '{}' is not YYYY-MM-DD", key, raw)),
        _ => Ok(None),
    }
}

fn parse_date(raw: &str) -> chrono::ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
}

fn path_var(key: &str, default: &str) -> PathBuf {
    PathBuf::from(env::var(key).unwrap_or_else(|_| default.to_string()))
}

fn flag_var(key: &str) -> bool {
    env::var(key)
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
