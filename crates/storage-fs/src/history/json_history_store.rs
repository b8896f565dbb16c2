use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use trendwatch_core::ranking::{RankingHistory, RankingHistoryStore};
use trendwatch_core::Result;

use crate::errors::{IntoCore, StorageError};
use crate::utils::write_json_atomic;

/// Rank history kept as a single JSON document.
///
/// ```json
/// {
///   "latest":   { "date": "2024-10-11", "ranks": { "major": { "000300": 1 } } },
///   "previous": { "date": "2024-10-10", "ranks": { "major": { "000300": 2 } } }
/// }
/// ```
pub struct JsonRankingHistoryStore {
    path: PathBuf,
}

impl JsonRankingHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RankingHistoryStore for JsonRankingHistoryStore {
    fn load(&self) -> Result<RankingHistory> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No rank history at {}, starting fresh", self.path.display());
                return Ok(RankingHistory::empty());
            }
            Err(e) => return Err(StorageError::Io(e)).into_core(),
        };

        match serde_json::from_str::<RankingHistory>(&raw) {
            Ok(history) => Ok(history),
            Err(e) => {
                warn!(
                    "Discarding unreadable rank history at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(RankingHistory::empty())
            }
        }
    }

    fn save(&self, history: &RankingHistory) -> Result<()> {
        write_json_atomic(&self.path, history).into_core()?;
        debug!("Rank history written to {}", self.path.display());
        Ok(())
    }
}
