use std::collections::HashSet;
use std::path::Path;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trendwatch_market_data::InstrumentSpec;

use crate::constants::{
    DEFAULT_EXTREME_THRESHOLD_PCT, DEFAULT_HISTORY_DAYS, DEFAULT_LOOKBACK_DAYS,
    DEFAULT_MAX_FAILURE_RATIO,
};
use crate::errors::{ConfigError, Result};

/// Tunables of the calculation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Trading days the transition search walks back before giving up
    pub lookback_days: usize,

    /// Absolute deviation (percent) an extreme must exceed to be flagged
    pub extreme_threshold_pct: Decimal,

    /// Share of instruments allowed to have no data (0.0 - 1.0)
    pub max_failure_ratio: f64,

    /// Calendar days of daily history to request per instrument
    pub history_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            extreme_threshold_pct: Decimal::from(DEFAULT_EXTREME_THRESHOLD_PCT),
            max_failure_ratio: DEFAULT_MAX_FAILURE_RATIO,
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }
}

/// The configured instrument universe plus engine tunables.
///
/// Loaded once per run from a JSON file:
///
/// ```json
/// {
///   "lookback_days": 250,
///   "extreme_threshold_pct": 5,
///   "instruments": [
///     { "code": "000300", "name": "CSI 300", "category": "major_index", "source": "csv" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub lookback_days: usize,
    pub extreme_threshold_pct: Decimal,
    pub max_failure_ratio: f64,
    pub history_days: u32,
    pub instruments: Vec<InstrumentSpec>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            lookback_days: engine.lookback_days,
            extreme_threshold_pct: engine.extreme_threshold_pct,
            max_failure_ratio: engine.max_failure_ratio,
            history_days: engine.history_days,
            instruments: Vec::new(),
        }
    }
}

impl UniverseConfig {
    /// Parse and validate a configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: UniverseConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading universe configuration from {}", path.display());
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.instruments.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }

        let mut seen = HashSet::new();
        for spec in &self.instruments {
            if spec.code.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "instruments.code",
                    reason: format!("empty code for '{}'", spec.name),
                });
            }
            if !seen.insert(spec.code.as_str()) {
                return Err(ConfigError::DuplicateCode(spec.code.clone()));
            }
        }

        if self.lookback_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "lookback_days",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.extreme_threshold_pct.is_sign_negative() {
            return Err(ConfigError::InvalidValue {
                key: "extreme_threshold_pct",
                reason: format!("must not be negative, got {}", self.extreme_threshold_pct),
            });
        }
        if !(0.0..=1.0).contains(&self.max_failure_ratio) {
            return Err(ConfigError::InvalidValue {
                key: "max_failure_ratio",
                reason: format!("must be within 0..=1, got {}", self.max_failure_ratio),
            });
        }
        if self.history_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "history_days",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            lookback_days: self.lookback_days,
            extreme_threshold_pct: self.extreme_threshold_pct,
            max_failure_ratio: self.max_failure_ratio,
            history_days: self.history_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use rust_decimal_macros::dec;
    use trendwatch_market_data::InstrumentCategory;

    const SAMPLE: &str = r#"{
        "lookback_days": 120,
        "extreme_threshold_pct": 7.5,
        "instruments": [
            { "code": "000300", "name": "CSI 300", "category": "major_index", "source": "csv" },
            { "code": "BK0475", "name": "Banks", "category": "sector", "source": "csv" }
        ]
    }"#;

    #[test]
    fn test_parses_and_fills_defaults() {
        let config = UniverseConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.lookback_days, 120);
        assert_eq!(config.extreme_threshold_pct, dec!(7.5));
        assert_eq!(config.history_days, DEFAULT_HISTORY_DAYS);
        assert_eq!(config.instruments.len(), 2);
        assert_eq!(config.instruments[1].category, InstrumentCategory::Sector);

        let engine = config.engine_config();
        assert_eq!(engine.lookback_days, 120);
        assert_eq!(engine.max_failure_ratio, DEFAULT_MAX_FAILURE_RATIO);
    }

    #[test]
    fn test_empty_universe_is_rejected() {
        let err = UniverseConfig::from_json_str(r#"{"instruments": []}"#).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::EmptyUniverse)));
    }

    #[test]
    fn test_duplicate_codes_are_rejected() {
        let raw = r#"{"instruments": [
            {"code": "XAU", "name": "Gold", "source": "spot"},
            {"code": "XAU", "name": "Gold again", "source": "spot"}
        ]}"#;
        let err = UniverseConfig::from_json_str(raw).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::DuplicateCode(code)) if code == "XAU"));
    }

    #[test]
    fn test_zero_lookback_is_rejected() {
        let raw = r#"{"lookback_days": 0, "instruments": [
            {"code": "XAU", "name": "Gold", "source": "spot"}
        ]}"#;
        let err = UniverseConfig::from_json_str(raw).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { key: "lookback_days", .. })
        ));
    }

    #[test]
    fn test_failure_ratio_out_of_range_is_rejected() {
        let raw = r#"{"max_failure_ratio": 1.5, "instruments": [
            {"code": "XAU", "name": "Gold", "source": "spot"}
        ]}"#;
        assert!(UniverseConfig::from_json_str(raw).is_err());
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = UniverseConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
