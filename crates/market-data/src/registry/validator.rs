//! Bar data validation.
//!
//! Validates bars from providers before they become a series:
//! - OHLC invariants (high >= low, open/close between high/low)
//! - Strictly positive close (an MA20 ratio over a zero close is meaningless)
//! - Reasonable value ranges

use log::warn;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::Bar;

/// Validation severity levels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationSeverity {
    /// Hard failure - reject the bar.
    Hard,
    /// Soft warning - accept the bar but log warning.
    Soft,
}

/// Validation result details.
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: ValidationSeverity,
    /// Description of the issue.
    pub message: String,
}

/// Bar validator configuration.
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Whether to reject bars with a non-positive close.
    pub reject_non_positive_close: bool,
    /// Whether to reject bars where high < low.
    pub reject_invalid_ohlc: bool,
    /// Maximum allowed price value (for sanity check).
    pub max_price: Option<Decimal>,
    /// Whether to warn on zero volume.
    pub warn_on_zero_volume: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            reject_non_positive_close: true,
            reject_invalid_ohlc: true,
            max_price: Some(Decimal::from(1_000_000_000i64)),
            // Index and spot-price sources routinely report zero volume
            warn_on_zero_volume: false,
        }
    }
}

/// Bar data validator.
pub struct BarValidator {
    config: ValidatorConfig,
}

impl BarValidator {
    /// Create a new validator with default configuration.
    pub fn new() -> Self {
        Self {
            config: ValidatorConfig::default(),
        }
    }

    /// Create a validator with custom configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a bar.
    ///
    /// Returns Ok(()) if the bar is valid, or Err with details if invalid.
    /// Warnings are logged but do not cause rejection.
    pub fn validate(&self, bar: &Bar) -> Result<(), MarketDataError> {
        let mut issues: Vec<ValidationIssue> = Vec::new();

        self.validate_close_price(bar, &mut issues);
        self.validate_ohlc_invariants(bar, &mut issues);
        self.validate_price_range(bar, &mut issues);
        self.validate_volume(bar, &mut issues);

        let errors: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Hard)
            .collect();

        if !errors.is_empty() {
            let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
            return Err(MarketDataError::ValidationFailed {
                message: format!("{}: {}", bar.date, messages.join("; ")),
            });
        }

        for issue in issues.iter().filter(|i| i.severity == ValidationSeverity::Soft) {
            warn!("Bar validation warning for {}: {}", bar.date, issue.message);
        }

        Ok(())
    }

    /// Validate every bar, stopping at the first hard failure.
    pub fn validate_all(&self, bars: &[Bar]) -> Result<(), MarketDataError> {
        bars.iter().try_for_each(|bar| self.validate(bar))
    }

    fn validate_close_price(&self, bar: &Bar, issues: &mut Vec<ValidationIssue>) {
        if self.config.reject_non_positive_close && bar.close <= Decimal::ZERO {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: format!("Non-positive close price: {}", bar.close),
            });
        }
    }

    /// - High must be >= Low
    /// - Open and Close should be between Low and High
    fn validate_ohlc_invariants(&self, bar: &Bar, issues: &mut Vec<ValidationIssue>) {
        if !self.config.reject_invalid_ohlc {
            return;
        }

        if bar.high < bar.low {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: format!("High ({}) is less than Low ({})", bar.high, bar.low),
            });
            return;
        }

        if bar.open < bar.low || bar.open > bar.high {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: format!(
                    "Open ({}) is outside High/Low range ({}-{})",
                    bar.open, bar.low, bar.high
                ),
            });
        }

        if bar.close < bar.low || bar.close > bar.high {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: format!(
                    "Close ({}) is outside High/Low range ({}-{})",
                    bar.close, bar.low, bar.high
                ),
            });
        }
    }

    fn validate_price_range(&self, bar: &Bar, issues: &mut Vec<ValidationIssue>) {
        if let Some(max_price) = self.config.max_price {
            if bar.close > max_price {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Hard,
                    message: format!("Close price {} exceeds maximum {}", bar.close, max_price),
                });
            }
        }
    }

    fn validate_volume(&self, bar: &Bar, issues: &mut Vec<ValidationIssue>) {
        match bar.volume {
            Some(volume) if volume < Decimal::ZERO => issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: format!("Negative volume: {}", volume),
            }),
            Some(volume) if volume.is_zero() && self.config.warn_on_zero_volume => {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Soft,
                    message: "Zero volume".to_string(),
                })
            }
            _ => {}
        }
    }
}

impl Default for BarValidator {
    fn default() -> Self {
        Self::new()
    }
}
