//! Quote data validation.
//!
//! Validates normalized quotes before they are cached or surfaced:
//! - required fields (symbol, non-negative price)
//! - non-negative volume
//! - sanity cap on price
//! - consistency of the reported change percent with price/previous close

use log::warn;
use rust_decimal::Decimal;

use crate::errors::QuoteError;
use crate::models::Quote;

/// Validation severity levels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationSeverity {
    /// Hard failure - reject the quote; the resolver treats it exactly like
    /// a provider failure and tries the next provider.
    Hard,
    /// Soft warning - accept the quote but log.
    Soft,
}

/// A single validation finding.
#[derive(Clone, Debug)]
struct ValidationIssue {
    severity: ValidationSeverity,
    message: String,
}

/// Validator configuration.
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Reject quotes with a negative price or volume.
    pub reject_negative_values: bool,
    /// Maximum allowed price (sanity check). `None` disables the cap.
    pub max_price: Option<Decimal>,
    /// Warn when a quote reports zero volume.
    pub warn_on_zero_volume: bool,
    /// Allowed drift, in percentage points, between the reported change
    /// percent and the one implied by price/previous close.
    pub change_percent_tolerance: Decimal,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            reject_negative_values: true,
            max_price: Some(Decimal::from(1_000_000_000i64)),
            warn_on_zero_volume: true,
            change_percent_tolerance: Decimal::new(25, 2), // 0.25 points
        }
    }
}

/// Quote validator. A rejected quote never reaches the cache or the caller.
pub struct QuoteValidator {
    config: ValidatorConfig,
}

impl QuoteValidator {
    pub fn new() -> Self {
        Self {
            config: ValidatorConfig::default(),
        }
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a quote.
    ///
    /// Hard issues produce `QuoteError::ValidationFailed`; soft issues are
    /// logged and the quote is accepted.
    pub fn validate(&self, quote: &Quote) -> Result<(), QuoteError> {
        let mut issues: Vec<ValidationIssue> = Vec::new();

        if quote.symbol.trim().is_empty() {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: "empty symbol".to_string(),
            });
        }

        if self.config.reject_negative_values {
            if quote.price < Decimal::ZERO {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Hard,
                    message: format!("negative price {}", quote.price),
                });
            }
            if quote.volume < Decimal::ZERO {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Hard,
                    message: format!("negative volume {}", quote.volume),
                });
            }
        }

        if let Some(max_price) = self.config.max_price {
            if quote.price > max_price {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Hard,
                    message: format!("price {} above sanity cap {}", quote.price, max_price),
                });
            }
        }

        if self.config.warn_on_zero_volume && quote.volume.is_zero() {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: format!("zero volume for {}", quote.symbol),
            });
        }

        // Providers compute change percent themselves; drift beyond the
        // tolerance usually means previous close and price came from
        // different sessions. Worth a log line, not a rejection.
        if let Some(implied) = quote.implied_change_percent() {
            let drift = (quote.change_percent - implied).abs();
            if drift > self.config.change_percent_tolerance {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Soft,
                    message: format!(
                        "change percent {} drifts from implied {} for {}",
                        quote.change_percent,
                        implied.round_dp(4),
                        quote.symbol
                    ),
                });
            }
        }

        let mut hard_failure: Option<String> = None;
        for issue in issues {
            match issue.severity {
                ValidationSeverity::Hard => {
                    if hard_failure.is_none() {
                        hard_failure = Some(issue.message);
                    }
                }
                ValidationSeverity::Soft => {
                    warn!("Quote validation warning: {}", issue.message);
                }
            }
        }

        match hard_failure {
            Some(message) => Err(QuoteError::ValidationFailed { message }),
            None => Ok(()),
        }
    }
}

impl Default for QuoteValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_quote() -> Quote {
        Quote::with_derived_change(
            "AAPL".to_string(),
            dec!(110),
            dec!(1000000),
            dec!(112),
            dec!(108),
            dec!(109),
            dec!(100),
            "YAHOO".to_string(),
        )
    }

    #[test]
    fn test_valid_quote_passes() {
        assert!(QuoteValidator::new().validate(&valid_quote()).is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut quote = valid_quote();
        quote.price = dec!(-1);
        let err = QuoteValidator::new().validate(&quote).unwrap_err();
        assert!(matches!(err, QuoteError::ValidationFailed { .. }));
    }

    #[test]
    fn test_negative_volume_rejected() {
        let mut quote = valid_quote();
        quote.volume = dec!(-5);
        assert!(QuoteValidator::new().validate(&quote).is_err());
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let mut quote = valid_quote();
        quote.symbol = "  ".to_string();
        assert!(QuoteValidator::new().validate(&quote).is_err());
    }

    #[test]
    fn test_price_above_cap_rejected() {
        let mut quote = valid_quote();
        quote.price = dec!(2000000000);
        assert!(QuoteValidator::new().validate(&quote).is_err());
    }

    #[test]
    fn test_zero_volume_is_soft() {
        let mut quote = valid_quote();
        quote.volume = Decimal::ZERO;
        assert!(QuoteValidator::new().validate(&quote).is_ok());
    }

    #[test]
    fn test_change_percent_drift_is_soft() {
        let mut quote = valid_quote();
        quote.change_percent = dec!(99); // implied is 10
        assert!(QuoteValidator::new().validate(&quote).is_ok());
    }

    #[test]
    fn test_validation_can_be_relaxed() {
        let validator = QuoteValidator::with_config(ValidatorConfig {
            reject_negative_values: false,
            max_price: None,
            warn_on_zero_volume: false,
            change_percent_tolerance: dec!(0.25),
        });
        let mut quote = valid_quote();
        quote.price = dec!(-1);
        assert!(validator.validate(&quote).is_ok());
    }
}
