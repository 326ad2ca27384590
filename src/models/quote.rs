use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalized market snapshot for a ticker symbol.
///
/// Every provider payload is normalized into this shape. Field names
/// serialize in camelCase so the persisted JSON (`currentStock`,
/// `stockWatchlist` keys) stays readable alongside the dashboard frontend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Uppercase ticker symbol
    pub symbol: String,
    /// Last traded / regular market price
    pub price: Decimal,
    /// Absolute change versus previous close
    pub change: Decimal,
    /// Percent change versus previous close
    pub change_percent: Decimal,
    /// Trading volume for the session
    pub volume: Decimal,
    /// Session high
    pub high: Decimal,
    /// Session low
    pub low: Decimal,
    /// Session open
    pub open: Decimal,
    /// Previous session close
    pub previous_close: Decimal,
    /// When the quote was fetched
    pub timestamp: DateTime<Utc>,
    /// Provider that produced it (YAHOO, ALPHA_VANTAGE, ...)
    pub source: String,
}

impl Quote {
    /// Build a quote deriving `change` and `change_percent` from `price`
    /// and `previous_close`.
    ///
    /// Used by providers whose payloads carry only price levels (the Yahoo
    /// chart meta). When `previous_close` is zero both derived fields are
    /// zero rather than a division error.
    #[allow(clippy::too_many_arguments)]
    pub fn with_derived_change(
        symbol: String,
        price: Decimal,
        volume: Decimal,
        high: Decimal,
        low: Decimal,
        open: Decimal,
        previous_close: Decimal,
        source: String,
    ) -> Self {
        let change = price - previous_close;
        let change_percent = if previous_close.is_zero() {
            Decimal::ZERO
        } else {
            change / previous_close * Decimal::ONE_HUNDRED
        };

        Self {
            symbol,
            price,
            change,
            change_percent,
            volume,
            high,
            low,
            open,
            previous_close,
            timestamp: Utc::now(),
            source,
        }
    }

    /// The change percent implied by `price` and `previous_close`, or `None`
    /// when `previous_close` is zero.
    ///
    /// The validator compares this against the provider-reported
    /// `change_percent` and warns on drift.
    pub fn implied_change_percent(&self) -> Option<Decimal> {
        if self.previous_close.is_zero() {
            None
        } else {
            Some((self.price - self.previous_close) / self.previous_close * Decimal::ONE_HUNDRED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_derived_change_arithmetic() {
        let quote = Quote::with_derived_change(
            "AAPL".to_string(),
            dec!(110),
            dec!(1000000),
            dec!(112),
            dec!(108),
            dec!(109),
            dec!(100),
            "YAHOO".to_string(),
        );

        assert_eq!(quote.change, dec!(10));
        assert_eq!(quote.change_percent, dec!(10.0));
    }

    #[test]
    fn test_derived_change_zero_previous_close() {
        let quote = Quote::with_derived_change(
            "NEWCO".to_string(),
            dec!(5),
            dec!(0),
            dec!(5),
            dec!(5),
            dec!(5),
            dec!(0),
            "YAHOO".to_string(),
        );

        assert_eq!(quote.change, dec!(5));
        assert_eq!(quote.change_percent, Decimal::ZERO);
        assert!(quote.implied_change_percent().is_none());
    }

    #[test]
    fn test_serde_camel_case_round_trip() {
        let quote = Quote::with_derived_change(
            "MSFT".to_string(),
            dec!(420.5),
            dec!(25000000),
            dec!(422),
            dec!(415),
            dec!(416),
            dec!(400),
            "IEX_CLOUD".to_string(),
        );

        let json = serde_json::to_string(&quote).unwrap();
        assert!(json.contains("\"changePercent\""));
        assert!(json.contains("\"previousClose\""));

        let back: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(back.symbol, "MSFT");
        assert_eq!(back.price, quote.price);
        assert_eq!(back.change_percent, quote.change_percent);
        assert_eq!(back.source, "IEX_CLOUD");
    }
}
