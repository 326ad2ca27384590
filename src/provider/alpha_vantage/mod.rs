//! Alpha Vantage quote provider.
//!
//! Consumes the `GLOBAL_QUOTE` function. Alpha Vantage encodes field names
//! with ordinal prefixes (`"05. price"`) and reports the change percent with
//! a trailing `%`. The free tier is limited to 25 requests per day and
//! signals exhaustion with a 200-status "Note"/"Information" body rather
//! than an HTTP 429.
//!
//! Requires an API key; disabled in the default provider table.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::QuoteError;
use crate::models::Quote;
use crate::provider::{default_client, fetch_text, ProviderConfig, QuoteProvider};

const PROVIDER_ID: &str = "ALPHA_VANTAGE";

// ============================================================================
// API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

/// All values arrive as strings, percent included.
#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: String,
    #[serde(rename = "02. open")]
    open: String,
    #[serde(rename = "03. high")]
    high: String,
    #[serde(rename = "04. low")]
    low: String,
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "06. volume")]
    volume: String,
    #[serde(rename = "08. previous close")]
    previous_close: String,
    #[serde(rename = "09. change")]
    change: String,
    #[serde(rename = "10. change percent")]
    change_percent: String,
}

// ============================================================================
// AlphaVantageProvider
// ============================================================================

pub struct AlphaVantageProvider {
    client: Client,
    base_url: String,
    api_key: String,
    priority: u8,
}

impl AlphaVantageProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: default_client(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            priority: config.priority,
        }
    }

    /// Normalize a GLOBAL_QUOTE body into a quote.
    fn parse_global_quote(text: &str) -> Result<Quote, QuoteError> {
        let malformed = |message: String| QuoteError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message,
        };

        let response: GlobalQuoteResponse = serde_json::from_str(text)
            .map_err(|e| malformed(format!("undecodable response: {}", e)))?;

        // Quota exhaustion arrives as a 200 with an explanatory note
        if response.note.is_some() || response.information.is_some() {
            return Err(QuoteError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if let Some(message) = response.error_message {
            return Err(malformed(message));
        }

        let quote = response
            .global_quote
            .ok_or_else(|| malformed("missing Global Quote object".to_string()))?;

        if quote.symbol.is_empty() {
            return Err(malformed("empty Global Quote".to_string()));
        }

        let field = |name: &str, value: &str| -> Result<Decimal, QuoteError> {
            Decimal::from_str(value.trim())
                .map_err(|e| malformed(format!("bad {} {:?}: {}", name, value, e)))
        };

        let change_percent = field(
            "change percent",
            quote.change_percent.trim_end_matches('%'),
        )?;

        Ok(Quote {
            symbol: quote.symbol.to_uppercase(),
            price: field("price", &quote.price)?,
            change: field("change", &quote.change)?,
            change_percent,
            volume: field("volume", &quote.volume)?,
            high: field("high", &quote.high)?,
            low: field("low", &quote.low)?,
            open: field("open", &quote.open)?,
            previous_close: field("previous close", &quote.previous_close)?,
            timestamp: Utc::now(),
            source: PROVIDER_ID.to_string(),
        })
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let url = format!(
            "{}?function=GLOBAL_QUOTE&symbol={}&apikey={}",
            self.base_url, symbol, self.api_key
        );
        debug!("Alpha Vantage request for '{}'", symbol);

        let text = fetch_text(&self.client, PROVIDER_ID, &url).await?;
        Self::parse_global_quote(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const GLOBAL_QUOTE_BODY: &str = r#"{
        "Global Quote": {
            "01. symbol": "IBM",
            "02. open": "215.0000",
            "03. high": "218.5000",
            "04. low": "214.1000",
            "05. price": "217.7500",
            "06. volume": "3440000",
            "07. latest trading day": "2025-08-29",
            "08. previous close": "215.2500",
            "09. change": "2.5000",
            "10. change percent": "1.1614%"
        }
    }"#;

    #[test]
    fn test_parse_global_quote() {
        let quote = AlphaVantageProvider::parse_global_quote(GLOBAL_QUOTE_BODY).unwrap();
        assert_eq!(quote.symbol, "IBM");
        assert_eq!(quote.price, dec!(217.75));
        assert_eq!(quote.change, dec!(2.5));
        assert_eq!(quote.change_percent, dec!(1.1614));
        assert_eq!(quote.volume, dec!(3440000));
        assert_eq!(quote.previous_close, dec!(215.25));
        assert_eq!(quote.source, "ALPHA_VANTAGE");
    }

    #[test]
    fn test_parse_note_is_rate_limited() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#;
        let err = AlphaVantageProvider::parse_global_quote(body).unwrap_err();
        assert!(matches!(err, QuoteError::RateLimited { .. }));
    }

    #[test]
    fn test_parse_missing_global_quote_is_malformed() {
        let err = AlphaVantageProvider::parse_global_quote("{}").unwrap_err();
        assert!(matches!(err, QuoteError::MalformedResponse { .. }));
    }

    #[test]
    fn test_parse_error_message_is_malformed() {
        let body = r#"{"Error Message": "Invalid API call."}"#;
        let err = AlphaVantageProvider::parse_global_quote(body).unwrap_err();
        assert!(matches!(err, QuoteError::MalformedResponse { .. }));
    }
}
