//! Financial Modeling Prep quote provider.
//!
//! Consumes `/api/v3/quote/{symbol}`, which answers with a one-element JSON
//! array. An empty array means the symbol is unknown.
//!
//! Requires an API key; disabled in the default provider table.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::QuoteError;
use crate::models::Quote;
use crate::provider::{default_client, fetch_text, ProviderConfig, QuoteProvider};

const PROVIDER_ID: &str = "FMP";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpQuote {
    symbol: Option<String>,
    price: Option<f64>,
    change: Option<f64>,
    /// FMP's name for the change percent, already scaled to percent.
    changes_percentage: Option<f64>,
    day_high: Option<f64>,
    day_low: Option<f64>,
    open: Option<f64>,
    previous_close: Option<f64>,
    volume: Option<f64>,
}

pub struct FmpProvider {
    client: Client,
    base_url: String,
    api_key: String,
    priority: u8,
}

impl FmpProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: default_client(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            priority: config.priority,
        }
    }

    /// Normalize a /quote array body into a quote.
    fn parse_quote(text: &str) -> Result<Quote, QuoteError> {
        let malformed = |message: String| QuoteError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message,
        };

        let mut payload: Vec<FmpQuote> = serde_json::from_str(text)
            .map_err(|e| malformed(format!("undecodable response: {}", e)))?;

        if payload.is_empty() {
            return Err(malformed("empty quote array".to_string()));
        }
        let entry = payload.swap_remove(0);

        let symbol = entry
            .symbol
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("missing symbol".to_string()))?;

        let price = entry
            .price
            .and_then(|v| Decimal::try_from(v).ok())
            .ok_or_else(|| malformed(format!("no price for {}", symbol)))?;

        let dec_or = |v: Option<f64>, fallback: Decimal| {
            v.and_then(|x| Decimal::try_from(x).ok()).unwrap_or(fallback)
        };

        let previous_close = dec_or(entry.previous_close, price);

        Ok(Quote {
            symbol: symbol.to_uppercase(),
            price,
            change: dec_or(entry.change, price - previous_close),
            change_percent: dec_or(entry.changes_percentage, Decimal::ZERO),
            volume: dec_or(entry.volume, Decimal::ZERO),
            high: dec_or(entry.day_high, price),
            low: dec_or(entry.day_low, price),
            open: dec_or(entry.open, price),
            previous_close,
            timestamp: Utc::now(),
            source: PROVIDER_ID.to_string(),
        })
    }
}

#[async_trait]
impl QuoteProvider for FmpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let url = format!("{}/quote/{}?apikey={}", self.base_url, symbol, self.api_key);
        debug!("FMP request for '{}'", symbol);

        let text = fetch_text(&self.client, PROVIDER_ID, &url).await?;
        Self::parse_quote(&text)
    }
}
