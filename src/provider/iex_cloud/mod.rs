//! IEX Cloud quote provider.
//!
//! Consumes `/stable/stock/{symbol}/quote`. IEX reports `changePercent` as a
//! fraction (0.0125 = 1.25%), so it is scaled by 100 during normalization.
//!
//! Requires an API token; disabled in the default provider table.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::QuoteError;
use crate::models::Quote;
use crate::provider::{default_client, fetch_text, ProviderConfig, QuoteProvider};

const PROVIDER_ID: &str = "IEX_CLOUD";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IexQuote {
    symbol: Option<String>,
    latest_price: Option<f64>,
    change: Option<f64>,
    change_percent: Option<f64>,
    volume: Option<f64>,
    /// Populated when `volume` is restricted on the free tier.
    latest_volume: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    open: Option<f64>,
    previous_close: Option<f64>,
}

pub struct IexCloudProvider {
    client: Client,
    base_url: String,
    api_key: String,
    priority: u8,
}

impl IexCloudProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: default_client(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            priority: config.priority,
        }
    }

    /// Normalize a /quote body into a quote.
    fn parse_quote(text: &str) -> Result<Quote, QuoteError> {
        let malformed = |message: String| QuoteError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message,
        };

        let payload: IexQuote = serde_json::from_str(text)
            .map_err(|e| malformed(format!("undecodable response: {}", e)))?;

        let symbol = payload
            .symbol
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("missing symbol".to_string()))?;

        let price = payload
            .latest_price
            .and_then(|v| Decimal::try_from(v).ok())
            .ok_or_else(|| malformed(format!("no latest price for {}", symbol)))?;

        let dec_or = |v: Option<f64>, fallback: Decimal| {
            v.and_then(|x| Decimal::try_from(x).ok()).unwrap_or(fallback)
        };

        let previous_close = dec_or(payload.previous_close, price);
        let change = dec_or(payload.change, price - previous_close);
        let change_percent = match payload.change_percent.and_then(|v| Decimal::try_from(v).ok())
        {
            // Fraction on the wire
            Some(fraction) => fraction * Decimal::ONE_HUNDRED,
            None if previous_close.is_zero() => Decimal::ZERO,
            None => change / previous_close * Decimal::ONE_HUNDRED,
        };

        Ok(Quote {
            symbol: symbol.to_uppercase(),
            price,
            change,
            change_percent,
            volume: dec_or(payload.volume.or(payload.latest_volume), Decimal::ZERO),
            high: dec_or(payload.high, price),
            low: dec_or(payload.low, price),
            open: dec_or(payload.open, price),
            previous_close,
            timestamp: Utc::now(),
            source: PROVIDER_ID.to_string(),
        })
    }
}

#[async_trait]
impl QuoteProvider for IexCloudProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let url = format!("{}/{}/quote?token={}", self.base_url, symbol, self.api_key);
        debug!("IEX Cloud request for '{}'", symbol);

        let text = fetch_text(&self.client, PROVIDER_ID, &url).await?;
        Self::parse_quote(&text)
    }
}
