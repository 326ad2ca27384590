//! Yahoo Finance quote provider.
//!
//! Consumes the `v8/finance/chart` endpoint, optionally through a
//! CORS-style proxy prefix (the dashboard deployment cannot reach Yahoo
//! directly). Only the chart `meta` block is used; `change` and
//! `change_percent` are derived from the regular market price and the
//! previous close since the meta reports neither.
//!
//! No API key required.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::QuoteError;
use crate::models::Quote;
use crate::provider::{default_client, fetch_text, ProviderConfig, QuoteProvider};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const PROVIDER_ID: &str = "YAHOO";

// ============================================================================
// API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

/// Chart meta block. Everything except the symbol is optional on the wire;
/// thinly traded symbols omit the session fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: String,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    /// Previous close of the chart window; fallback when the intraday
    /// `previousClose` is absent.
    chart_previous_close: Option<f64>,
    regular_market_volume: Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
    regular_market_open: Option<f64>,
}

// ============================================================================
// YahooProvider
// ============================================================================

/// Yahoo Finance provider. Default chain head (priority 1, no key).
pub struct YahooProvider {
    client: Client,
    proxy_prefix: String,
    priority: u8,
}

impl YahooProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: default_client(),
            proxy_prefix: config.base_url.clone(),
            priority: config.priority,
        }
    }

    fn request_url(&self, symbol: &str) -> String {
        let chart_url = format!("{}/{}", CHART_URL, symbol);
        if self.proxy_prefix.is_empty() {
            chart_url
        } else {
            format!("{}{}", self.proxy_prefix, urlencoding::encode(&chart_url))
        }
    }

    /// Normalize a chart response body into a quote.
    fn parse_chart(text: &str) -> Result<Quote, QuoteError> {
        let malformed = |message: String| QuoteError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message,
        };

        let response: ChartResponse = serde_json::from_str(text)
            .map_err(|e| malformed(format!("undecodable chart response: {}", e)))?;

        if let Some(error) = response.chart.error {
            if !error.is_null() {
                return Err(malformed(format!("chart error: {}", error)));
            }
        }

        let meta = response
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.swap_remove(0))
                }
            })
            .map(|r| r.meta)
            .ok_or_else(|| malformed("empty chart result".to_string()))?;

        let price = meta
            .regular_market_price
            .and_then(|v| Decimal::try_from(v).ok())
            .ok_or_else(|| malformed(format!("no market price for {}", meta.symbol)))?;

        let dec_or = |v: Option<f64>, fallback: Decimal| {
            v.and_then(|x| Decimal::try_from(x).ok()).unwrap_or(fallback)
        };

        let previous_close = dec_or(meta.previous_close.or(meta.chart_previous_close), price);

        Ok(Quote::with_derived_change(
            meta.symbol.to_uppercase(),
            price,
            dec_or(meta.regular_market_volume, Decimal::ZERO),
            dec_or(meta.regular_market_day_high, price),
            dec_or(meta.regular_market_day_low, price),
            dec_or(meta.regular_market_open, price),
            previous_close,
            PROVIDER_ID.to_string(),
        ))
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let url = self.request_url(symbol);
        debug!("Yahoo request for '{}'", symbol);

        let text = fetch_text(&self.client, PROVIDER_ID, &url).await?;
        Self::parse_chart(&text)
    }
}
