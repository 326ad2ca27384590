//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The [`QuoteProvider`] trait that all providers implement
//! - The provider configuration table ([`ProviderSettings`]) that selects
//!   and orders adapters
//! - Concrete adapters (Yahoo, Alpha Vantage, IEX Cloud, FMP)
//!
//! The provider system is provider-agnostic and data-driven: the resolver
//! holds `dyn QuoteProvider` objects built from configuration and never
//! branches on a concrete provider type. Each adapter normalizes its own
//! wire shape into the common [`Quote`](crate::models::Quote) record.

mod config;
mod traits;

pub mod alpha_vantage;
pub mod fmp;
pub mod iex_cloud;
pub mod yahoo;

pub use config::{build_providers, suggestions, ProviderConfig, ProviderSettings, POPULAR_SYMBOLS};
pub use traits::QuoteProvider;

use std::time::Duration;

use reqwest::Client;

use crate::errors::QuoteError;

/// HTTP client used by the adapters.
///
/// The client timeout is a backstop; the resolver bounds each provider
/// attempt with its own (shorter, configurable) timeout.
pub(crate) fn default_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GET `url` and return the body text, mapping transport and status
/// problems onto [`QuoteError`] variants.
pub(crate) async fn fetch_text(
    client: &Client,
    provider: &'static str,
    url: &str,
) -> Result<String, QuoteError> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            QuoteError::Timeout {
                provider: provider.to_string(),
            }
        } else {
            QuoteError::Transport {
                provider: provider.to_string(),
                message: format!("request failed: {}", e),
            }
        }
    })?;

    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(QuoteError::RateLimited {
            provider: provider.to_string(),
        });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(QuoteError::Transport {
            provider: provider.to_string(),
            message: format!("HTTP {} - {}", status, body),
        });
    }

    response.text().await.map_err(|e| QuoteError::Transport {
        provider: provider.to_string(),
        message: format!("failed to read response: {}", e),
    })
}
