//! Provider configuration table and symbol suggestions.
//!
//! Providers are data, not code: one [`ProviderConfig`] entry per adapter
//! decides whether it runs and where it sits in the fallback chain. The
//! defaults reproduce the dashboard's shipped configuration - Yahoo on and
//! first, the key-gated providers off until a key is supplied.

use std::sync::Arc;

use log::warn;
use serde::Deserialize;

use super::alpha_vantage::AlphaVantageProvider;
use super::fmp::FmpProvider;
use super::iex_cloud::IexCloudProvider;
use super::yahoo::YahooProvider;
use super::QuoteProvider;

/// Configuration for a single provider adapter.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Base URL (for Yahoo: the CORS-style proxy prefix, empty = direct).
    pub base_url: String,
    /// API key, where the provider requires one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Whether this provider participates in the fallback chain.
    pub enabled: bool,
    /// Chain position; lower values are tried first.
    pub priority: u8,
}

/// The full provider table.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderSettings {
    pub yahoo: ProviderConfig,
    pub alpha_vantage: ProviderConfig,
    pub iex_cloud: ProviderConfig,
    pub fmp: ProviderConfig,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            yahoo: ProviderConfig {
                base_url: "https://api.allorigins.win/raw?url=".to_string(),
                api_key: None,
                enabled: true,
                priority: 1,
            },
            alpha_vantage: ProviderConfig {
                base_url: "https://www.alphavantage.co/query".to_string(),
                api_key: None,
                enabled: false,
                priority: 2,
            },
            iex_cloud: ProviderConfig {
                base_url: "https://cloud.iexapis.com/stable/stock".to_string(),
                api_key: None,
                enabled: false,
                priority: 3,
            },
            fmp: ProviderConfig {
                base_url: "https://financialmodelingprep.com/api/v3".to_string(),
                api_key: None,
                enabled: false,
                priority: 4,
            },
        }
    }
}

/// Build the ordered provider chain from a settings table.
///
/// Disabled entries are skipped. An enabled entry missing a required API key
/// is skipped with a warning rather than producing a provider that can only
/// fail. The result is sorted by priority, lowest first.
pub fn build_providers(settings: &ProviderSettings) -> Vec<Arc<dyn QuoteProvider>> {
    let mut providers: Vec<Arc<dyn QuoteProvider>> = Vec::new();

    fn key_gated(name: &str, config: &ProviderConfig) -> bool {
        if config.api_key.is_none() {
            warn!("Provider '{}' enabled without an API key, skipping", name);
            return false;
        }
        true
    }

    if settings.yahoo.enabled {
        providers.push(Arc::new(YahooProvider::new(&settings.yahoo)));
    }
    if settings.alpha_vantage.enabled && key_gated("alphaVantage", &settings.alpha_vantage) {
        providers.push(Arc::new(AlphaVantageProvider::new(&settings.alpha_vantage)));
    }
    if settings.iex_cloud.enabled && key_gated("iexCloud", &settings.iex_cloud) {
        providers.push(Arc::new(IexCloudProvider::new(&settings.iex_cloud)));
    }
    if settings.fmp.enabled && key_gated("fmp", &settings.fmp) {
        providers.push(Arc::new(FmpProvider::new(&settings.fmp)));
    }

    providers.sort_by_key(|p| p.priority());
    providers
}

/// Commonly searched symbols, used for input suggestions.
pub const POPULAR_SYMBOLS: &[&str] = &[
    // Tech
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "NFLX", "TSLA",
    // Financial
    "JPM", "BAC", "WFC", "GS", "MS", "C", "AXP", "V", "MA",
    // Healthcare
    "JNJ", "PFE", "UNH", "ABBV", "MRK", "TMO", "ABT", "DHR",
    // Consumer
    "WMT", "PG", "KO", "PEP", "NKE", "MCD", "SBUX", "HD", "LOW",
    // ETFs
    "SPY", "QQQ", "IWM", "VTI", "VOO", "VEA", "VWO", "BND", "GLD", "SLV",
    // Crypto
    "BTC-USD", "ETH-USD", "ADA-USD", "SOL-USD", "DOT-USD",
];

/// Case-insensitive substring match over [`POPULAR_SYMBOLS`].
///
/// Empty input yields no suggestions rather than the whole table.
pub fn suggestions(input: &str) -> Vec<&'static str> {
    let needle = input.trim().to_uppercase();
    if needle.is_empty() {
        return Vec::new();
    }
    POPULAR_SYMBOLS
        .iter()
        .copied()
        .filter(|s| s.contains(&needle))
        .collect()
}
