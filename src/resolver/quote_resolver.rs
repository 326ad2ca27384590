//! Quote resolver: cache-first, sequential multi-provider fallback.
//!
//! For each resolution the resolver:
//! 1. normalizes the symbol (trim, uppercase)
//! 2. answers from the cache when a non-expired entry exists
//! 3. otherwise walks the enabled providers strictly in priority order,
//!    bounding each call with a timeout; the first structurally valid quote
//!    is cached, mirrored to the `currentStock` store key, and returned
//! 4. returns `AllProvidersFailed` when the chain is exhausted - there is
//!    no synthetic fallback data
//!
//! Failures are not remembered across resolutions: a provider that failed
//! here is re-tried in full by the next `resolve` call. Concurrent
//! resolutions for the same symbol may race the cache write; last write
//! wins.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};

use crate::cache::QuoteCache;
use crate::errors::{FailureClass, QuoteError};
use crate::models::Quote;
use crate::provider::QuoteProvider;
use crate::store::{KeyValueStore, CURRENT_STOCK_KEY};

use super::rate_limiter::RateLimiter;
use super::validator::QuoteValidator;

/// Resolver tunables. The defaults are the canonical choices; both values
/// varied across dashboard deployments and are configuration, not constants.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// How long a cached quote stays fresh (default 10 minutes).
    pub cache_ttl: Duration,
    /// Upper bound for a single provider call (default 5 seconds).
    pub provider_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(600),
            provider_timeout: Duration::from_secs(5),
        }
    }
}

/// Normalize user input into a ticker symbol.
///
/// Trims and uppercases; blank input is `InvalidSymbol` and never reaches
/// the network.
pub fn normalize_symbol(raw: &str) -> Result<String, QuoteError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(QuoteError::InvalidSymbol(raw.to_string()));
    }
    Ok(symbol)
}

/// Turns a symbol into a quote via cache-then-fallback-chain logic.
pub struct QuoteResolver {
    providers: Vec<Arc<dyn QuoteProvider>>,
    cache: QuoteCache,
    validator: QuoteValidator,
    rate_limiter: RateLimiter,
    store: Arc<dyn KeyValueStore>,
    provider_timeout: Duration,
}

impl QuoteResolver {
    /// Create a resolver with default configuration.
    ///
    /// Providers are sorted by priority once, at construction; the chain
    /// order is fixed for the resolver's lifetime.
    pub fn new(providers: Vec<Arc<dyn QuoteProvider>>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(providers, store, ResolverConfig::default())
    }

    /// Create a resolver with custom cache TTL and provider timeout.
    pub fn with_config(
        mut providers: Vec<Arc<dyn QuoteProvider>>,
        store: Arc<dyn KeyValueStore>,
        config: ResolverConfig,
    ) -> Self {
        providers.sort_by_key(|p| p.priority());

        Self {
            providers,
            cache: QuoteCache::new(config.cache_ttl),
            validator: QuoteValidator::new(),
            rate_limiter: RateLimiter::new(),
            store,
            provider_timeout: config.provider_timeout,
        }
    }

    /// Resolve a symbol into a quote.
    ///
    /// Returns the cached quote when fresh; otherwise the first valid
    /// provider answer, or `AllProvidersFailed`.
    pub async fn resolve(&self, raw_symbol: &str) -> Result<Quote, QuoteError> {
        let symbol = normalize_symbol(raw_symbol)?;

        if let Some(quote) = self.cache.get(&symbol) {
            return Ok(quote);
        }

        if self.providers.is_empty() {
            warn!("No providers configured");
            return Err(QuoteError::AllProvidersFailed);
        }

        for provider in &self.providers {
            let provider_id = provider.id();

            self.rate_limiter.acquire(provider_id).await;

            debug!("Trying provider '{}' for '{}'", provider_id, symbol);

            let outcome =
                tokio::time::timeout(self.provider_timeout, provider.fetch_quote(&symbol)).await;

            let mut quote = match outcome {
                // The timed-out future is dropped here; a late response is
                // simply never observed.
                Err(_elapsed) => {
                    warn!(
                        "Provider '{}' timed out after {:?} for '{}'",
                        provider_id, self.provider_timeout, symbol
                    );
                    continue;
                }
                Ok(Err(e)) => match e.failure_class() {
                    FailureClass::NextProvider => {
                        warn!("Provider '{}' failed for '{}': {}", provider_id, symbol, e);
                        continue;
                    }
                    FailureClass::Terminal => return Err(e),
                },
                Ok(Ok(quote)) => quote,
            };

            if let Err(e) = self.validator.validate(&quote) {
                warn!(
                    "Provider '{}' returned invalid quote for '{}': {}",
                    provider_id, symbol, e
                );
                continue;
            }

            // Some providers echo a different casing or listing variant;
            // the resolved record carries the symbol the caller asked for.
            if quote.symbol != symbol {
                debug!(
                    "Provider '{}' answered '{}' for requested '{}'",
                    provider_id, quote.symbol, symbol
                );
                quote.symbol = symbol.clone();
            }

            self.cache.put(&symbol, quote.clone());
            self.persist_current(&quote);

            debug!("Resolved '{}' via '{}'", symbol, provider_id);
            return Ok(quote);
        }

        warn!("All providers failed for '{}'", symbol);
        Err(QuoteError::AllProvidersFailed)
    }

    /// Restore the last-resolved quote from the store.
    ///
    /// An entry older than the cache TTL is discarded and its key cleared;
    /// corrupt data is logged, cleared, and treated as absence.
    pub fn load_last_quote(&self) -> Option<Quote> {
        let text = self.store.get(CURRENT_STOCK_KEY)?;

        let quote: Quote = match serde_json::from_str(&text) {
            Ok(q) => q,
            Err(e) => {
                warn!("Stored current quote is corrupt ({}), clearing", e);
                self.store.remove(CURRENT_STOCK_KEY);
                return None;
            }
        };

        let age = Utc::now().signed_duration_since(quote.timestamp);
        let ttl = chrono::Duration::from_std(self.cache.ttl()).unwrap_or(chrono::Duration::zero());
        if age > ttl {
            debug!(
                "Stored quote for '{}' is {}s old, discarding",
                quote.symbol,
                age.num_seconds()
            );
            self.store.remove(CURRENT_STOCK_KEY);
            return None;
        }

        Some(quote)
    }

    /// Look up the cache without touching the network.
    pub fn cached(&self, symbol: &str) -> Option<Quote> {
        let symbol = normalize_symbol(symbol).ok()?;
        self.cache.get(&symbol)
    }

    /// The configured fallback chain, in attempt order.
    pub fn providers(&self) -> &[Arc<dyn QuoteProvider>] {
        &self.providers
    }

    fn persist_current(&self, quote: &Quote) {
        match serde_json::to_string(quote) {
            Ok(json) => {
                if let Err(e) = self.store.set(CURRENT_STOCK_KEY, &json) {
                    warn!("Failed to persist current quote: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize current quote: {}", e),
        }
    }
}
