//! Quote provider trait definition.

use async_trait::async_trait;

use crate::errors::QuoteError;
use crate::models::Quote;

/// Trait for remote quote sources.
///
/// Implement this to add a new quote source. The resolver depends only on
/// this capability: providers are selected and ordered by configuration
/// data, never by code branching on concrete types.
///
/// Implementations normalize their own payload shape into [`Quote`] and map
/// transport/shape problems onto [`QuoteError`] variants; the resolver takes
/// care of timeouts, rate limiting, validation, and fallback.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// A constant string like "YAHOO" or "ALPHA_VANTAGE". Recorded as
    /// [`Quote::source`] and used for logging and rate-limit tracking.
    fn id(&self) -> &'static str;

    /// Provider priority for chain ordering.
    ///
    /// Lower values = higher priority. Default is 10. Normally sourced from
    /// the provider configuration table rather than hardcoded.
    fn priority(&self) -> u8 {
        10
    }

    /// Fetch the latest quote for an already-normalized symbol.
    ///
    /// The symbol is trimmed and uppercased by the resolver before it gets
    /// here. Returns a normalized quote, or a `QuoteError` the resolver will
    /// classify to decide whether to try the next provider.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError>;
}
