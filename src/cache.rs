//! In-memory quote cache with lazy time-based invalidation.
//!
//! The cache is memory-only and reset on restart; durable state lives in the
//! key-value store (`currentStock` mirror and the watchlist). Expired entries
//! behave as absent on read but are never proactively evicted.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::models::Quote;

/// A cached quote and when it was fetched.
#[derive(Clone, Debug)]
struct CacheEntry {
    quote: Quote,
    fetched_at: Instant,
}

/// Symbol-keyed quote cache with a fixed time-to-live.
///
/// `get` enforces the TTL; an expired entry is treated as a miss and left in
/// place until the next `put` for its symbol overwrites it.
pub struct QuoteCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl QuoteCache {
    /// Create a cache whose entries are valid for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Lock the entries mutex, recovering from poison if necessary.
    ///
    /// Worst case after recovery is a stale or missing cache entry, which
    /// only costs an extra provider call.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Quote cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Return the cached quote for `symbol` if present and not expired.
    pub fn get(&self, symbol: &str) -> Option<Quote> {
        let entries = self.lock_entries();
        let entry = entries.get(symbol)?;

        if entry.fetched_at.elapsed() < self.ttl {
            debug!("Cache hit for '{}'", symbol);
            Some(entry.quote.clone())
        } else {
            debug!("Cache entry for '{}' expired", symbol);
            None
        }
    }

    /// Store a quote for `symbol`, superseding any previous entry.
    pub fn put(&self, symbol: &str, quote: Quote) {
        let mut entries = self.lock_entries();
        entries.insert(
            symbol.to_string(),
            CacheEntry {
                quote,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    /// Number of entries held, including expired ones awaiting overwrite.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Whether the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_quote(symbol: &str) -> Quote {
        Quote::with_derived_change(
            symbol.to_string(),
            dec!(110),
            dec!(1000),
            dec!(112),
            dec!(108),
            dec!(109),
            dec!(100),
            "YAHOO".to_string(),
        )
    }

    #[test]
    fn test_put_then_get() {
        let cache = QuoteCache::new(Duration::from_secs(600));
        cache.put("AAPL", sample_quote("AAPL"));

        let hit = cache.get("AAPL").unwrap();
        assert_eq!(hit.symbol, "AAPL");
        assert_eq!(hit.price, dec!(110));
    }

    #[test]
    fn test_miss_for_unknown_symbol() {
        let cache = QuoteCache::new(Duration::from_secs(600));
        assert!(cache.get("MSFT").is_none());
    }

    #[test]
    fn test_expired_entry_behaves_as_absent_but_is_not_purged() {
        let cache = QuoteCache::new(Duration::ZERO);
        cache.put("AAPL", sample_quote("AAPL"));

        // TTL of zero: expired on the very next read
        assert!(cache.get("AAPL").is_none());
        // Lazy invalidation: the entry is still physically present
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_supersedes_previous_entry() {
        let cache = QuoteCache::new(Duration::from_secs(600));
        cache.put("AAPL", sample_quote("AAPL"));

        let mut newer = sample_quote("AAPL");
        newer.price = dec!(120);
        cache.put("AAPL", newer);

        assert_eq!(cache.get("AAPL").unwrap().price, dec!(120));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = QuoteCache::new(Duration::from_secs(600));
        cache.put("AAPL", sample_quote("AAPL"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
