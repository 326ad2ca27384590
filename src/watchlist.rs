//! Persisted watchlist of resolved symbols.
//!
//! Append-only set deduplicated by symbol, insertion-ordered for display.
//! The whole collection is serialized to the `stockWatchlist` store key on
//! every mutation; corrupt or missing persisted data degrades to an empty
//! watchlist, never a failure.

use std::sync::Arc;

use log::warn;

use crate::models::{Quote, WatchlistEntry};
use crate::store::{KeyValueStore, WATCHLIST_KEY};

pub struct Watchlist {
    entries: Vec<WatchlistEntry>,
    store: Arc<dyn KeyValueStore>,
}

impl Watchlist {
    /// Load the watchlist from the store.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(WATCHLIST_KEY) {
            Some(text) => match serde_json::from_str::<Vec<WatchlistEntry>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Stored watchlist is corrupt ({}), starting empty", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self { entries, store }
    }

    /// Add a quote to the watchlist. Idempotent by symbol: a symbol already
    /// present keeps its original entry (and `addedAt`) untouched.
    pub fn add(&mut self, quote: Quote) {
        if self.contains(&quote.symbol) {
            return;
        }
        self.entries.push(WatchlistEntry::new(quote));
        self.save();
    }

    /// Remove a symbol. Returns whether an entry was removed.
    pub fn remove(&mut self, symbol: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.symbol() != symbol);
        let removed = self.entries.len() != before;
        if removed {
            self.save();
        }
        removed
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.iter().any(|e| e.symbol() == symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist the whole collection. Write failures are logged, not raised;
    /// the in-memory list remains authoritative for this session.
    fn save(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => {
                if let Err(e) = self.store.set(WATCHLIST_KEY, &json) {
                    warn!("Failed to persist watchlist: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize watchlist: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;

    fn sample_quote(symbol: &str, price: rust_decimal::Decimal) -> Quote {
        Quote::with_derived_change(
            symbol.to_string(),
            price,
            dec!(1000),
            price,
            price,
            price,
            dec!(100),
            "YAHOO".to_string(),
        )
    }

    #[test]
    fn test_add_is_idempotent_by_symbol() {
        let mut watchlist = Watchlist::load(Arc::new(MemoryStore::new()));

        watchlist.add(sample_quote("AAPL", dec!(110)));
        watchlist.add(sample_quote("AAPL", dec!(120)));

        assert_eq!(watchlist.len(), 1);
        // First entry wins; a re-add does not refresh the stored quote
        assert_eq!(watchlist.entries()[0].quote.price, dec!(110));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut watchlist = Watchlist::load(Arc::new(MemoryStore::new()));
        watchlist.add(sample_quote("MSFT", dec!(420)));
        watchlist.add(sample_quote("AAPL", dec!(110)));
        watchlist.add(sample_quote("SPY", dec!(500)));

        let symbols: Vec<_> = watchlist.entries().iter().map(|e| e.symbol()).collect();
        assert_eq!(symbols, vec!["MSFT", "AAPL", "SPY"]);
    }

    #[test]
    fn test_remove() {
        let mut watchlist = Watchlist::load(Arc::new(MemoryStore::new()));
        watchlist.add(sample_quote("AAPL", dec!(110)));

        assert!(watchlist.remove("AAPL"));
        assert!(!watchlist.remove("AAPL"));
        assert!(watchlist.is_empty());
    }

    #[test]
    fn test_round_trip_through_store() {
        let store = Arc::new(MemoryStore::new());

        {
            let mut watchlist = Watchlist::load(store.clone());
            watchlist.add(sample_quote("MSFT", dec!(420.5)));
            watchlist.add(sample_quote("AAPL", dec!(110.25)));
        }

        let reloaded = Watchlist::load(store);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.entries()[0].symbol(), "MSFT");
        assert_eq!(reloaded.entries()[0].quote.price, dec!(420.5));
        assert_eq!(reloaded.entries()[1].symbol(), "AAPL");
        assert_eq!(reloaded.entries()[1].quote.price, dec!(110.25));
    }

    #[test]
    fn test_corrupt_persisted_data_degrades_to_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(WATCHLIST_KEY, "][ not json").unwrap();

        let watchlist = Watchlist::load(store.clone());
        assert!(watchlist.is_empty());

        // The next mutation overwrites the corrupt key
        let mut watchlist = watchlist;
        watchlist.add(sample_quote("AAPL", dec!(110)));
        let reloaded = Watchlist::load(store);
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_mutations_persist_immediately() {
        let store = Arc::new(MemoryStore::new());
        let mut watchlist = Watchlist::load(store.clone());

        watchlist.add(sample_quote("AAPL", dec!(110)));
        let persisted: Vec<WatchlistEntry> =
            serde_json::from_str(&store.get(WATCHLIST_KEY).unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);

        watchlist.remove("AAPL");
        let persisted: Vec<WatchlistEntry> =
            serde_json::from_str(&store.get(WATCHLIST_KEY).unwrap()).unwrap();
        assert!(persisted.is_empty());
    }
}
