use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quote::Quote;

/// A watchlist entry: the last-known quote for a symbol plus when the
/// symbol was added.
///
/// Serialized flattened, so the persisted array reads as quote objects with
/// an extra `addedAt` field. Entries are deduplicated by symbol and kept in
/// insertion order for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub quote: Quote,
    /// When the symbol was first added to the watchlist
    pub added_at: DateTime<Utc>,
}

impl WatchlistEntry {
    pub fn new(quote: Quote) -> Self {
        Self {
            quote,
            added_at: Utc::now(),
        }
    }

    /// Symbol this entry tracks.
    pub fn symbol(&self) -> &str {
        &self.quote.symbol
    }
}
