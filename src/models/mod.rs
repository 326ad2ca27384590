//! Core data types for quote resolution:
//! - `quote` - the normalized market snapshot ([`Quote`])
//! - `watchlist` - persisted watchlist entries ([`WatchlistEntry`])

mod quote;
mod watchlist;

pub use quote::Quote;
pub use watchlist::WatchlistEntry;
