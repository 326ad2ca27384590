//! BrightFlow Quotes Crate
//!
//! Quote resolution core for the BrightFlow portfolio dashboard: turns a
//! ticker symbol into a normalized quote using a cache-first,
//! multi-provider-fallback strategy, and keeps a persisted watchlist of
//! resolved symbols.
//!
//! # Overview
//!
//! - Multiple providers (Yahoo, Alpha Vantage, IEX Cloud, FMP), selected and
//!   ordered by a configuration table, never by code branching
//! - Strictly sequential fallback in priority order, bounded per-provider
//!   timeout, no retries and no failure memory across resolutions
//! - In-memory TTL cache with lazy invalidation; last quote and watchlist
//!   persisted through a pluggable key-value store
//! - No synthetic fallback data: an exhausted chain is an error
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   StockSearch    | --> |   DisplaySink    |  (loading / quote / error)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  QuoteResolver   | --> |    QuoteCache    |  (TTL, lazy expiry)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  QuoteProvider   | --> |      Quote       |  (normalized snapshot)
//! +------------------+     +------------------+
//!   Yahoo, AlphaVantage,
//!   IexCloud, Fmp
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - normalized market snapshot
//! - [`QuoteResolver`] - cache-then-fallback-chain resolution
//! - [`QuoteProvider`] - capability implemented per remote source
//! - [`ProviderSettings`] - the data-driven provider table
//! - [`Watchlist`] / [`WatchlistEntry`] - persisted symbols of interest
//! - [`KeyValueStore`] - durable persistence seam (`MemoryStore`, `FileStore`)
//! - [`StockSearch`] - one user lookup end to end

pub mod cache;
pub mod display;
pub mod errors;
pub mod models;
pub mod provider;
pub mod resolver;
pub mod search;
pub mod store;
pub mod watchlist;

pub use cache::QuoteCache;
pub use display::{DisplaySink, LogDisplay};
pub use errors::{FailureClass, QuoteError};
pub use models::{Quote, WatchlistEntry};
pub use provider::{
    build_providers, suggestions, ProviderConfig, ProviderSettings, QuoteProvider,
    POPULAR_SYMBOLS,
};
pub use resolver::{
    normalize_symbol, QuoteResolver, QuoteValidator, RateLimitConfig, RateLimiter,
    ResolverConfig, ValidatorConfig,
};
pub use search::StockSearch;
pub use store::{FileStore, KeyValueStore, MemoryStore, CURRENT_STOCK_KEY, WATCHLIST_KEY};
pub use watchlist::Watchlist;
