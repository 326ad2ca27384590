//! End-to-end stock search flow.
//!
//! Ties the resolver, display sink, and watchlist together for one
//! user-facing lookup: show loading, resolve, then render either the quote
//! or a user-facing error message. Every successful lookup lands on the
//! watchlist; terminal failures surface as "data unavailable", individual
//! provider failures never do.

use std::sync::Arc;

use log::debug;

use crate::display::DisplaySink;
use crate::errors::QuoteError;
use crate::models::Quote;
use crate::resolver::{normalize_symbol, QuoteResolver};
use crate::watchlist::Watchlist;

pub struct StockSearch {
    resolver: QuoteResolver,
    display: Arc<dyn DisplaySink>,
    watchlist: Watchlist,
}

impl StockSearch {
    pub fn new(resolver: QuoteResolver, display: Arc<dyn DisplaySink>, watchlist: Watchlist) -> Self {
        Self {
            resolver,
            display,
            watchlist,
        }
    }

    /// Run one lookup for raw user input.
    ///
    /// Blank input short-circuits to an error message without touching the
    /// network. The returned error mirrors what was rendered.
    pub async fn search(&mut self, raw_input: &str) -> Result<Quote, QuoteError> {
        let symbol = match normalize_symbol(raw_input) {
            Ok(symbol) => symbol,
            Err(e) => {
                self.display.show_error(e.user_message());
                return Err(e);
            }
        };

        self.display.show_loading(&symbol);

        match self.resolver.resolve(&symbol).await {
            Ok(quote) => {
                self.display.show_quote(&quote);
                self.watchlist.add(quote.clone());
                Ok(quote)
            }
            Err(e) => {
                debug!("Search for '{}' failed: {}", symbol, e);
                self.display.show_error(e.user_message());
                Err(e)
            }
        }
    }

    /// Restore and render the last session's quote, if still fresh.
    pub fn restore_last_session(&self) -> Option<Quote> {
        let quote = self.resolver.load_last_quote()?;
        self.display.show_quote(&quote);
        Some(quote)
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    /// Remove a symbol from the watchlist.
    pub fn remove_from_watchlist(&mut self, symbol: &str) -> bool {
        self.watchlist.remove(symbol)
    }

    pub fn resolver(&self) -> &QuoteResolver {
        &self.resolver
    }
}
