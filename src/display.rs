//! Display sink abstraction.
//!
//! The resolver core never renders; it reports into a [`DisplaySink`] with
//! three mutually exclusive states. The dashboard frontend implements this
//! against its own widgets; [`LogDisplay`] is the built-in implementation
//! that renders through the logger.

use log::{info, warn};

use crate::models::Quote;

/// Render states for one lookup. Exactly one of these is shown at a time:
/// loading while a resolution is in flight, then either the quote or an
/// error message.
pub trait DisplaySink: Send + Sync {
    fn show_loading(&self, symbol: &str);
    fn show_quote(&self, quote: &Quote);
    fn show_error(&self, message: &str);
}

/// Log-backed display sink.
#[derive(Default)]
pub struct LogDisplay;

impl LogDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySink for LogDisplay {
    fn show_loading(&self, symbol: &str) {
        info!("{}: loading...", symbol);
    }

    fn show_quote(&self, quote: &Quote) {
        let sign = if quote.change.is_sign_negative() {
            ""
        } else {
            "+"
        };
        info!(
            "{}: ${} {}{} ({}{}%) via {}",
            quote.symbol,
            quote.price.round_dp(2),
            sign,
            quote.change.round_dp(2),
            sign,
            quote.change_percent.round_dp(2),
            quote.source
        );
    }

    fn show_error(&self, message: &str) {
        warn!("{}", message);
    }
}
