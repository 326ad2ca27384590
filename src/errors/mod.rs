//! Error types and failure classification for quote resolution.
//!
//! This module provides:
//! - [`QuoteError`]: the main error enum for all resolution operations
//! - [`FailureClass`]: classification for determining fallback behavior

mod class;

pub use class::FailureClass;

use thiserror::Error;

/// Errors that can occur while resolving a quote.
///
/// Each variant is classified into a [`FailureClass`] via the
/// [`failure_class`](Self::failure_class) method, which tells the resolver
/// whether to advance to the next provider or stop.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// The input symbol was empty or blank after normalization.
    /// Surfaced to the user immediately; no network call is attempted.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// A single provider call exceeded the configured timeout.
    /// The resolver advances to the next provider.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// Network or HTTP-level failure from one provider.
    /// Recovered locally by advancing to the next provider.
    #[error("Transport error: {provider} - {message}")]
    Transport {
        /// The provider that failed
        provider: String,
        /// Description of the transport failure
        message: String,
    },

    /// A response body was received but could not be decoded into a quote,
    /// or was missing required fields (symbol, price).
    /// Treated identically to a transport failure.
    #[error("Malformed response: {provider} - {message}")]
    MalformedResponse {
        /// The provider that returned the payload
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// The provider rate limited the request (HTTP 429 or quota note).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// A decoded quote was rejected by the validator.
    /// Treated as a provider failure; the chain continues.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// The persistence sink failed to write.
    /// Callers log this and carry on; it is never fatal to a resolution.
    #[error("Store error: {message}")]
    Store {
        /// Description of the write failure
        message: String,
    },

    /// Every configured provider failed or returned invalid data.
    /// Terminal; surfaced to the user as "data unavailable".
    #[error("All providers failed")]
    AllProvidersFailed,
}

impl QuoteError {
    /// Returns the failure classification for this error.
    ///
    /// [`FailureClass::NextProvider`] errors are logged and swallowed by the
    /// resolver, which moves on down the priority chain.
    /// [`FailureClass::Terminal`] errors end the resolution.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            // One provider misbehaved - the next one may still succeed
            Self::Timeout { .. }
            | Self::Transport { .. }
            | Self::MalformedResponse { .. }
            | Self::RateLimited { .. }
            | Self::ValidationFailed { .. } => FailureClass::NextProvider,

            // Nothing further to try
            Self::InvalidSymbol(_) | Self::AllProvidersFailed | Self::Store { .. } => {
                FailureClass::Terminal
            }
        }
    }

    /// A short message suitable for the display sink.
    ///
    /// Individual provider failures are never surfaced to the user, so only
    /// the terminal variants get a specific message.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidSymbol(_) => "Please enter a stock symbol",
            Self::AllProvidersFailed => "Stock data unavailable",
            _ => "Failed to fetch stock data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_advances_chain() {
        let error = QuoteError::Timeout {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.failure_class(), FailureClass::NextProvider);
    }

    #[test]
    fn test_transport_advances_chain() {
        let error = QuoteError::Transport {
            provider: "YAHOO".to_string(),
            message: "connection reset".to_string(),
        };
        assert_eq!(error.failure_class(), FailureClass::NextProvider);
    }

    #[test]
    fn test_malformed_response_advances_chain() {
        let error = QuoteError::MalformedResponse {
            provider: "ALPHA_VANTAGE".to_string(),
            message: "missing Global Quote".to_string(),
        };
        assert_eq!(error.failure_class(), FailureClass::NextProvider);
    }

    #[test]
    fn test_rate_limited_advances_chain() {
        let error = QuoteError::RateLimited {
            provider: "IEX_CLOUD".to_string(),
        };
        assert_eq!(error.failure_class(), FailureClass::NextProvider);
    }

    #[test]
    fn test_validation_failure_advances_chain() {
        let error = QuoteError::ValidationFailed {
            message: "negative price".to_string(),
        };
        assert_eq!(error.failure_class(), FailureClass::NextProvider);
    }

    #[test]
    fn test_invalid_symbol_is_terminal() {
        let error = QuoteError::InvalidSymbol("".to_string());
        assert_eq!(error.failure_class(), FailureClass::Terminal);
    }

    #[test]
    fn test_all_providers_failed_is_terminal() {
        assert_eq!(
            QuoteError::AllProvidersFailed.failure_class(),
            FailureClass::Terminal
        );
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            QuoteError::InvalidSymbol("".to_string()).user_message(),
            "Please enter a stock symbol"
        );
        assert_eq!(
            QuoteError::AllProvidersFailed.user_message(),
            "Stock data unavailable"
        );
        assert_eq!(
            QuoteError::Timeout {
                provider: "YAHOO".to_string()
            }
            .user_message(),
            "Failed to fetch stock data"
        );
    }

    #[test]
    fn test_error_display() {
        let error = QuoteError::Transport {
            provider: "FMP".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert_eq!(format!("{}", error), "Transport error: FMP - HTTP 500");

        let error = QuoteError::RateLimited {
            provider: "ALPHA_VANTAGE".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: ALPHA_VANTAGE");
    }
}
