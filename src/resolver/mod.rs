//! Quote resolution orchestration.
//!
//! This module contains:
//! - [`QuoteResolver`] - the cache-first sequential fallback chain
//! - [`QuoteValidator`] - payload validation between provider and cache
//! - [`RateLimiter`] - per-provider request shaping

mod quote_resolver;
mod rate_limiter;
mod validator;

pub use quote_resolver::{normalize_symbol, QuoteResolver, ResolverConfig};
pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use validator::{QuoteValidator, ValidationSeverity, ValidatorConfig};
