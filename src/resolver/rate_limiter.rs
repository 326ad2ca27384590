//! Token bucket rate limiter for quote providers.
//!
//! Per-provider buckets with configurable refill rate. This shapes outgoing
//! request rate only; it holds no failure state, so a provider that was
//! rate-limited upstream is still re-tried by the next resolution.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

/// Default requests per minute, matching the dashboard's shipped limit.
const DEFAULT_REQUESTS_PER_MINUTE: f64 = 10.0;

/// Default bucket capacity (allows short bursts).
const DEFAULT_BUCKET_CAPACITY: f64 = 5.0;

/// Token bucket for a single provider.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
    /// Refill rate in tokens per second.
    rate: f64,
    capacity: f64,
}

impl TokenBucket {
    fn new(requests_per_minute: f64, capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: requests_per_minute / 60.0,
            capacity,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    fn try_acquire(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn time_until_available(&mut self) -> Duration {
        self.refill();
        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.rate)
        }
    }
}

/// Rate limit configuration for a provider bucket.
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub burst_capacity: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE as u32,
            burst_capacity: DEFAULT_BUCKET_CAPACITY,
        }
    }
}

/// Per-provider token bucket rate limiter.
///
/// Buckets are created on demand with default settings, or pre-configured
/// via [`configure`](Self::configure).
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    configs: Mutex<HashMap<String, RateLimitConfig>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            configs: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the buckets mutex, recovering from poison if necessary.
    ///
    /// Recovering risks slightly incorrect rate limiting, which beats
    /// panicking mid-resolution.
    fn lock_buckets(&self) -> MutexGuard<'_, HashMap<String, TokenBucket>> {
        self.buckets.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter buckets mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_configs(&self) -> MutexGuard<'_, HashMap<String, RateLimitConfig>> {
        self.configs.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter configs mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Configure the bucket for a provider. Resets any existing bucket.
    pub fn configure(&self, provider: &str, config: RateLimitConfig) {
        self.lock_configs().insert(provider.to_string(), config);
        self.lock_buckets().remove(provider);
    }

    /// Acquire a token for the given provider, waiting asynchronously until
    /// one is available.
    pub async fn acquire(&self, provider: &str) {
        loop {
            let wait_time = {
                let mut buckets = self.lock_buckets();
                let bucket = buckets
                    .entry(provider.to_string())
                    .or_insert_with(|| self.create_bucket(provider));

                if bucket.try_acquire() {
                    debug!("Rate limiter: acquired token for '{}'", provider);
                    return;
                }
                bucket.time_until_available()
            };

            if wait_time > Duration::ZERO {
                debug!(
                    "Rate limiter: waiting {:?} for provider '{}'",
                    wait_time, provider
                );
                tokio::time::sleep(wait_time).await;
            }
        }
    }

    /// Try to acquire a token without waiting.
    pub fn try_acquire(&self, provider: &str) -> bool {
        let mut buckets = self.lock_buckets();
        let bucket = buckets
            .entry(provider.to_string())
            .or_insert_with(|| self.create_bucket(provider));
        bucket.try_acquire()
    }

    fn create_bucket(&self, provider: &str) -> TokenBucket {
        let configs = self.lock_configs();
        match configs.get(provider) {
            Some(config) => TokenBucket::new(
                config.requests_per_minute as f64,
                config.burst_capacity,
            ),
            None => TokenBucket::new(DEFAULT_REQUESTS_PER_MINUTE, DEFAULT_BUCKET_CAPACITY),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_exhausts_at_capacity() {
        let mut bucket = TokenBucket::new(10.0, DEFAULT_BUCKET_CAPACITY);
        for _ in 0..DEFAULT_BUCKET_CAPACITY as usize {
            assert!(bucket.try_acquire());
        }
        assert!(!bucket.try_acquire());
    }

    #[test]
    fn test_time_until_available_when_empty() {
        let mut bucket = TokenBucket::new(60.0, 1.0);
        assert!(bucket.try_acquire());
        let wait = bucket.time_until_available();
        // 60/min = 1 token/sec; close to a full second after draining
        assert!(wait > Duration::from_millis(500));
        assert!(wait <= Duration::from_secs(1));
    }

    #[test]
    fn test_try_acquire_per_provider_isolation() {
        let limiter = RateLimiter::new();
        limiter.configure(
            "A",
            RateLimitConfig {
                requests_per_minute: 10,
                burst_capacity: 1.0,
            },
        );

        assert!(limiter.try_acquire("A"));
        assert!(!limiter.try_acquire("A"));
        // Provider B has its own bucket
        assert!(limiter.try_acquire("B"));
    }

    #[tokio::test]
    async fn test_acquire_returns_immediately_with_tokens() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        limiter.acquire("YAHOO").await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
