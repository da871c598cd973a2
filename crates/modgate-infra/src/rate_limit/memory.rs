//! In-memory sliding window rate limiter.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use modgate_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

use super::{weighted_previous, window_index, window_reset};

/// Entries beyond this count trigger a sweep of stale keys.
const PRUNE_THRESHOLD: usize = 10_000;

/// Sliding window configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_requests),
            window: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        }
    }

    pub(crate) fn window_ms(&self) -> i64 {
        (self.window.as_millis() as i64).max(1)
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    index: i64,
    current: u32,
    previous: u32,
}

impl WindowCounter {
    /// Roll the counter forward so that `index` is the current window.
    fn advance(&mut self, index: i64) {
        if index == self.index {
            return;
        }
        self.previous = if index == self.index + 1 {
            self.current
        } else {
            0
        };
        self.current = 0;
        self.index = index;
    }
}

/// Per-key sliding window limiter held in process memory.
///
/// This is the fallback when Redis is not available.
/// Note: Limits are per-process, not distributed across instances.
pub struct InMemoryRateLimiter {
    counters: Mutex<HashMap<String, WindowCounter>>,
    config: RateLimitConfig,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(RateLimitConfig::from_env())
    }

    async fn check_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitResult {
        let now_ms = now.timestamp_millis();
        let window_ms = self.config.window_ms();
        let index = window_index(now_ms, window_ms);
        let reset_at = window_reset(now_ms, window_ms);

        let mut counters = self.counters.lock().await;

        if counters.len() > PRUNE_THRESHOLD {
            counters.retain(|_, c| c.index >= index - 1);
        }

        let counter = counters.entry(key.to_string()).or_insert(WindowCounter {
            index,
            current: 0,
            previous: 0,
        });
        counter.advance(index);

        let used = counter.current + weighted_previous(counter.previous, now_ms, window_ms);
        if used >= self.config.max_requests {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_at,
            };
        }

        counter.current += 1;

        RateLimitResult {
            allowed: true,
            remaining: self.config.max_requests - used - 1,
            reset_at,
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        Ok(self.check_at(key, Utc::now()).await)
    }
}
