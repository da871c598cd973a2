//! Rate limiting implementations.
//!
//! Both backends use a sliding window counter: the count of the current
//! fixed window plus the previous window's count weighted by how much of it
//! still overlaps the trailing interval.

mod memory;

pub use memory::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisRateLimitConfig, RedisRateLimiter};

use chrono::{DateTime, Utc};

/// Index of the fixed window containing `now_ms`.
pub(crate) fn window_index(now_ms: i64, window_ms: i64) -> i64 {
    now_ms.div_euclid(window_ms)
}

/// Previous window's count scaled by its remaining overlap, rounded down.
pub(crate) fn weighted_previous(previous: u32, now_ms: i64, window_ms: i64) -> u32 {
    let elapsed = now_ms.rem_euclid(window_ms) as f64 / window_ms as f64;
    (previous as f64 * (1.0 - elapsed)).floor() as u32
}

/// End of the window containing `now_ms`.
pub(crate) fn window_reset(now_ms: i64, window_ms: i64) -> DateTime<Utc> {
    let reset_ms = (window_index(now_ms, window_ms) + 1) * window_ms;
    DateTime::from_timestamp_millis(reset_ms).unwrap_or_else(Utc::now)
}
