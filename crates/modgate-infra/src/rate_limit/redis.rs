//! Redis rate limiter implementation using a sliding window counter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::{Client, Script};

use modgate_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

use super::{RateLimitConfig, window_index, window_reset};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Whether to fall back to the in-memory limiter if Redis is unavailable
    pub fallback_to_memory: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            fallback_to_memory: true,
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when `REDIS_URL` is not set.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("REDIS_URL").ok()?;
        Some(Self {
            url,
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            fallback_to_memory: std::env::var("REDIS_FALLBACK_TO_MEMORY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        })
    }
}

/// Redis rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RedisRateLimitConfig {
    /// Redis connection config
    pub redis: RedisConfig,
    /// Window size and permit count
    pub limit: RateLimitConfig,
    /// Key prefix for rate limit keys
    pub key_prefix: String,
}

impl RedisRateLimitConfig {
    pub fn from_env(redis: RedisConfig) -> Self {
        Self {
            redis,
            limit: RateLimitConfig::from_env(),
            key_prefix: std::env::var("RATE_LIMIT_KEY_PREFIX")
                .unwrap_or_else(|_| "modgate".to_string()),
        }
    }
}

/// Atomic sliding window check.
///
/// KEYS[1] current window, KEYS[2] previous window.
/// ARGV: max_requests, now_ms, window_ms.
/// Returns `{allowed, remaining}`.
const SLIDING_WINDOW_SCRIPT: &str = r#"
local current_key = KEYS[1]
local previous_key = KEYS[2]
local max_requests = tonumber(ARGV[1])
local now = tonumber(ARGV[2])
local window = tonumber(ARGV[3])

local current = tonumber(redis.call('GET', current_key) or '0')
local previous = tonumber(redis.call('GET', previous_key) or '0')

local elapsed = (now % window) / window
local used = current + math.floor((1 - elapsed) * previous)

if used >= max_requests then
    return {0, 0}
end

local updated = redis.call('INCR', current_key)
if updated == 1 then
    redis.call('PEXPIRE', current_key, window * 2 + 1000)
end

return {1, max_requests - used - 1}
"#;

/// Redis-backed rate limiter shared by every instance pointing at the same server.
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    config: RedisRateLimitConfig,
    script: Script,
}

impl RedisRateLimiter {
    pub async fn new(config: RedisRateLimitConfig) -> Result<Self, RateLimitError> {
        let client = Client::open(config.redis.url.as_str())
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.redis.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| RateLimitError::Backend("Connection timed out".to_string()))?
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        tracing::info!(url = %config.redis.url, "Connected to Redis rate limiter");

        Ok(Self {
            conn,
            config,
            script: Script::new(SLIDING_WINDOW_SCRIPT),
        })
    }

    fn window_key(&self, key: &str, index: i64) -> String {
        format!("{}:{}:{}", self.config.key_prefix, key, index)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let now_ms = Utc::now().timestamp_millis();
        let window_ms = self.config.limit.window_ms();
        let index = window_index(now_ms, window_ms);
        let mut conn = self.conn.clone();

        let result: Vec<i64> = self
            .script
            .key(self.window_key(key, index))
            .key(self.window_key(key, index - 1))
            .arg(self.config.limit.max_requests)
            .arg(now_ms)
            .arg(window_ms)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        let allowed = result.first().copied().unwrap_or(0) == 1;
        let remaining = result.get(1).copied().unwrap_or(0).max(0) as u32;

        Ok(RateLimitResult {
            allowed,
            remaining,
            reset_at: window_reset(now_ms, window_ms),
        })
    }
}
