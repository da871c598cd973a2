//! # Modgate Infrastructure
//!
//! Concrete implementations of the ports defined in `modgate-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external stores, in-memory rate limiting only
//! - `redis` - Redis-backed rate limiting shared across instances

pub mod classifier;
pub mod rate_limit;

// Re-exports - In-Memory / HTTP
pub use classifier::{GeminiClassifier, GeminiConfig};
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use rate_limit::{RedisConfig, RedisRateLimitConfig, RedisRateLimiter};
