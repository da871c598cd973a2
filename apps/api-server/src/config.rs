//! Application configuration loaded from environment variables.

use std::env;

use modgate_core::LimiterFailurePolicy;
use modgate_core::services::DEFAULT_MODEL;
use modgate_infra::{GeminiConfig, RateLimitConfig};

#[cfg(feature = "redis")]
use modgate_infra::{RedisConfig, RedisRateLimitConfig};

/// Configuration errors that prevent startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY must be set")]
    MissingApiKey,

    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gemini: GeminiConfig,
    pub model: String,
    pub rate_limit: RateLimitConfig,
    #[cfg(feature = "redis")]
    pub redis: Option<RedisRateLimitConfig>,
    pub limiter_failure: LimiterFailurePolicy,
    /// Include sanitized failure causes in 500 bodies.
    pub expose_error_details: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini = GeminiConfig::from_env().ok_or(ConfigError::MissingApiKey)?;

        let limiter_failure = match env::var("RATE_LIMIT_FAILURE_POLICY") {
            Ok(value) => value.parse().map_err(|e| ConfigError::Invalid {
                name: "RATE_LIMIT_FAILURE_POLICY",
                reason: format!("{}", e),
            })?,
            Err(_) => LimiterFailurePolicy::default(),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            gemini,
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            rate_limit: RateLimitConfig::from_env(),
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env().map(RedisRateLimitConfig::from_env),
            limiter_failure,
            expose_error_details: env::var("EXPOSE_ERROR_DETAILS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}
