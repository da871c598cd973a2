//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::Context;
use modgate_core::ModerationService;
use modgate_core::ports::{ContentClassifier, RateLimiter};
use modgate_infra::{GeminiClassifier, InMemoryRateLimiter};

#[cfg(feature = "redis")]
use modgate_infra::RedisRateLimiter;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub moderation: Arc<ModerationService>,
    pub expose_error_details: bool,
}

impl AppState {
    /// Build the application state with the configured backends.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let limiter = build_rate_limiter(config).await?;

        let classifier: Arc<dyn ContentClassifier> = Arc::new(
            GeminiClassifier::new(config.gemini.clone())
                .context("Failed to build Gemini client")?,
        );

        let moderation = ModerationService::new(limiter, classifier)
            .with_model(config.model.clone())
            .with_limiter_failure_policy(config.limiter_failure);

        tracing::info!(
            model = %config.model,
            limiter_failure = ?config.limiter_failure,
            expose_error_details = config.expose_error_details,
            "Application state initialized"
        );

        Ok(Self::from_service(
            moderation,
            config.expose_error_details,
        ))
    }

    pub fn from_service(moderation: ModerationService, expose_error_details: bool) -> Self {
        Self {
            moderation: Arc::new(moderation),
            expose_error_details,
        }
    }
}

#[cfg(feature = "redis")]
async fn build_rate_limiter(config: &AppConfig) -> anyhow::Result<Arc<dyn RateLimiter>> {
    let Some(redis_config) = config.redis.clone() else {
        tracing::warn!("REDIS_URL not set. Rate limits are per-process (in-memory mode).");
        return Ok(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())));
    };

    let fallback_to_memory = redis_config.redis.fallback_to_memory;
    match RedisRateLimiter::new(redis_config).await {
        Ok(limiter) => Ok(Arc::new(limiter)),
        Err(e) if fallback_to_memory => {
            tracing::error!(
                "Failed to connect to Redis: {}. Using in-memory rate limiter.",
                e
            );
            Ok(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())))
        }
        Err(e) => Err(anyhow::anyhow!(e).context("Failed to connect to Redis rate limiter")),
    }
}

#[cfg(not(feature = "redis"))]
async fn build_rate_limiter(config: &AppConfig) -> anyhow::Result<Arc<dyn RateLimiter>> {
    tracing::info!("Running without redis feature - using in-memory rate limiter");
    Ok(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())))
}
