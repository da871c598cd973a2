//! Domain-level error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::ports::{ClassifierError, RateLimitError};

/// Domain errors - business rule failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Verdict rejected: {0}")]
    MalformedVerdict(String),
}

/// Terminal outcomes of the moderation pipeline other than a verdict.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Rate limit exceeded until {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Rate limiter unavailable: {0}")]
    LimiterUnavailable(#[from] RateLimitError),

    #[error(transparent)]
    InvalidContent(DomainError),

    #[error("Classifier call failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("No content returned from classifier")]
    EmptyOutput,

    #[error("Classifier output is not a verdict: {0}")]
    MalformedOutput(DomainError),
}

impl ModerationError {
    /// Whether this outcome is a server-side failure rather than a caller mistake.
    pub fn is_server_failure(&self) -> bool {
        !matches!(
            self,
            ModerationError::RateLimited { .. } | ModerationError::InvalidContent(_)
        )
    }
}
