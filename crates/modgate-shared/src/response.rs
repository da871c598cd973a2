//! JSON error body returned by every non-200 response.

use serde::{Deserialize, Serialize};

pub const METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
pub const INVALID_CONTENT: &str = "Invalid or overly long content.";
pub const RATE_LIMIT_EXCEEDED: &str = "Rate limit exceeded";
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please wait a moment before trying again.";
pub const SERVICE_UNAVAILABLE: &str = "Moderation service temporarily unavailable.";

/// Error payload: `{error, message?, resetAt?, details?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Short, stable description of the failure.
    pub error: String,

    /// Human-readable guidance for the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Local time of day at which a rate limit lifts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_at: Option<String>,

    /// Sanitized failure cause, only present when detail exposure is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            reset_at: None,
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_reset_at(mut self, reset_at: impl Into<String>) -> Self {
        self.reset_at = Some(reset_at.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn method_not_allowed() -> Self {
        Self::new(METHOD_NOT_ALLOWED)
    }

    pub fn invalid_content() -> Self {
        Self::new(INVALID_CONTENT)
    }

    pub fn rate_limited(reset_at: impl Into<String>) -> Self {
        Self::new(RATE_LIMIT_EXCEEDED)
            .with_message(RATE_LIMIT_MESSAGE)
            .with_reset_at(reset_at)
    }

    pub fn service_unavailable() -> Self {
        Self::new(SERVICE_UNAVAILABLE)
    }
}
