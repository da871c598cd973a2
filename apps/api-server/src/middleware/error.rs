//! Error handling - maps pipeline failures to JSON error responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::{DateTime, Local, Utc};
use modgate_core::ModerationError;
use modgate_shared::ErrorResponse;
use std::fmt;

/// Longest `details` string ever sent to a caller.
const MAX_DETAILS_LENGTH: usize = 200;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    MethodNotAllowed,
    BadRequest(String),
    RateLimited { reset_at: DateTime<Utc> },
    /// Any server-side failure. `cause` is logged, and only echoed back
    /// (sanitized) when `expose_details` is set.
    Unavailable { cause: String, expose_details: bool },
}

impl AppError {
    /// Convert a pipeline failure, honoring the detail exposure setting.
    pub fn from_moderation(err: ModerationError, expose_details: bool) -> Self {
        match err {
            ModerationError::RateLimited { reset_at } => AppError::RateLimited { reset_at },
            ModerationError::InvalidContent(e) => AppError::BadRequest(e.to_string()),
            other => AppError::Unavailable {
                cause: other.to_string(),
                expose_details,
            },
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::RateLimited { reset_at } => write!(f, "Rate limited until {}", reset_at),
            AppError::Unavailable { cause, .. } => write!(f, "Service unavailable: {}", cause),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::MethodNotAllowed => {
                HttpResponse::MethodNotAllowed().json(ErrorResponse::method_not_allowed())
            }
            AppError::BadRequest(reason) => {
                tracing::debug!(%reason, "Rejected moderation payload");
                HttpResponse::BadRequest().json(ErrorResponse::invalid_content())
            }
            AppError::RateLimited { reset_at } => {
                let retry_after = (*reset_at - Utc::now()).num_seconds().max(1);
                HttpResponse::TooManyRequests()
                    .insert_header(("X-RateLimit-Remaining", "0"))
                    .insert_header(("Retry-After", retry_after.to_string()))
                    .json(ErrorResponse::rate_limited(format_reset_time(reset_at)))
            }
            AppError::Unavailable {
                cause,
                expose_details,
            } => {
                tracing::error!(error = %cause, "Moderation failure");
                let mut error = ErrorResponse::service_unavailable();
                if *expose_details {
                    error = error.with_details(sanitize_details(cause));
                }
                HttpResponse::InternalServerError().json(error)
            }
        }
    }
}

/// Render a reset timestamp as a server-local `HH:MM:SS` time of day.
pub fn format_reset_time(reset_at: &DateTime<Utc>) -> String {
    reset_at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Strip control characters and cap the length of a failure cause.
pub fn sanitize_details(cause: &str) -> String {
    let cleaned: String = cause
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if cleaned.chars().count() <= MAX_DETAILS_LENGTH {
        return cleaned;
    }

    let mut truncated: String = cleaned.chars().take(MAX_DETAILS_LENGTH).collect();
    truncated.push_str("...");
    truncated
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
