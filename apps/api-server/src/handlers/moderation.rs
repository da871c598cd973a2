//! Content moderation endpoint.

use actix_web::{HttpRequest, HttpResponse, web};
use futures::StreamExt;
use serde_json::Value;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const FORWARDED_FOR: &str = "x-forwarded-for";
const DEFAULT_CLIENT_IP: &str = "127.0.0.1";

/// Largest body read. Any valid payload, even one with every character
/// `\uXXXX`-escaped, fits well within it.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// POST /api/moderate-content
///
/// An unparsable or oversized body is treated like one without `userContent`.
pub async fn moderate_content(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Payload,
) -> AppResult<HttpResponse> {
    let ip = client_ip(&req);
    let payload: Option<Value> = read_capped(body, MAX_BODY_BYTES)
        .await
        .and_then(|bytes| serde_json::from_slice(&bytes).ok());

    let verdict = state
        .moderation
        .moderate(&ip, payload.as_ref())
        .await
        .map_err(|e| AppError::from_moderation(e, state.expose_error_details))?;

    Ok(HttpResponse::Ok().json(verdict))
}

/// Any other method on /api/moderate-content.
pub async fn method_not_allowed() -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed)
}

/// Collect the request body, giving up once it grows past `limit`.
async fn read_capped(mut payload: web::Payload, limit: usize) -> Option<web::BytesMut> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read request body");
                return None;
            }
        };
        if body.len() + chunk.len() > limit {
            tracing::debug!(limit, "Request body exceeds limit");
            return None;
        }
        body.extend_from_slice(&chunk);
    }
    Some(body)
}

/// First address in `X-Forwarded-For`, or loopback when there is none.
fn client_ip(req: &HttpRequest) -> String {
    req.headers()
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(DEFAULT_CLIENT_IP)
        .to_string()
}
