//! HTTPS enforcement behind a TLS-terminating proxy

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::ErrorCode;

use crate::AppError;
use crate::core::ServerState;
use crate::security_log;

/// Reject plain-HTTP requests in production
///
/// The proxy reports the client scheme in `X-Forwarded-Proto`; anything but
/// `https` is a 403. Other environments pass everything through.
pub async fn require_https(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.config.is_production() || is_forwarded_https(req.headers()) {
        return Ok(next.run(req).await);
    }

    security_log!("WARN", "https_required", uri = format!("{:?}", req.uri()));
    Err(AppError::new(ErrorCode::HttpsRequired))
}

fn is_forwarded_https(headers: &http::HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}
