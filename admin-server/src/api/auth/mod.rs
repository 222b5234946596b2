//! Auth API Module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Auth router - public sign-in endpoints
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/auth", post(handler::login))
        .route("/auth/facebook", post(handler::facebook_login))
}
