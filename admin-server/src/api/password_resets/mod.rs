//! Password Reset API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Password reset router - public
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/password-resets", post(handler::create))
        .route(
            "/password-resets/{token}",
            get(handler::get_by_token).put(handler::complete),
        )
}
