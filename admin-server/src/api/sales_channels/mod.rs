//! Sales Channel API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{ADMINS, require_roles};
use crate::core::ServerState;

/// Sales channel router - administrators only
pub fn router() -> Router<ServerState> {
    Router::new().nest("/sales-channels", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route_layer(middleware::from_fn(require_roles(ADMINS)))
}
