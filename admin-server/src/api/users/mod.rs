//! User API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::{ADMINS, SUPER_ADMIN, require_roles};
use crate::core::ServerState;

/// User router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/users", routes())
}

fn routes() -> Router<ServerState> {
    // Own account: any administrator
    let self_routes = Router::new()
        .route("/me", get(handler::me).put(handler::update_me))
        .route_layer(middleware::from_fn(require_roles(ADMINS)));

    // Account management: super_admin only
    let manage_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route_layer(middleware::from_fn(require_roles(SUPER_ADMIN)));

    // Password change: Basic credentials of the account itself
    let password_routes = Router::new().route("/{id}/password", put(handler::update_password));

    self_routes.merge(manage_routes).merge(password_routes)
}
