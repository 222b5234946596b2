//! Router assembly

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::auth::require_auth;
use crate::core::ServerState;
use crate::middleware::{logging_middleware, require_https};
use crate::tenancy::middleware::resolve_tenant;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(api::health::router())
        // Auth API - public sign-in
        .merge(api::auth::router())
        // Password resets - public
        .merge(api::password_resets::router())
        // User API - authentication required (password change uses Basic)
        .merge(api::users::router())
        // Sales channel API - administrators only
        .merge(api::sales_channels::router())
}

/// Build a fully configured application with all middleware and state
///
/// Used by the HTTP server and by the integration tests.
pub fn build_app(state: &ServerState) -> Router {
    let mut app = build_router()
        // Authentication - skips public routes, injects CurrentUser
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        // Request logging
        .layer(axum_middleware::from_fn(logging_middleware))
        // Tenant resolution - every request is scoped by its Host header
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            resolve_tenant,
        ))
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // HTTPS enforcement (production only)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_https,
        ));

    if state.config.is_development() || state.config.is_production() {
        app = app
            // Compression - Gzip compress responses
            .layer(CompressionLayer::new())
            // CORS - Handle cross-origin requests
            .layer(CorsLayer::permissive());
    }

    app.with_state(state.clone())
}
