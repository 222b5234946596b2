//! Tenant resolution middleware and extractor

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use shared::ErrorCode;

use super::{Tenant, domain_from_host};
use crate::AppError;
use crate::core::ServerState;

/// Resolve the request tenant from the `Host` header
///
/// Falls back to the authority of an absolute request URI (HTTP/2). A
/// request without either is rejected with 400.
pub async fn resolve_tenant(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let tenant = tenant_from_parts(req.headers(), req.uri(), &state.config.manage_domain)?;
    tracing::trace!(domain = %tenant.domain, manage = tenant.scope.is_manage(), "Tenant resolved");
    req.extensions_mut().insert(tenant);
    Ok(next.run(req).await)
}

fn tenant_from_parts(
    headers: &http::HeaderMap,
    uri: &http::Uri,
    manage_domain: &str,
) -> Result<Tenant, AppError> {
    let host = headers
        .get(http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .and_then(domain_from_host)
        .or_else(|| uri.host().and_then(domain_from_host));

    match host {
        Some(domain) => Ok(Tenant::from_domain(&domain, manage_domain)),
        None => Err(AppError::new(ErrorCode::HostMissing)),
    }
}

impl FromRequestParts<ServerState> for Tenant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(tenant) = parts.extensions.get::<Tenant>() {
            return Ok(tenant.clone());
        }
        let tenant = tenant_from_parts(&parts.headers, &parts.uri, &state.config.manage_domain)?;
        parts.extensions.insert(tenant.clone());
        Ok(tenant)
    }
}
