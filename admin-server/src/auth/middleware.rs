//! Authentication and role middleware

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{MatchedPath, Query, Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use shared::{ErrorCode, Role};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::tenancy::Tenant;

/// Largest JSON body buffered while looking for `access_token`
const MAX_TOKEN_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Routes reachable without a token, by method and route template
const PUBLIC_ROUTES: &[(&str, &str)] = &[
    ("GET", "/health"),
    ("POST", "/auth"),
    ("POST", "/auth/facebook"),
    ("POST", "/password-resets"),
    ("GET", "/password-resets/{token}"),
    ("PUT", "/password-resets/{token}"),
    // Basic credentials, checked by the handler's extractor
    ("PUT", "/users/{id}/password"),
];

pub fn is_public_route(method: &Method, matched_path: Option<&str>) -> bool {
    let Some(path) = matched_path else {
        return false;
    };
    PUBLIC_ROUTES
        .iter()
        .any(|(m, p)| *m == method.as_str() && *p == path)
}

/// Authentication middleware
///
/// Looks for a token in this order:
///
/// 1. `access_token` query parameter
/// 2. `access_token` field of a JSON body
/// 3. `Authorization: Bearer <token>`
///
/// The token subject must be a user visible in the request tenant. On
/// success [`CurrentUser`] is inserted into the request extensions.
///
/// | Failure | Status |
/// |---------|--------|
/// | no token | 401 NotAuthenticated |
/// | expired token | 401 TokenExpired |
/// | bad token / unknown user | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let matched = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned());
    if is_public_route(req.method(), matched.as_deref()) {
        return Ok(next.run(req).await);
    }

    let tenant = req
        .extensions()
        .get::<Tenant>()
        .cloned()
        .ok_or_else(|| AppError::new(ErrorCode::HostMissing))?;

    let (mut req, token) = extract_token(req).await?;
    let Some(token) = token else {
        security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
        return Err(AppError::unauthorized());
    };

    let user = authenticate(&state, &tenant, &token).await?;
    let user_id = AuthenticatedUserId(user.id.clone());
    req.extensions_mut().insert(user);

    let mut response = next.run(req).await;
    response.extensions_mut().insert(user_id);
    Ok(response)
}

/// Id of the authenticated caller, attached to the response for request
/// logging
#[derive(Debug, Clone)]
pub struct AuthenticatedUserId(pub String);

/// Validate `token` and load its user within `tenant`
pub async fn authenticate(
    state: &ServerState,
    tenant: &Tenant,
    token: &str,
) -> Result<CurrentUser, AppError> {
    let claims = match state.get_jwt_service().validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!("WARN", "auth_failed", error = format!("{}", e));
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    match state
        .users()
        .find_by_id_in(&claims.sub, &tenant.scope)
        .await?
    {
        Some(user) => Ok(CurrentUser::from(user)),
        None => {
            security_log!(
                "WARN",
                "auth_user_not_in_tenant",
                user_id = claims.sub.clone(),
                domain = tenant.domain.clone()
            );
            Err(AppError::invalid_token("Invalid token"))
        }
    }
}

async fn extract_token(req: Request) -> Result<(Request, Option<String>), AppError> {
    if let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(req.uri())
        && let Some(token) = params.get("access_token").filter(|t| !t.is_empty())
    {
        return Ok((req, Some(token.clone())));
    }

    let is_json = req
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    let (req, body_token) = if is_json {
        let (parts, body) = req.into_parts();
        let bytes = axum::body::to_bytes(body, MAX_TOKEN_BODY_BYTES)
            .await
            .map_err(|e| AppError::invalid_request(format!("Failed to read body: {e}")))?;
        let token = serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|v| v.get("access_token")?.as_str().map(String::from))
            .filter(|t| !t.is_empty());
        (Request::from_parts(parts, Body::from(bytes)), token)
    } else {
        (req, None)
    };
    if body_token.is_some() {
        return Ok((req, body_token));
    }

    let header_token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .map(String::from);
    Ok((req, header_token))
}

/// Role gate - the caller must hold one of `roles`
///
/// ```ignore
/// Router::new()
///     .route("/", get(handler::list))
///     .route_layer(middleware::from_fn(require_roles(&[Role::SuperAdmin])));
/// ```
///
/// Missing [`CurrentUser`] is a 401, a wrong role a 403.
pub fn require_roles(
    roles: &'static [Role],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_role(roles) {
                security_log!(
                    "WARN",
                    "role_not_allowed",
                    user_id = user.id.clone(),
                    user_role = user.role.to_string()
                );
                return Err(AppError::new(ErrorCode::RoleNotAllowed));
            }

            Ok(next.run(req).await)
        })
    }
}
