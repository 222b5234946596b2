//! Auth API Handlers

use axum::{Json, extract::State, http::StatusCode, http::header::AUTHORIZATION, http::HeaderMap};
use serde::Serialize;
use serde_json::{Value, json};
use shared::{ErrorCode, Role};

use crate::auth::{JwtService, PasswordAuth};
use crate::core::ServerState;
use crate::db::models::{User, UserDraft, UserView};
use crate::security_log;
use crate::services::{FacebookError, FacebookProfile};
use crate::tenancy::{Tenant, TenantScope};
use crate::utils::json::deep_merge;
use crate::utils::token::random_alphanumeric;
use crate::utils::{AppError, AppResult};

/// Length of the random password given to Facebook-created accounts
const GENERATED_PASSWORD_LEN: usize = 16;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

fn issue_token(state: &ServerState, user: &User) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    let token = state
        .get_jwt_service()
        .generate_token(&user.id.to_string())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            user: user.view(),
        }),
    ))
}

/// Sign in with HTTP Basic credentials
pub async fn login(
    State(state): State<ServerState>,
    tenant: Tenant,
    PasswordAuth(user): PasswordAuth,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        domain = %tenant.domain,
        "User logged in successfully"
    );
    issue_token(&state, &user)
}

/// Sign in on a storefront with a Facebook access token
///
/// Links to an existing customer by Facebook id or email, otherwise
/// registers a new customer bound to the storefront's sales channel.
pub async fn facebook_login(
    State(state): State<ServerState>,
    tenant: Tenant,
    headers: HeaderMap,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    let access_token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .map(String::from)
        .ok_or_else(AppError::unauthorized)?;

    if let TenantScope::Manage = tenant.scope {
        return Err(AppError::new(ErrorCode::StorefrontRequired));
    }
    let channel = state
        .sales_channels()
        .find_storefront(&tenant.domain)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::DomainNotFound,
                format!("No storefront is served on {}", tenant.domain),
            )
        })?;

    let profile = state
        .facebook
        .get_user(&access_token)
        .await
        .map_err(|e| {
            security_log!(
                "WARN",
                "facebook_auth_failed",
                domain = tenant.domain.clone(),
                error = e.to_string()
            );
            match e {
                FacebookError::Rejected(msg) => {
                    AppError::with_message(ErrorCode::ExternalAuthFailed, msg)
                }
                FacebookError::Transport(msg) => {
                    AppError::with_message(ErrorCode::ExternalServiceError, msg)
                }
            }
        })?;

    let existing = state
        .users()
        .find_by_facebook_in(&profile.id, profile.email.as_deref(), &tenant.scope)
        .await?;

    let user = match existing {
        Some(user) => {
            let mut doc = user.editable_json();
            deep_merge(&mut doc, &facebook_patch(&profile));
            let draft = UserDraft::from_json(&doc, false)?;
            state.users().update(&user.id, draft).await?
        }
        None => {
            let mut doc = facebook_patch(&profile);
            deep_merge(
                &mut doc,
                &json!({
                    "email": profile.email.clone().unwrap_or_default(),
                    "password": random_alphanumeric(GENERATED_PASSWORD_LEN),
                    "role": Role::Customer,
                    "salesChannel": channel.id.to_string(),
                }),
            );
            let draft = UserDraft::from_json(&doc, true)?;
            let user = state.users().create(draft).await?;
            tracing::info!(user_id = %user.id, domain = %tenant.domain, "Customer registered via Facebook");
            user
        }
    };

    security_log!(
        "INFO",
        "facebook_login",
        user_id = user.id.to_string(),
        domain = tenant.domain.clone()
    );
    issue_token(&state, &user)
}

/// Profile fields and identity link taken from Facebook
fn facebook_patch(profile: &FacebookProfile) -> Value {
    let mut patch = json!({
        "profile": {},
        "services": { "facebook": profile.id },
    });
    if let Some(first_name) = &profile.first_name {
        patch["profile"]["firstName"] = json!(first_name);
    }
    if let Some(last_name) = &profile.last_name {
        patch["profile"]["lastName"] = json!(last_name);
    }
    if let Some(picture) = profile.picture_url() {
        patch["profile"]["picture"] = json!(picture);
    }
    patch
}
