//! Password Reset API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::{ErrorCode, FieldErrors};

use crate::core::ServerState;
use crate::db::models::{PasswordReset, PasswordResetView, User, UserView};
use crate::security_log;
use crate::services::{Mail, MailError};
use crate::tenancy::Tenant;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_URL_LEN, check_password, is_http_url, is_valid_email, normalize_email,
};
use crate::utils::{AppError, AppJson, AppResult};

const RESET_SUBJECT: &str = "api - Password Reset";

#[derive(Debug, Deserialize)]
pub struct CreateResetPayload {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteResetPayload {
    #[serde(default)]
    pub password: Option<String>,
}

fn token_not_found() -> AppError {
    AppError::new(ErrorCode::ResetTokenNotFound)
}

/// Start a reset: store a token and mail the link to the user
///
/// Responds with the mail provider's status and an empty body.
pub async fn create(
    State(state): State<ServerState>,
    tenant: Tenant,
    AppJson(payload): AppJson<CreateResetPayload>,
) -> AppResult<StatusCode> {
    let mut errors = FieldErrors::new();
    let email = normalize_email(payload.email.as_deref().unwrap_or_default());
    if email.is_empty() {
        errors.add("email", "email is required");
    } else if email.len() > MAX_EMAIL_LEN || !is_valid_email(&email) {
        errors.add("email", "email is not a valid email address");
    }
    let link = payload.link.as_deref().unwrap_or_default().trim();
    if link.is_empty() {
        errors.add("link", "link is required");
    } else if link.len() > MAX_URL_LEN || !is_http_url(link) {
        errors.add("link", "link must be an http(s) URL");
    }
    errors.into_result()?;

    let user = state
        .users()
        .find_by_email_in(&email, &tenant.scope)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let reset = state
        .password_resets()
        .create(&user.id, state.config.password_reset_ttl_secs)
        .await?;

    let mail = Mail::html(&user.email, RESET_SUBJECT, reset_mail_body(&user, link, &reset));
    let status = state.mailer.send_mail(mail).await.map_err(|e| {
        tracing::error!(user_id = %user.id, error = %e, "Password reset mail failed");
        mail_error(e)
    })?;

    security_log!(
        "INFO",
        "password_reset_requested",
        user_id = user.id.to_string(),
        domain = tenant.domain.clone()
    );
    Ok(StatusCode::from_u16(status).unwrap_or(StatusCode::ACCEPTED))
}

fn mail_error(err: MailError) -> AppError {
    AppError::with_message(ErrorCode::MailDeliveryFailed, err.to_string())
}

fn reset_mail_body(user: &User, link: &str, reset: &PasswordReset) -> String {
    let url = format!("{}/{}", link.trim_end_matches('/'), reset.token);
    format!(
        "<p>Hey, {name}.</p>\
         <p>You requested a new password for your account.</p>\
         <p>Please use the following link to set a new password. It will expire in 1 hour.</p>\
         <p><a href=\"{url}\">{url}</a></p>",
        name = escape_html(&user.profile.first_name),
        url = escape_html(&url),
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Valid reset and its user, as visible on this tenant
async fn load_reset(state: &ServerState, tenant: &Tenant, token: &str) -> AppResult<(PasswordReset, User)> {
    let reset = state
        .password_resets()
        .find_valid(token)
        .await?
        .ok_or_else(token_not_found)?;
    let user = state
        .users()
        .find_by_id_in(&reset.user.to_string(), &tenant.scope)
        .await?
        .ok_or_else(token_not_found)?;
    Ok((reset, user))
}

/// Look up a pending reset
pub async fn get_by_token(
    State(state): State<ServerState>,
    tenant: Tenant,
    Path(token): Path<String>,
) -> AppResult<Json<PasswordResetView>> {
    let (reset, user) = load_reset(&state, &tenant, &token).await?;
    Ok(Json(PasswordResetView {
        user: user.view(),
        token: reset.token,
    }))
}

/// Set a new password and drop every reset of the user
pub async fn complete(
    State(state): State<ServerState>,
    tenant: Tenant,
    Path(token): Path<String>,
    AppJson(payload): AppJson<CompleteResetPayload>,
) -> AppResult<Json<UserView>> {
    let mut errors = FieldErrors::new();
    let password = payload.password.unwrap_or_default();
    if password.is_empty() {
        errors.add("password", "password is required");
    } else {
        check_password(&mut errors, "password", &password);
    }
    errors.into_result()?;

    let (_, user) = load_reset(&state, &tenant, &token).await?;

    let updated = state.users().set_password(&user.id, &password).await?;
    state.password_resets().delete_for_user(&user.id).await?;

    security_log!(
        "INFO",
        "password_reset_completed",
        user_id = updated.id.to_string()
    );
    Ok(Json(updated.view()))
}
