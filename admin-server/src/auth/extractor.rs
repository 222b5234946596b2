//! Auth extractors
//!
//! - [`CurrentUser`] - caller authenticated by [`require_auth`](super::require_auth),
//!   or by a bearer token when the middleware did not run
//! - [`PasswordAuth`] - caller authenticated by HTTP Basic credentials

use axum::{extract::FromRequestParts, http::request::Parts};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shared::FieldErrors;

use crate::AppError;
use crate::auth::middleware::authenticate;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::models::User;
use crate::security_log;
use crate::tenancy::Tenant;
use crate::utils::validation::{check_password, is_valid_email, normalize_email};

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by the middleware
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_from_header)
            .map(String::from);
        let Some(token) = token else {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
            return Err(AppError::unauthorized());
        };

        let tenant = Tenant::from_request_parts(parts, state).await?;
        let user = authenticate(state, &tenant, &token).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// User signed in with `Authorization: Basic base64(email:password)`
///
/// | Failure | Status |
/// |---------|--------|
/// | header missing or malformed | 401 |
/// | email/password fail validation | 400 with field errors |
/// | unknown user in tenant, wrong password | 401 InvalidCredentials |
#[derive(Debug, Clone)]
pub struct PasswordAuth(pub User);

/// Decode the `email:password` pair of a Basic header
pub fn parse_basic_credentials(header: &str) -> Option<(String, String)> {
    let encoded = header
        .strip_prefix("Basic ")
        .or_else(|| header.strip_prefix("basic "))?
        .trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

impl FromRequestParts<ServerState> for PasswordAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let credentials = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_basic_credentials);
        let Some((email, password)) = credentials else {
            security_log!("WARN", "basic_auth_missing", uri = format!("{:?}", parts.uri));
            return Err(AppError::unauthorized());
        };

        let email = normalize_email(&email);
        let mut errors = FieldErrors::new();
        if !is_valid_email(&email) {
            errors.add("email", "email is not a valid email address");
        }
        check_password(&mut errors, "password", &password);
        if !errors.is_empty() {
            return Err(AppError::invalid_fields(errors));
        }

        let tenant = Tenant::from_request_parts(parts, state).await?;
        let user = state
            .users()
            .find_by_email_in(&email, &tenant.scope)
            .await?;

        let Some(user) = user else {
            security_log!(
                "WARN",
                "login_unknown_user",
                email = email.clone(),
                domain = tenant.domain.clone()
            );
            return Err(AppError::invalid_credentials());
        };

        let verified = user
            .verify_password(&password)
            .map_err(|e| AppError::internal(format!("Password hash unreadable: {e}")))?;
        if !verified {
            security_log!("WARN", "login_wrong_password", user_id = user.id.to_string());
            return Err(AppError::invalid_credentials());
        }

        Ok(PasswordAuth(user))
    }
}
