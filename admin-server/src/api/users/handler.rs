//! User API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use shared::{ErrorCode, FieldErrors};

use crate::auth::{CurrentUser, PasswordAuth};
use crate::core::ServerState;
use crate::db::models::{User, UserDraft, UserView};
use crate::security_log;
use crate::utils::json::{deep_merge, project, strip_keys};
use crate::utils::query::SortField;
use crate::utils::validation::check_password;
use crate::utils::{AppError, AppJson, AppResult, ListQuery};

const SORTABLE: &[SortField] = &[
    ("email", "email"),
    ("role", "role"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("firstName", "profile.firstName"),
    ("lastName", "profile.lastName"),
];

/// Keys a payload may carry but never writes
const READ_ONLY_KEYS: &[&str] = &["id", "createdAt", "updatedAt", "access_token"];

fn user_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {} not found", id))
}

/// List users (super_admin)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Value>>> {
    let opts = query.parse(SORTABLE)?;
    let users = state.users().find_all(&opts.order_by).await?;

    let matching: Vec<User> = users
        .into_iter()
        .filter(|u| opts.matches(&[&u.email, &u.profile.first_name, &u.profile.last_name]))
        .collect();

    let views = opts
        .paginate(matching)
        .iter()
        .map(|u| view_json(u.view(), &opts.fields))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(views))
}

fn view_json(view: UserView, fields: &[String]) -> AppResult<Value> {
    let value = serde_json::to_value(view)
        .map_err(|e| AppError::internal(format!("Failed to render user: {e}")))?;
    Ok(project(value, fields))
}

/// The caller's own account
pub async fn me(current: CurrentUser) -> Json<UserView> {
    Json(current.user.view())
}

/// Get user by id (super_admin)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserView>> {
    let user = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| user_not_found(&id))?;
    Ok(Json(user.view()))
}

/// Create a user (super_admin)
pub async fn create(
    State(state): State<ServerState>,
    AppJson(mut payload): AppJson<Value>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    strip_keys(&mut payload, READ_ONLY_KEYS);
    let draft = UserDraft::from_json(&payload, true)?;
    ensure_sales_channel(&state, &draft).await?;

    let user = state.users().create(draft).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user.view())))
}

/// Update the caller's own account; the role cannot change
pub async fn update_me(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Json<UserView>> {
    if let Some(role) = payload.get("role")
        && role.as_str() != Some(current.role.as_str())
    {
        security_log!(
            "WARN",
            "self_role_change",
            user_id = current.id.clone(),
            requested = role.to_string()
        );
        return Err(AppError::new(ErrorCode::CannotChangeOwnRole));
    }

    let user = apply_update(&state, &current.user, payload).await?;
    Ok(Json(user.view()))
}

/// Update any user (super_admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<Value>,
) -> AppResult<Json<UserView>> {
    let existing = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| user_not_found(&id))?;
    let user = apply_update(&state, &existing, payload).await?;
    Ok(Json(user.view()))
}

/// Deep-merge `payload` into `existing`, revalidate and save
async fn apply_update(state: &ServerState, existing: &User, mut payload: Value) -> AppResult<User> {
    if !payload.is_object() {
        return Err(AppError::validation("Request body must be a JSON object"));
    }
    strip_keys(&mut payload, READ_ONLY_KEYS);

    let mut doc = existing.editable_json();
    deep_merge(&mut doc, &payload);

    let draft = UserDraft::from_json(&doc, false)?;
    ensure_sales_channel(state, &draft).await?;

    let user = state.users().update(&existing.id, draft).await?;
    tracing::info!(user_id = %user.id, "User updated");
    Ok(user)
}

/// A referenced sales channel must exist
async fn ensure_sales_channel(state: &ServerState, draft: &UserDraft) -> AppResult<()> {
    if let Some(channel) = &draft.sales_channel
        && state.sales_channels().find_by_record(channel).await?.is_none()
    {
        let mut errors = FieldErrors::new();
        errors.add("salesChannel", "sales channel not found");
        return Err(AppError::invalid_fields(errors));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct PasswordPayload {
    #[serde(default)]
    pub password: Option<String>,
}

/// Change the password of the Basic-authenticated account
///
/// `id` must name an existing user (404) and that user must be the caller
/// (403). `me` names the caller.
pub async fn update_password(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    PasswordAuth(user): PasswordAuth,
    AppJson(payload): AppJson<PasswordPayload>,
) -> AppResult<Json<UserView>> {
    let target = if id == "me" {
        user.id.clone()
    } else {
        state
            .users()
            .find_by_id(&id)
            .await?
            .ok_or_else(|| user_not_found(&id))?
            .id
    };
    if target != user.id {
        security_log!(
            "WARN",
            "password_change_other_user",
            user_id = user.id.to_string(),
            target = id.clone()
        );
        return Err(AppError::forbidden("You can only change your own password"));
    }

    let mut errors = FieldErrors::new();
    match payload.password.as_deref() {
        Some(password) => check_password(&mut errors, "password", password),
        None => errors.add("password", "password is required"),
    }
    if !errors.is_empty() {
        return Err(AppError::invalid_fields(errors));
    }

    let password = payload.password.unwrap_or_default();
    let updated = state.users().set_password(&user.id, &password).await?;
    tracing::info!(user_id = %updated.id, "Password changed");
    Ok(Json(updated.view()))
}

/// Delete a user (super_admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if state.users().delete(&id).await? {
        tracing::info!(user_id = %id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(user_not_found(&id))
    }
}
