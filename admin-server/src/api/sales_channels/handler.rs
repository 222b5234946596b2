//! Sales Channel API Handlers
//!
//! A super_admin manages every channel. A store_admin only sees and edits
//! the channels it owns, and cannot hand one over to another user.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use shared::{ErrorCode, Role};
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{SalesChannel, SalesChannelDraft, SalesChannelView};
use crate::security_log;
use crate::utils::json::{deep_merge, project, strip_keys};
use crate::utils::query::SortField;
use crate::utils::{AppError, AppJson, AppResult, ListQuery};

const SORTABLE: &[SortField] = &[
    ("name", "name"),
    ("domain", "domain"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

const READ_ONLY_KEYS: &[&str] = &["id", "createdAt", "updatedAt", "access_token"];

fn channel_not_found(id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::SalesChannelNotFound,
        format!("Sales channel {} not found", id),
    )
}

fn not_owner(current: &CurrentUser, target: &str) -> AppError {
    security_log!(
        "WARN",
        "sales_channel_access_denied",
        user_id = current.id.clone(),
        target = target.to_string()
    );
    AppError::new(ErrorCode::NotOwner)
}

/// Load a channel the caller may act on
async fn load_owned(state: &ServerState, current: &CurrentUser, id: &str) -> AppResult<SalesChannel> {
    let channel = state
        .sales_channels()
        .find_by_id(id)
        .await?
        .ok_or_else(|| channel_not_found(id))?;
    if !current.is_super_admin() && !channel.is_owned_by(&current.user.id) {
        return Err(not_owner(current, id));
    }
    Ok(channel)
}

/// Owners must be existing store admins
async fn ensure_owner(state: &ServerState, owner: &RecordId) -> AppResult<()> {
    match state.users().find_by_record(owner).await? {
        Some(user) if user.role == Role::StoreAdmin => Ok(()),
        _ => Err(AppError::for_field(
            ErrorCode::InvalidOwner,
            "owner",
            "owner must be an existing store_admin",
        )),
    }
}

/// A store_admin can only name itself as owner
fn ensure_may_assign(current: &CurrentUser, owner: &RecordId) -> AppResult<()> {
    if current.is_super_admin() || owner == &current.user.id {
        Ok(())
    } else {
        Err(not_owner(current, &owner.to_string()))
    }
}

/// List channels visible to the caller
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Value>>> {
    let opts = query.parse(SORTABLE)?;
    let repo = state.sales_channels();
    let channels = if current.is_super_admin() {
        repo.find_all(&opts.order_by).await?
    } else {
        repo.find_by_owner(&current.user.id, &opts.order_by).await?
    };

    let matching: Vec<SalesChannel> = channels
        .into_iter()
        .filter(|c| opts.matches(&[&c.name, &c.domain]))
        .collect();

    let views = opts
        .paginate(matching)
        .iter()
        .map(|c| {
            serde_json::to_value(c.view())
                .map(|v| project(v, &opts.fields))
                .map_err(|e| AppError::internal(format!("Failed to render sales channel: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(views))
}

/// Get channel by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<SalesChannelView>> {
    let channel = load_owned(&state, &current, &id).await?;
    Ok(Json(channel.view()))
}

/// Create a channel
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    AppJson(mut payload): AppJson<Value>,
) -> AppResult<(StatusCode, Json<SalesChannelView>)> {
    strip_keys(&mut payload, READ_ONLY_KEYS);
    let draft = SalesChannelDraft::from_json(&payload)?;
    ensure_may_assign(&current, &draft.owner)?;
    ensure_owner(&state, &draft.owner).await?;

    let channel = state.sales_channels().create(draft).await?;
    tracing::info!(
        channel_id = %channel.id,
        domain = %channel.domain,
        owner = %channel.owner,
        "Sales channel created"
    );
    Ok((StatusCode::CREATED, Json(channel.view())))
}

/// Update a channel; its type is fixed at creation
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
    AppJson(mut payload): AppJson<Value>,
) -> AppResult<Json<SalesChannelView>> {
    let existing = load_owned(&state, &current, &id).await?;

    if !payload.is_object() {
        return Err(AppError::validation("Request body must be a JSON object"));
    }
    if let Some(kind) = payload.get("type")
        && kind.as_str() != Some(existing.channel_type.as_str())
    {
        return Err(AppError::new(ErrorCode::SalesChannelTypeImmutable));
    }
    strip_keys(&mut payload, READ_ONLY_KEYS);

    let mut doc = existing.editable_json();
    deep_merge(&mut doc, &payload);
    let draft = SalesChannelDraft::from_json(&doc)?;

    ensure_may_assign(&current, &draft.owner)?;
    if draft.owner != existing.owner {
        ensure_owner(&state, &draft.owner).await?;
    }

    let channel = state.sales_channels().update(&existing.id, draft).await?;
    tracing::info!(channel_id = %channel.id, "Sales channel updated");
    Ok(Json(channel.view()))
}

/// Delete a channel
///
/// Customers bound to it are left in place.
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let channel = load_owned(&state, &current, &id).await?;
    if !state.sales_channels().delete(&channel.id).await? {
        return Err(channel_not_found(&id));
    }
    tracing::info!(channel_id = %channel.id, domain = %channel.domain, "Sales channel deleted");
    Ok(StatusCode::NO_CONTENT)
}
