//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::require_restaurant;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};
use shared::models::Notification;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// List the calling restaurant's notifications (newest first)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Notification>>>> {
    let restaurant_id = require_restaurant(&user)?;
    let limit = query.limit.clamp(1, 200);
    let notifications = state
        .notifier
        .list(restaurant_id, query.unread_only, limit)
        .await?;
    Ok(ok(notifications))
}

/// Mark one notification as read
pub async fn mark_read(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Value>>> {
    let restaurant_id = require_restaurant(&user)?;
    state.notifier.mark_read(id, restaurant_id).await?;
    Ok(ok(json!({ "id": id })))
}

/// Mark all of the restaurant's notifications as read
pub async fn mark_all_read(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Value>>> {
    let restaurant_id = require_restaurant(&user)?;
    let marked = state.notifier.mark_all_read(restaurant_id).await?;
    Ok(ok(json!({ "marked": marked })))
}

/// Delete a notification
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Value>>> {
    let restaurant_id = require_restaurant(&user)?;
    state.notifier.delete(id, restaurant_id).await?;
    Ok(ok(json!({ "id": id })))
}
