//! Dashboard API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::api::require_restaurant;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders;
use crate::utils::{AppResponse, AppResult, ok};
use shared::models::{DashboardStats, StatusCounts};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// YYYY-MM-DD (UTC); defaults to the current day
    pub date: Option<String>,
}

/// Order counts by status (all time, zero-filled)
pub async fn status_counts(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<StatusCounts>>> {
    let restaurant_id = require_restaurant(&user)?;
    let counts = orders::status_counts(&state, restaurant_id).await?;
    Ok(ok(counts))
}

/// Single-day dashboard aggregates
pub async fn stats(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<AppResponse<DashboardStats>>> {
    let restaurant_id = require_restaurant(&user)?;
    let stats = orders::dashboard_stats(&state, restaurant_id, query.date.as_deref()).await?;
    Ok(ok(stats))
}
