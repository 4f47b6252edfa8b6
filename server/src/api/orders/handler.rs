//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::extract::AppJson;
use crate::api::{require_customer, require_restaurant};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::{self, OrderListQuery};
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};
use shared::models::{Order, OrderCreate, OrderDetail, OrderPage, StatusUpdate};

/// Place a new order (checkout)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<OrderCreate>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let customer_id = require_customer(&user)?;
    let detail = orders::place_order(&state, customer_id, payload).await?;
    Ok(ok(detail))
}

/// Get order by id (owner customer/restaurant, or admin)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let detail = orders::get_order(&state, &user, id).await?;
    Ok(ok(detail))
}

/// Apply a status transition
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<StatusUpdate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = orders::transition_status(&state, &user, id, payload.status).await?;
    Ok(ok(order))
}

/// Cancel an order (transition alias)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = orders::cancel_order(&state, &user, id).await?;
    Ok(ok_with_message(order, "Order cancelled"))
}

/// List the calling restaurant's orders (filtered, sorted, paginated)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<AppResponse<OrderPage>>> {
    let restaurant_id = require_restaurant(&user)?;
    let page = orders::list_by_restaurant(&state, restaurant_id, &query).await?;
    Ok(ok(page))
}
