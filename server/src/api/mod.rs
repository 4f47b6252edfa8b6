//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 下单、状态流转、订单查询
//! - [`dashboard`] - 餐厅端统计 (状态计数、当日汇总)
//! - [`notifications`] - 通知轮询与管理
//!
//! 除 health 外的所有路由都在 `require_auth` 之后。

pub mod dashboard;
pub mod extract;
pub mod health;
pub mod notifications;
pub mod orders;


use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{CurrentUser, Role, require_auth};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Assemble the full application router.
pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .merge(orders::router())
        .merge(dashboard::router())
        .merge(notifications::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(health::router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Restaurant-scoped endpoints: the actor id *is* the restaurant id.
pub fn require_restaurant(user: &CurrentUser) -> AppResult<i64> {
    match user.role {
        Role::Restaurant => Ok(user.id),
        _ => Err(AppError::forbidden("Restaurant account required")),
    }
}

/// Checkout is customer-only.
pub fn require_customer(user: &CurrentUser) -> AppResult<i64> {
    match user.role {
        Role::Customer => Ok(user.id),
        _ => Err(AppError::forbidden("Customer account required")),
    }
}
