//! Fulfillment Query Service
//!
//! Read-only projections for restaurant operators: filtered and
//! paginated order listings, fixed-key status counts, and single-day
//! dashboard aggregates. No write path.

use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::order::{self, OrderFilter};
use crate::utils::{AppResult, time};
use shared::models::{
    DashboardStats, OrderPage, OrderSort, OrderStatus, Pagination, StatusCounts,
};

/// Query params for restaurant order listings
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    /// Restrict to orders created on this day (YYYY-MM-DD, UTC)
    pub date: Option<String>,
    #[serde(default)]
    pub sort: OrderSort,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

fn build_filter(query: &OrderListQuery) -> AppResult<OrderFilter> {
    let created_range = match &query.date {
        Some(date) => Some(time::day_bounds_millis(time::parse_date(date)?)),
        None => None,
    };
    Ok(OrderFilter {
        status: query.status,
        created_range,
    })
}

/// List a restaurant's orders with filter, sort and pagination.
///
/// `pagination.total` is the full filtered count regardless of limit.
pub async fn list_by_restaurant(
    state: &ServerState,
    restaurant_id: i64,
    query: &OrderListQuery,
) -> AppResult<OrderPage> {
    let pool = &state.db.pool;

    let limit = query.limit.clamp(1, 100);
    let offset = query.offset.max(0);
    let filter = build_filter(query)?;

    let total = order::count_by_restaurant(pool, restaurant_id, &filter).await?;
    let orders =
        order::list_by_restaurant(pool, restaurant_id, &filter, query.sort, limit, offset).await?;

    Ok(OrderPage {
        orders,
        pagination: Pagination {
            total,
            limit,
            offset,
            pages: (total + limit - 1) / limit,
        },
    })
}

/// Order counts over all six statuses, zero-filled.
pub async fn status_counts(state: &ServerState, restaurant_id: i64) -> AppResult<StatusCounts> {
    let rows = order::status_counts(&state.db.pool, restaurant_id).await?;

    let mut counts = StatusCounts::default();
    for (status, count) in rows {
        match status {
            OrderStatus::Pending => counts.pending = count,
            OrderStatus::Confirmed => counts.confirmed = count,
            OrderStatus::Preparing => counts.preparing = count,
            OrderStatus::Ready => counts.ready = count,
            OrderStatus::Delivered => counts.delivered = count,
            OrderStatus::Cancelled => counts.cancelled = count,
        }
    }
    Ok(counts)
}

/// Single-day dashboard aggregates (default: current UTC day).
///
/// Revenue and average order value exclude cancelled orders.
pub async fn dashboard_stats(
    state: &ServerState,
    restaurant_id: i64,
    date: Option<&str>,
) -> AppResult<DashboardStats> {
    let pool = &state.db.pool;

    let day = match date {
        Some(d) => time::parse_date(d)?,
        None => time::today_utc(),
    };
    let (start, end) = time::day_bounds_millis(day);

    let rows = order::day_status_totals(pool, restaurant_id, start, end).await?;

    let mut stats = DashboardStats::default();
    let mut revenue_orders: i64 = 0;
    for (status, count, amount) in rows {
        stats.total_orders += count;
        match status {
            OrderStatus::Pending => stats.pending_orders = count,
            OrderStatus::Confirmed => stats.confirmed_orders = count,
            OrderStatus::Preparing => stats.preparing_orders = count,
            OrderStatus::Ready => stats.ready_orders = count,
            OrderStatus::Delivered => stats.delivered_orders = count,
            OrderStatus::Cancelled => stats.cancelled_orders = count,
        }
        if status != OrderStatus::Cancelled {
            stats.total_revenue += amount;
            revenue_orders += count;
        }
    }
    if revenue_orders > 0 {
        stats.average_order_value = stats.total_revenue / revenue_orders as f64;
    }
    stats.total_items_sold = order::day_items_sold(pool, restaurant_id, start, end).await?;

    Ok(stats)
}
