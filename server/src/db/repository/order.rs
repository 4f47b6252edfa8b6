//! Order Repository
//!
//! The sole writer of order state. Creation writes the header and all
//! line items inside one transaction; status updates are a single
//! conditional UPDATE so concurrent transitions cannot lose writes.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderDetail, OrderItem, OrderSort, OrderStatus};
use sqlx::{QueryBuilder, SqlitePool};

const ORDER_COLUMNS: &str = "id, order_number, customer_id, restaurant_id, status, subtotal, delivery_fee, tax, total_amount, delivery_address, special_instructions, created_at, updated_at, delivered_at";

const ITEM_COLUMNS: &str = "id, order_id, menu_item_id, name, unit_price, quantity, subtotal";

/// Header values for a new order (totals already derived by the engine)
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total_amount: f64,
    pub delivery_address: Option<String>,
    pub special_instructions: Option<String>,
    pub created_at: i64,
}

/// Line item values frozen at order time
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub menu_item_id: i64,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i32,
    pub subtotal: f64,
}

/// Insert an order header and all of its line items atomically.
///
/// Either every row becomes visible or none does.
pub async fn insert_order(
    pool: &SqlitePool,
    header: NewOrder,
    items: &[NewOrderItem],
) -> RepoResult<i64> {
    if items.is_empty() {
        return Err(RepoError::Validation("Order must have at least one item".into()));
    }

    let mut tx = pool.begin().await?;

    let order_id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (order_number, customer_id, restaurant_id, status, subtotal, delivery_fee, tax, total_amount, delivery_address, special_instructions, created_at, updated_at) VALUES (?, ?, ?, 'pending', ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&header.order_number)
    .bind(header.customer_id)
    .bind(header.restaurant_id)
    .bind(header.subtotal)
    .bind(header.delivery_fee)
    .bind(header.tax)
    .bind(header.total_amount)
    .bind(&header.delivery_address)
    .bind(&header.special_instructions)
    .bind(header.created_at)
    .bind(header.created_at)
    .fetch_one(&mut *tx)
    .await?;

    // Multi-row insert: all line items in one statement
    let mut builder = QueryBuilder::new(
        "INSERT INTO order_item (order_id, menu_item_id, name, unit_price, quantity, subtotal) ",
    );
    builder.push_values(items, |mut row, item| {
        row.push_bind(order_id)
            .push_bind(item.menu_item_id)
            .push_bind(&item.name)
            .push_bind(item.unit_price)
            .push_bind(item.quantity)
            .push_bind(item.subtotal);
    });
    builder.build().execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(order_id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_item WHERE order_id = ? ORDER BY id"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Load an order header together with its line items.
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<OrderDetail> {
    let order = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;
    let items = find_items(pool, id).await?;
    Ok(OrderDetail { order, items })
}

/// Conditionally move an order from `expected` to `next`.
///
/// The `WHERE status = expected` clause is the optimistic-concurrency
/// check: when another writer got there first, zero rows are affected
/// and the caller gets `Conflict` (or `NotFound` if the order is gone).
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    expected: OrderStatus,
    next: OrderStatus,
    now: i64,
    delivered_at: Option<i64>,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE orders SET status = ?, updated_at = ?, delivered_at = COALESCE(?, delivered_at) WHERE id = ? AND status = ?",
    )
    .bind(next)
    .bind(now)
    .bind(delivered_at)
    .bind(id)
    .bind(expected)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, id).await? {
            None => Err(RepoError::NotFound(format!("Order {id} not found"))),
            Some(order) => Err(RepoError::Conflict(format!(
                "Order {id} was modified concurrently (status is now '{}')",
                order.status
            ))),
        };
    }
    Ok(())
}

// ============================================================================
// Read path (fulfillment query service)
// ============================================================================

/// Filter for restaurant order listings
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// created_at in [start, end)
    pub created_range: Option<(i64, i64)>,
}

fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Sqlite>, restaurant_id: i64, filter: &OrderFilter) {
    builder.push(" WHERE restaurant_id = ").push_bind(restaurant_id);
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some((start, end)) = filter.created_range {
        builder
            .push(" AND created_at >= ")
            .push_bind(start)
            .push(" AND created_at < ")
            .push_bind(end);
    }
}

pub async fn list_by_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
    filter: &OrderFilter,
    sort: OrderSort,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    let mut builder = QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders"));
    push_filters(&mut builder, restaurant_id, filter);

    let order_by = match sort {
        OrderSort::Latest => " ORDER BY created_at DESC",
        OrderSort::Oldest => " ORDER BY created_at ASC",
        OrderSort::HighestAmount => " ORDER BY total_amount DESC",
        OrderSort::LowestAmount => " ORDER BY total_amount ASC",
    };
    builder.push(order_by);
    builder.push(" LIMIT ").push_bind(limit);
    builder.push(" OFFSET ").push_bind(offset);

    let orders = builder.build_query_as::<Order>().fetch_all(pool).await?;
    Ok(orders)
}

/// Full count for the same filter, independent of limit/offset.
pub async fn count_by_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
    filter: &OrderFilter,
) -> RepoResult<i64> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM orders");
    push_filters(&mut builder, restaurant_id, filter);

    let total: i64 = builder.build_query_scalar().fetch_one(pool).await?;
    Ok(total)
}

/// Order counts grouped by status (absent statuses simply don't appear;
/// zero-filling happens in the query service).
pub async fn status_counts(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> RepoResult<Vec<(OrderStatus, i64)>> {
    let rows = sqlx::query_as::<_, (OrderStatus, i64)>(
        "SELECT status, COUNT(*) FROM orders WHERE restaurant_id = ? GROUP BY status",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Per-status count and revenue for one day's orders.
pub async fn day_status_totals(
    pool: &SqlitePool,
    restaurant_id: i64,
    start: i64,
    end: i64,
) -> RepoResult<Vec<(OrderStatus, i64, f64)>> {
    let rows = sqlx::query_as::<_, (OrderStatus, i64, f64)>(
        "SELECT status, COUNT(*), SUM(total_amount) FROM orders WHERE restaurant_id = ? AND created_at >= ? AND created_at < ? GROUP BY status",
    )
    .bind(restaurant_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Total items sold in one day, excluding cancelled orders.
pub async fn day_items_sold(
    pool: &SqlitePool,
    restaurant_id: i64,
    start: i64,
    end: i64,
) -> RepoResult<i64> {
    let sold: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(oi.quantity), 0) FROM order_item oi JOIN orders o ON o.id = oi.order_id WHERE o.restaurant_id = ? AND o.created_at >= ? AND o.created_at < ? AND o.status != 'cancelled'",
    )
    .bind(restaurant_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;
    Ok(sold)
}
