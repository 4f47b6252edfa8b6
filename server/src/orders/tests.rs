//! Order lifecycle flow tests against an in-memory store.

use crate::auth::{CurrentUser, Role};
use crate::core::{Config, ServerState};
use crate::db::repository::{RepoError, order as order_repo};
use crate::orders::{self, OrderListQuery};
use crate::utils::AppError;
use shared::models::{OrderCreate, OrderItemInput, OrderSort, OrderStatus};

// ========================================================================
// Helpers
// ========================================================================

async fn test_state() -> ServerState {
    ServerState::initialize_in_memory(&Config::default())
        .await
        .unwrap()
}

/// Restaurant 1 (Burger Hut): burger 10.00, fries 5.00, shake unavailable.
/// Restaurant 2 (Pizza Palace): pizza 12.00.
async fn seed_catalog(state: &ServerState) {
    sqlx::query(
        "INSERT INTO restaurant (id, name, created_at) VALUES (1, 'Burger Hut', 0), (2, 'Pizza Palace', 0)",
    )
    .execute(&state.db.pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO menu_item (id, restaurant_id, name, price, available, created_at) VALUES \
         (101, 1, 'Burger', 10.0, 1, 0), \
         (102, 1, 'Fries', 5.0, 1, 0), \
         (103, 1, 'Shake', 4.5, 0, 0), \
         (201, 2, 'Pizza', 12.0, 1, 0)",
    )
    .execute(&state.db.pool)
    .await
    .unwrap();
}

fn customer(id: i64) -> CurrentUser {
    CurrentUser {
        id,
        role: Role::Customer,
    }
}

fn restaurant(id: i64) -> CurrentUser {
    CurrentUser {
        id,
        role: Role::Restaurant,
    }
}

fn admin() -> CurrentUser {
    CurrentUser {
        id: 0,
        role: Role::Admin,
    }
}

fn checkout(restaurant_id: i64, items: &[(i64, i32)]) -> OrderCreate {
    OrderCreate {
        restaurant_id,
        items: items
            .iter()
            .map(|&(menu_item_id, quantity)| OrderItemInput {
                menu_item_id,
                quantity,
            })
            .collect(),
        delivery_address: Some("1 Test Street".into()),
        special_instructions: None,
    }
}

/// Walk an order through a sequence of transitions as the restaurant.
async fn advance(state: &ServerState, order_id: i64, path: &[OrderStatus]) {
    let operator = restaurant(1);
    for &status in path {
        orders::transition_status(state, &operator, order_id, status)
            .await
            .unwrap();
    }
}

const TO_DELIVERED: [OrderStatus; 4] = [
    OrderStatus::Confirmed,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::Delivered,
];

// ========================================================================
// Order creation
// ========================================================================

#[tokio::test]
async fn test_place_order_totals() {
    let state = test_state().await;
    seed_catalog(&state).await;

    // Burger x2 (10.00) + Fries x1 (5.00), 8% tax, 3.99 delivery fee
    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 2), (102, 1)]))
        .await
        .unwrap();

    assert_eq!(detail.order.status, OrderStatus::Pending);
    assert_eq!(detail.order.subtotal, 25.0);
    assert_eq!(detail.order.tax, 2.0);
    assert_eq!(detail.order.delivery_fee, 3.99);
    assert_eq!(detail.order.total_amount, 30.99);
    assert_eq!(detail.order.customer_id, 7);
    assert_eq!(detail.order.restaurant_id, 1);
    assert!(detail.order.order_number.starts_with("ORD-"));
    assert!(detail.order.delivered_at.is_none());

    // Line items frozen from the catalog
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.items[0].name, "Burger");
    assert_eq!(detail.items[0].unit_price, 10.0);
    assert_eq!(detail.items[0].subtotal, 20.0);
    assert_eq!(detail.items[1].name, "Fries");

    let items_sum: f64 = detail.items.iter().map(|i| i.subtotal).sum();
    assert_eq!(items_sum, detail.order.subtotal);
}

#[tokio::test]
async fn test_place_order_empty_items() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let err = orders::place_order(&state, 7, checkout(1, &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_place_order_unknown_restaurant() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let err = orders::place_order(&state, 7, checkout(99, &[(101, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_place_order_foreign_menu_item() {
    let state = test_state().await;
    seed_catalog(&state).await;

    // Pizza belongs to restaurant 2
    let err = orders::place_order(&state, 7, checkout(1, &[(201, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_place_order_unavailable_item() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let err = orders::place_order(&state, 7, checkout(1, &[(103, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_place_order_invalid_quantity() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let err = orders::place_order(&state, 7, checkout(1, &[(101, 0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_place_order_emits_notification() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();

    let notifications = state.notifier.list(1, true, 50).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].reference_id, Some(detail.order.id));
    assert!(!notifications[0].is_read);
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_order() {
    let state = test_state().await;
    seed_catalog(&state).await;

    // Break the dispatcher's table; the order write must still succeed
    sqlx::query("DROP TABLE notification")
        .execute(&state.db.pool)
        .await
        .unwrap();

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();
    assert_eq!(detail.order.status, OrderStatus::Pending);
}

// ========================================================================
// Status transitions
// ========================================================================

#[tokio::test]
async fn test_happy_path_to_delivered() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();
    let id = detail.order.id;

    advance(&state, id, &TO_DELIVERED).await;

    let order = order_repo::find_by_id(&state.db.pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert!(order.delivered_at.is_some());
    assert!(order.updated_at >= order.created_at);
}

#[tokio::test]
async fn test_delivered_at_only_set_on_delivery() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();
    let id = detail.order.id;

    advance(&state, id, &[OrderStatus::Confirmed, OrderStatus::Preparing]).await;
    let order = order_repo::find_by_id(&state.db.pool, id)
        .await
        .unwrap()
        .unwrap();
    assert!(order.delivered_at.is_none());
}

#[tokio::test]
async fn test_cancel_after_preparing_rejected() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();
    let id = detail.order.id;

    advance(&state, id, &[OrderStatus::Confirmed, OrderStatus::Preparing]).await;
    let before = order_repo::find_by_id(&state.db.pool, id)
        .await
        .unwrap()
        .unwrap();

    let err = orders::cancel_order(&state, &restaurant(1), id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    // Status and updated_at untouched by the rejected transition
    let after = order_repo::find_by_id(&state.db.pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, OrderStatus::Preparing);
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn test_terminal_states_reject_transitions() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();
    let id = detail.order.id;
    orders::cancel_order(&state, &restaurant(1), id).await.unwrap();

    let err = orders::transition_status(&state, &restaurant(1), id, OrderStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_concurrent_transition_conflict() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();
    let id = detail.order.id;
    advance(&state, id, &[OrderStatus::Confirmed]).await;

    // Two writers both read status = confirmed; the first conditional
    // update wins, the second hits the optimistic check
    let now = shared::util::now_millis();
    order_repo::update_status(
        &state.db.pool,
        id,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        now,
        None,
    )
    .await
    .unwrap();

    let err = order_repo::update_status(
        &state.db.pool,
        id,
        OrderStatus::Confirmed,
        OrderStatus::Cancelled,
        now,
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    let order = order_repo::find_by_id(&state.db.pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Preparing);
}

#[tokio::test]
async fn test_transition_unknown_order() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let err = orders::transition_status(&state, &restaurant(1), 9999, OrderStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ========================================================================
// Authorization scope
// ========================================================================

#[tokio::test]
async fn test_customer_may_cancel_own_pending_order() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();

    let order = orders::cancel_order(&state, &customer(7), detail.order.id)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_customer_may_not_confirm() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();

    let err = orders::transition_status(&state, &customer(7), detail.order.id, OrderStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_foreign_actors_rejected() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();
    let id = detail.order.id;

    let err = orders::cancel_order(&state, &customer(8), id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = orders::transition_status(&state, &restaurant(2), id, OrderStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // Admin is unrestricted
    orders::transition_status(&state, &admin(), id, OrderStatus::Confirmed)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_order_scope() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let detail = orders::place_order(&state, 7, checkout(1, &[(101, 1)]))
        .await
        .unwrap();
    let id = detail.order.id;

    orders::get_order(&state, &customer(7), id).await.unwrap();
    orders::get_order(&state, &restaurant(1), id).await.unwrap();
    orders::get_order(&state, &admin(), id).await.unwrap();

    let err = orders::get_order(&state, &customer(8), id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = orders::get_order(&state, &restaurant(2), id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

// ========================================================================
// Fulfillment queries
// ========================================================================

fn list_query(
    status: Option<OrderStatus>,
    sort: OrderSort,
    limit: i64,
    offset: i64,
) -> OrderListQuery {
    OrderListQuery {
        status,
        date: None,
        sort,
        limit,
        offset,
    }
}

#[tokio::test]
async fn test_status_counts_zero_filled() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let a = orders::place_order(&state, 7, checkout(1, &[(101, 1)])).await.unwrap();
    let b = orders::place_order(&state, 7, checkout(1, &[(102, 1)])).await.unwrap();
    orders::place_order(&state, 8, checkout(1, &[(101, 2)])).await.unwrap();

    advance(&state, a.order.id, &[OrderStatus::Confirmed]).await;
    orders::cancel_order(&state, &restaurant(1), b.order.id).await.unwrap();

    let counts = orders::status_counts(&state, 1).await.unwrap();
    assert_eq!(counts.pending, 1);
    assert_eq!(counts.confirmed, 1);
    assert_eq!(counts.cancelled, 1);
    assert_eq!(counts.preparing, 0);
    assert_eq!(counts.ready, 0);
    assert_eq!(counts.delivered, 0);
    // Counts always sum to the restaurant's total order count
    assert_eq!(counts.total(), 3);

    // Other restaurants are unaffected
    let other = orders::status_counts(&state, 2).await.unwrap();
    assert_eq!(other.total(), 0);
}

#[tokio::test]
async fn test_list_sorted_by_amount_with_pagination() {
    let state = test_state().await;
    seed_catalog(&state).await;

    // Three delivered orders with distinct totals, one left pending
    let mut delivered_totals = Vec::new();
    for quantity in [1, 3, 2] {
        let detail = orders::place_order(&state, 7, checkout(1, &[(101, quantity)]))
            .await
            .unwrap();
        advance(&state, detail.order.id, &TO_DELIVERED).await;
        delivered_totals.push(detail.order.total_amount);
    }
    orders::place_order(&state, 7, checkout(1, &[(102, 1)])).await.unwrap();

    let page = orders::list_by_restaurant(
        &state,
        1,
        &list_query(Some(OrderStatus::Delivered), OrderSort::HighestAmount, 2, 0),
    )
    .await
    .unwrap();

    // At most `limit` rows, sorted descending by total_amount
    assert_eq!(page.orders.len(), 2);
    assert!(page.orders[0].total_amount >= page.orders[1].total_amount);
    delivered_totals.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(page.orders[0].total_amount, delivered_totals[0]);

    // total reflects the full delivered count regardless of limit
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.pages, 2);
    assert_eq!(page.pagination.limit, 2);

    // Second page holds the remainder
    let rest = orders::list_by_restaurant(
        &state,
        1,
        &list_query(Some(OrderStatus::Delivered), OrderSort::HighestAmount, 2, 2),
    )
    .await
    .unwrap();
    assert_eq!(rest.orders.len(), 1);
}

#[tokio::test]
async fn test_list_empty_page() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let page = orders::list_by_restaurant(
        &state,
        1,
        &list_query(Some(OrderStatus::Delivered), OrderSort::Latest, 20, 0),
    )
    .await
    .unwrap();
    assert!(page.orders.is_empty());
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.pages, 0);
}

#[tokio::test]
async fn test_list_date_filter() {
    let state = test_state().await;
    seed_catalog(&state).await;

    let today = orders::place_order(&state, 7, checkout(1, &[(101, 1)])).await.unwrap();
    let old = orders::place_order(&state, 7, checkout(1, &[(102, 1)])).await.unwrap();

    // Backdate the second order by two days
    let two_days = 2 * 24 * 60 * 60 * 1000;
    sqlx::query("UPDATE orders SET created_at = created_at - ? WHERE id = ?")
        .bind(two_days)
        .bind(old.order.id)
        .execute(&state.db.pool)
        .await
        .unwrap();

    let date = crate::utils::time::today_utc().format("%Y-%m-%d").to_string();
    let mut query = list_query(None, OrderSort::Latest, 20, 0);
    query.date = Some(date);

    let page = orders::list_by_restaurant(&state, 1, &query).await.unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.orders[0].id, today.order.id);
}

#[tokio::test]
async fn test_dashboard_stats_excludes_cancelled_revenue() {
    let state = test_state().await;
    seed_catalog(&state).await;

    // Kept order: burger x2 + fries x1 = 30.99 total, 3 items
    let kept = orders::place_order(&state, 7, checkout(1, &[(101, 2), (102, 1)]))
        .await
        .unwrap();
    // Cancelled order: fries x4
    let cancelled = orders::place_order(&state, 8, checkout(1, &[(102, 4)]))
        .await
        .unwrap();
    orders::cancel_order(&state, &restaurant(1), cancelled.order.id)
        .await
        .unwrap();

    let stats = orders::dashboard_stats(&state, 1, None).await.unwrap();
    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.pending_orders, 1);
    assert_eq!(stats.cancelled_orders, 1);
    assert_eq!(stats.total_revenue, kept.order.total_amount);
    assert_eq!(stats.average_order_value, kept.order.total_amount);
    assert_eq!(stats.total_items_sold, 3);
}

// ========================================================================
// Notification scoping
// ========================================================================

#[tokio::test]
async fn test_notification_scope_enforced() {
    let state = test_state().await;
    seed_catalog(&state).await;

    orders::place_order(&state, 7, checkout(1, &[(101, 1)])).await.unwrap();
    let notifications = state.notifier.list(1, false, 50).await.unwrap();
    let id = notifications[0].id;

    // Another restaurant may not touch it
    let err = state.notifier.mark_read(id, 2).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = state.notifier.delete(id, 2).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // Unknown id is NotFound, not Forbidden
    let err = state.notifier.mark_read(9999, 1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // The owner may
    state.notifier.mark_read(id, 1).await.unwrap();
    let unread = state.notifier.list(1, true, 50).await.unwrap();
    assert!(unread.is_empty());
}

#[tokio::test]
async fn test_mark_all_read() {
    let state = test_state().await;
    seed_catalog(&state).await;

    orders::place_order(&state, 7, checkout(1, &[(101, 1)])).await.unwrap();
    orders::place_order(&state, 7, checkout(1, &[(102, 1)])).await.unwrap();

    let marked = state.notifier.mark_all_read(1).await.unwrap();
    assert_eq!(marked, 2);
    assert!(state.notifier.list(1, true, 50).await.unwrap().is_empty());

    // Idempotent: nothing left to mark
    assert_eq!(state.notifier.mark_all_read(1).await.unwrap(), 0);
}
