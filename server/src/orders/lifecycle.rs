//! Order Lifecycle Engine
//!
//! The two write entry points of the service: `place_order` and
//! `transition_status` (`cancel_order` is a transition alias).
//! Validates input against the catalog, derives all financial fields
//! server-side, applies the status state machine, and emits
//! best-effort notifications after each successful write.

use crate::auth::{CurrentUser, Role};
use crate::core::ServerState;
use crate::db::repository::order::{NewOrder, NewOrderItem};
use crate::db::repository::{RepoError, catalog, order};
use crate::orders::money;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NOTE_LEN, MAX_ORDER_ITEMS, validate_optional_text, validate_quantity,
};
use crate::utils::{AppError, AppResult};
use shared::models::{NotificationKind, Order, OrderCreate, OrderDetail, OrderStatus};

// ============================================================================
// State machine
// ============================================================================

/// Transition table. `cancelled` is reachable only from `pending` or
/// `confirmed` — an order already in preparation cannot be cancelled
/// (intentional business rule). `delivered` and `cancelled` are
/// terminal.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    matches!(
        (from, to),
        (OrderStatus::Pending, OrderStatus::Confirmed)
            | (OrderStatus::Pending, OrderStatus::Cancelled)
            | (OrderStatus::Confirmed, OrderStatus::Preparing)
            | (OrderStatus::Confirmed, OrderStatus::Cancelled)
            | (OrderStatus::Preparing, OrderStatus::Ready)
            | (OrderStatus::Ready, OrderStatus::Delivered)
    )
}

fn ensure_transition(from: OrderStatus, to: OrderStatus) -> AppResult<()> {
    if can_transition(from, to) {
        return Ok(());
    }
    Err(AppError::invalid_transition(format!(
        "Cannot transition order from '{from}' to '{to}'"
    )))
}

// ============================================================================
// Authorization
// ============================================================================

fn authorize_view(user: &CurrentUser, order: &Order) -> AppResult<()> {
    let allowed = match user.role {
        Role::Admin => true,
        Role::Restaurant => user.id == order.restaurant_id,
        Role::Customer => user.id == order.customer_id,
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::forbidden("Order belongs to another account"))
    }
}

/// The owning restaurant may move an order forward or cancel it while
/// cancellable; the customer may only cancel their own order; admins
/// are unrestricted.
fn authorize_transition(user: &CurrentUser, order: &Order, target: OrderStatus) -> AppResult<()> {
    match user.role {
        Role::Admin => Ok(()),
        Role::Restaurant => {
            if user.id == order.restaurant_id {
                Ok(())
            } else {
                Err(AppError::forbidden("Order belongs to another restaurant"))
            }
        }
        Role::Customer => {
            if user.id != order.customer_id {
                return Err(AppError::forbidden("Order belongs to another customer"));
            }
            if target != OrderStatus::Cancelled {
                return Err(AppError::forbidden(
                    "Customers may only cancel their own orders",
                ));
            }
            Ok(())
        }
    }
}

// ============================================================================
// Order creation
// ============================================================================

fn generate_order_number(now_millis: i64) -> String {
    let date = chrono::DateTime::from_timestamp_millis(now_millis)
        .map(|dt| dt.format("%Y%m%d").to_string())
        .unwrap_or_else(|| "00000000".to_string());
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", date, suffix[..8].to_uppercase())
}

/// Place a new order for `customer_id`.
///
/// Line items are resolved through the catalog: the caller supplies
/// only item ids and quantities; prices, names and every derived total
/// come from the server side.
pub async fn place_order(
    state: &ServerState,
    customer_id: i64,
    req: OrderCreate,
) -> AppResult<OrderDetail> {
    let pool = &state.db.pool;

    if req.items.is_empty() {
        return Err(AppError::validation("Order must have at least one item"));
    }
    if req.items.len() > MAX_ORDER_ITEMS {
        return Err(AppError::validation(format!(
            "Too many line items ({}, max {MAX_ORDER_ITEMS})",
            req.items.len()
        )));
    }
    validate_optional_text(&req.delivery_address, "delivery_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&req.special_instructions, "special_instructions", MAX_NOTE_LEN)?;

    if catalog::find_restaurant(pool, req.restaurant_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found(format!(
            "Restaurant {} not found",
            req.restaurant_id
        )));
    }

    // Resolve each line against the catalog, freezing name and price
    let mut items = Vec::with_capacity(req.items.len());
    let mut line_subtotals = Vec::with_capacity(req.items.len());
    for input in &req.items {
        validate_quantity(input.quantity)?;
        let menu_item = catalog::find_menu_item(pool, req.restaurant_id, input.menu_item_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Menu item {} not found for restaurant {}",
                    input.menu_item_id, req.restaurant_id
                ))
            })?;
        if !menu_item.available {
            return Err(AppError::validation(format!(
                "Menu item '{}' is currently unavailable",
                menu_item.name
            )));
        }

        let subtotal = money::line_subtotal(menu_item.price, input.quantity)?;
        line_subtotals.push(subtotal);
        items.push(NewOrderItem {
            menu_item_id: menu_item.id,
            name: menu_item.name,
            unit_price: menu_item.price,
            quantity: input.quantity,
            subtotal,
        });
    }

    let totals = money::compute_totals(
        &line_subtotals,
        state.config.tax_rate,
        state.config.delivery_fee,
    )?;

    let now = shared::util::now_millis();
    let order_id = insert_with_fresh_number(state, customer_id, &req, &totals, &items, now).await?;

    let detail = order::find_detail(pool, order_id).await?;

    state
        .notifier
        .notify(
            req.restaurant_id,
            NotificationKind::Order,
            "New order received",
            format!(
                "Order {} placed for {:.2}",
                detail.order.order_number, detail.order.total_amount
            ),
            Some(order_id),
        )
        .await;

    Ok(detail)
}

/// Insert the order, regenerating the order number on the (unlikely)
/// unique-constraint collision.
async fn insert_with_fresh_number(
    state: &ServerState,
    customer_id: i64,
    req: &OrderCreate,
    totals: &money::OrderTotals,
    items: &[NewOrderItem],
    now: i64,
) -> AppResult<i64> {
    let pool = &state.db.pool;
    let mut last_err = None;
    for _ in 0..3 {
        let header = NewOrder {
            order_number: generate_order_number(now),
            customer_id,
            restaurant_id: req.restaurant_id,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            tax: totals.tax,
            total_amount: totals.total_amount,
            delivery_address: req.delivery_address.clone(),
            special_instructions: req.special_instructions.clone(),
            created_at: now,
        };
        match order::insert_order(pool, header, items).await {
            Ok(id) => return Ok(id),
            Err(RepoError::Database(msg)) if msg.contains("UNIQUE") => {
                last_err = Some(RepoError::Database(msg));
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(last_err
        .map(AppError::from)
        .unwrap_or_else(|| AppError::internal("Order number generation failed")))
}

// ============================================================================
// Status transitions
// ============================================================================

/// Apply one status transition with an optimistic-concurrency check.
///
/// The conditional UPDATE keyed on the previously-read status means a
/// lost race surfaces as `Conflict`; the caller must re-read and
/// decide, nothing is retried here.
pub async fn transition_status(
    state: &ServerState,
    user: &CurrentUser,
    order_id: i64,
    target: OrderStatus,
) -> AppResult<Order> {
    let pool = &state.db.pool;

    let current = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

    authorize_transition(user, &current, target)?;
    ensure_transition(current.status, target)?;

    let now = shared::util::now_millis();
    let delivered_at = (target == OrderStatus::Delivered).then_some(now);
    order::update_status(pool, order_id, current.status, target, now, delivered_at).await?;

    state
        .notifier
        .notify(
            current.restaurant_id,
            NotificationKind::Order,
            "Order status changed",
            format!(
                "Order {} moved from '{}' to '{}'",
                current.order_number, current.status, target
            ),
            Some(order_id),
        )
        .await;

    order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))
}

/// Cancellation is just a transition into `cancelled`.
pub async fn cancel_order(
    state: &ServerState,
    user: &CurrentUser,
    order_id: i64,
) -> AppResult<Order> {
    transition_status(state, user, order_id, OrderStatus::Cancelled).await
}

/// Load an order with its items, enforcing view scope.
pub async fn get_order(
    state: &ServerState,
    user: &CurrentUser,
    order_id: i64,
) -> AppResult<OrderDetail> {
    let detail = order::find_detail(&state.db.pool, order_id).await?;
    authorize_view(user, &detail.order)?;
    Ok(detail)
}
