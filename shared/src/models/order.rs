//! Order Models (订单)
//!
//! Order header + line items. Line items carry a frozen copy of the
//! menu item name and unit price at order time, so later menu edits
//! never change historical orders.

use serde::{Deserialize, Serialize};

/// Order status — the fixed six-value lifecycle enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order (used for zero-filled counts)
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for parsing an [`OrderStatus`] from its wire string
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown order status: {0}")]
pub struct ParseOrderStatusError(String);

impl std::str::FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ParseOrderStatusError(other.to_string())),
        }
    }
}

/// Order header row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Externally-displayed order number (opaque string)
    pub order_number: String,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub status: OrderStatus,
    /// Sum of line item subtotals
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    /// subtotal + delivery_fee + tax, derived server-side
    pub total_amount: f64,
    pub delivery_address: Option<String>,
    pub special_instructions: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Set exactly once, on the transition into `delivered`
    pub delivered_at: Option<i64>,
}

/// Order line item row (owned by one order, cascade-deleted with it)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    /// Name frozen at order time
    pub name: String,
    /// Unit price frozen at order time
    pub unit_price: f64,
    pub quantity: i32,
    /// unit_price * quantity
    pub subtotal: f64,
}

/// Order header + items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// API Request Types
// =============================================================================

/// Line item selection in a checkout request.
///
/// Prices are never accepted from the caller; the server resolves them
/// from the catalog at placement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    pub quantity: i32,
}

/// Checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub restaurant_id: i64,
    pub items: Vec<OrderItemInput>,
    pub delivery_address: Option<String>,
    pub special_instructions: Option<String>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// Query / Response Types
// =============================================================================

/// Sort order for restaurant order listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSort {
    #[default]
    Latest,
    Oldest,
    HighestAmount,
    LowestAmount,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    /// ceil(total / limit)
    pub pages: i64,
}

/// One page of orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

/// Fixed-key order counts, zero-filled for absent statuses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub confirmed: i64,
    pub preparing: i64,
    pub ready: i64,
    pub delivered: i64,
    pub cancelled: i64,
}

impl StatusCounts {
    pub fn total(&self) -> i64 {
        self.pending + self.confirmed + self.preparing + self.ready + self.delivered + self.cancelled
    }
}

/// Single-day restaurant dashboard aggregates.
///
/// Revenue figures exclude cancelled orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub confirmed_orders: i64,
    pub preparing_orders: i64,
    pub ready_orders: i64,
    pub delivered_orders: i64,
    pub cancelled_orders: i64,
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub total_items_sold: i64,
}
