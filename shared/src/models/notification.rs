//! Notification Model (通知)
//!
//! Restaurant-scoped, persisted for polling. Created by the lifecycle
//! engine on order-affecting events; mutated only by mark-read; may be
//! deleted by the owning restaurant.

use serde::{Deserialize, Serialize};

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum NotificationKind {
    Order,
    Review,
    System,
    Alert,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Order => "order",
            NotificationKind::Review => "review",
            NotificationKind::System => "system",
            NotificationKind::Alert => "alert",
        }
    }
}

/// Notification row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub restaurant_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Id of the triggering entity (e.g. the order id)
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: i64,
}

/// Create payload (dispatcher-internal)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub restaurant_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub reference_id: Option<i64>,
}
