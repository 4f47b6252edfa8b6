//! Catalog Models (餐厅与菜单)
//!
//! Read-only from the order service's point of view; menu CRUD lives
//! elsewhere.

use serde::{Deserialize, Serialize};

/// Restaurant row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub created_at: Option<i64>,
}

/// Menu item row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub price: f64,
    pub available: bool,
    pub created_at: Option<i64>,
}
