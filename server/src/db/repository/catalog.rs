//! Catalog Repository
//!
//! Read-only lookups used by the lifecycle engine to resolve
//! restaurants and menu items at checkout time.

use super::RepoResult;
use shared::models::{MenuItem, Restaurant};
use sqlx::SqlitePool;

pub async fn find_restaurant(pool: &SqlitePool, id: i64) -> RepoResult<Option<Restaurant>> {
    let restaurant = sqlx::query_as::<_, Restaurant>(
        "SELECT id, name, created_at FROM restaurant WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(restaurant)
}

/// Resolve a menu item within a restaurant's catalog.
///
/// Returns `None` when the item does not exist or belongs to a
/// different restaurant.
pub async fn find_menu_item(
    pool: &SqlitePool,
    restaurant_id: i64,
    menu_item_id: i64,
) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(
        "SELECT id, restaurant_id, name, price, available, created_at FROM menu_item WHERE id = ? AND restaurant_id = ?",
    )
    .bind(menu_item_id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}
