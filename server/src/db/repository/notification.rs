//! Notification Repository
//!
//! Restaurant-scoped rows polled by the restaurant UI. Mutations are
//! scoped to the owning restaurant; touching another restaurant's
//! notification is an explicit Forbidden, never a silent no-op.

use super::{RepoError, RepoResult};
use shared::models::{Notification, NotificationCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, restaurant_id, kind, title, message, reference_id, is_read, created_at";

pub async fn create(pool: &SqlitePool, data: NotificationCreate) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO notification (restaurant_id, kind, title, message, reference_id, is_read, created_at) VALUES (?, ?, ?, ?, ?, 0, ?) RETURNING id",
    )
    .bind(data.restaurant_id)
    .bind(data.kind)
    .bind(&data.title)
    .bind(&data.message)
    .bind(data.reference_id)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Notification>> {
    let notification = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {COLUMNS} FROM notification WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(notification)
}

pub async fn list(
    pool: &SqlitePool,
    restaurant_id: i64,
    unread_only: bool,
    limit: i64,
) -> RepoResult<Vec<Notification>> {
    let sql = if unread_only {
        format!("SELECT {COLUMNS} FROM notification WHERE restaurant_id = ? AND is_read = 0 ORDER BY created_at DESC LIMIT ?")
    } else {
        format!("SELECT {COLUMNS} FROM notification WHERE restaurant_id = ? ORDER BY created_at DESC LIMIT ?")
    };
    let notifications = sqlx::query_as::<_, Notification>(&sql)
        .bind(restaurant_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(notifications)
}

/// Distinguish "absent" from "owned by someone else" after a scoped
/// mutation touched zero rows.
async fn scope_failure(pool: &SqlitePool, id: i64, restaurant_id: i64) -> RepoError {
    match find_by_id(pool, id).await {
        Ok(Some(_)) => RepoError::Forbidden(format!(
            "Notification {id} does not belong to restaurant {restaurant_id}"
        )),
        Ok(None) => RepoError::NotFound(format!("Notification {id} not found")),
        Err(e) => e,
    }
}

pub async fn mark_read(pool: &SqlitePool, id: i64, restaurant_id: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE notification SET is_read = 1 WHERE id = ? AND restaurant_id = ?")
        .bind(id)
        .bind(restaurant_id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(scope_failure(pool, id, restaurant_id).await);
    }
    Ok(())
}

/// Returns the number of notifications marked.
pub async fn mark_all_read(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE notification SET is_read = 1 WHERE restaurant_id = ? AND is_read = 0")
        .bind(restaurant_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete(pool: &SqlitePool, id: i64, restaurant_id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM notification WHERE id = ? AND restaurant_id = ?")
        .bind(id)
        .bind(restaurant_id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(scope_failure(pool, id, restaurant_id).await);
    }
    Ok(())
}
