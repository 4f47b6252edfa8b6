//! Notification Dispatcher
//!
//! Fire-and-forget persistence of event records for later polling by
//! the restaurant UI. The order write is the source of truth; a failed
//! notification insert is logged and suppressed, never surfaced to the
//! caller of the triggering order operation.

use sqlx::SqlitePool;

use crate::db::repository::notification;
use crate::utils::AppResult;
use shared::models::{Notification, NotificationCreate, NotificationKind};

#[derive(Clone)]
pub struct Notifier {
    pool: SqlitePool,
}

impl Notifier {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Best-effort: persist a notification for the restaurant.
    ///
    /// Failures are logged at WARN and swallowed.
    pub async fn notify(
        &self,
        restaurant_id: i64,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        reference_id: Option<i64>,
    ) {
        let data = NotificationCreate {
            restaurant_id,
            kind,
            title: title.into(),
            message: message.into(),
            reference_id,
        };
        if let Err(e) = notification::create(&self.pool, data).await {
            tracing::warn!(
                target: "notify",
                error = %e,
                restaurant_id,
                "Failed to persist notification"
            );
        }
    }

    pub async fn list(
        &self,
        restaurant_id: i64,
        unread_only: bool,
        limit: i64,
    ) -> AppResult<Vec<Notification>> {
        Ok(notification::list(&self.pool, restaurant_id, unread_only, limit).await?)
    }

    pub async fn mark_read(&self, id: i64, restaurant_id: i64) -> AppResult<()> {
        Ok(notification::mark_read(&self.pool, id, restaurant_id).await?)
    }

    /// Returns the number of notifications marked.
    pub async fn mark_all_read(&self, restaurant_id: i64) -> AppResult<u64> {
        Ok(notification::mark_all_read(&self.pool, restaurant_id).await?)
    }

    pub async fn delete(&self, id: i64, restaurant_id: i64) -> AppResult<()> {
        Ok(notification::delete(&self.pool, id, restaurant_id).await?)
    }
}
