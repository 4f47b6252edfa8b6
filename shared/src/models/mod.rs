//! Data models
//!
//! Shared between the server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).
//! All timestamps are Unix milliseconds (`i64`), UTC.

pub mod catalog;
pub mod notification;
pub mod order;

// Re-exports
pub use catalog::*;
pub use notification::*;
pub use order::*;
