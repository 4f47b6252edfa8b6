//! Shared types for the marketplace order service
//!
//! Data models and DTOs used by the server and its API consumers.
//! DB row derives are behind the `db` feature so UI/client builds
//! don't pull in sqlx.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
