//! Dashboard API Module
//!
//! Restaurant-facing read-only aggregates.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dashboard", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/status-counts", get(handler::status_counts))
        .route("/stats", get(handler::stats))
}
