//! Notification API Module
//!
//! Polled by the restaurant UI; every operation is scoped to the
//! calling restaurant.

mod handler;

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/read-all", put(handler::mark_all_read))
        .route("/{id}/read", put(handler::mark_read))
        .route("/{id}", delete(handler::remove))
}
