//! Order domain
//!
//! - [`lifecycle`] - creation + status transitions (the write path)
//! - [`money`] - decimal money arithmetic
//! - [`query`] - restaurant-facing read projections

pub mod lifecycle;
pub mod money;
pub mod query;

#[cfg(test)]
mod tests;

pub use lifecycle::{cancel_order, can_transition, get_order, place_order, transition_status};
pub use query::{OrderListQuery, dashboard_stats, list_by_restaurant, status_counts};
