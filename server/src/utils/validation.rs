//! Input validation helpers
//!
//! Centralized limits and validation functions for checkout input.
//! SQLite TEXT has no built-in length enforcement, so limits are
//! applied here before anything reaches the store.

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Special instructions / notes
pub const MAX_NOTE_LEN: usize = 500;

/// Line items per order
pub const MAX_ORDER_ITEMS: usize = 100;

/// Quantity per line item
pub const MAX_QUANTITY: i32 = 999;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a line item quantity (integer ≥ 1, bounded).
pub fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::validation(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_optional_text() {
        assert!(validate_optional_text(&None, "note", 10).is_ok());
        assert!(validate_optional_text(&Some("short".into()), "note", 10).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(11)), "note", 10).is_err());
    }
}
