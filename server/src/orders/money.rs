//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done with `Decimal` internally, then
//! converted back to `f64` for storage/serialization. Rounding is
//! 2 decimal places, half-up.

use rust_decimal::prelude::*;

use crate::utils::{AppError, AppResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item
const MAX_PRICE: f64 = 1_000_000.0;

/// Round a decimal to currency precision
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate that an f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field_name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate a catalog unit price before it enters a line total.
pub fn validate_unit_price(price: f64) -> AppResult<()> {
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(AppError::validation(format!(
            "price must be non-negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

/// Line subtotal: unit_price * quantity, rounded to currency precision.
pub fn line_subtotal(unit_price: f64, quantity: i32) -> AppResult<f64> {
    validate_unit_price(unit_price)?;
    let price = Decimal::from_f64(unit_price)
        .ok_or_else(|| AppError::validation(format!("Invalid price value: {unit_price}")))?;
    let total = round_money(price * Decimal::from(quantity));
    total
        .to_f64()
        .ok_or_else(|| AppError::internal("Line subtotal out of range"))
}

/// Derived financial fields of an order header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub delivery_fee: f64,
    pub total_amount: f64,
}

/// Derive order totals from line subtotals and the financial policy.
///
/// `total_amount == subtotal + tax + delivery_fee` holds exactly at
/// currency precision; nothing here is trusted from the caller.
pub fn compute_totals(
    line_subtotals: &[f64],
    tax_rate: f64,
    delivery_fee: f64,
) -> AppResult<OrderTotals> {
    require_finite(tax_rate, "tax_rate")?;
    require_finite(delivery_fee, "delivery_fee")?;
    if tax_rate < 0.0 || delivery_fee < 0.0 {
        return Err(AppError::validation(
            "tax_rate and delivery_fee must be non-negative",
        ));
    }

    let mut subtotal = Decimal::ZERO;
    for &line in line_subtotals {
        let value = Decimal::from_f64(line)
            .ok_or_else(|| AppError::validation(format!("Invalid line subtotal: {line}")))?;
        subtotal += value;
    }
    subtotal = round_money(subtotal);

    let rate = Decimal::from_f64(tax_rate)
        .ok_or_else(|| AppError::validation(format!("Invalid tax rate: {tax_rate}")))?;
    let fee = round_money(
        Decimal::from_f64(delivery_fee)
            .ok_or_else(|| AppError::validation(format!("Invalid delivery fee: {delivery_fee}")))?,
    );

    let tax = round_money(subtotal * rate);
    let total = subtotal + tax + fee;

    let to_f64 = |value: Decimal, field: &str| -> AppResult<f64> {
        value
            .to_f64()
            .ok_or_else(|| AppError::internal(format!("{field} out of range")))
    };

    Ok(OrderTotals {
        subtotal: to_f64(subtotal, "subtotal")?,
        tax: to_f64(tax, "tax")?,
        delivery_fee: to_f64(fee, "delivery_fee")?,
        total_amount: to_f64(total, "total_amount")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_subtotal() {
        assert_eq!(line_subtotal(10.0, 2).unwrap(), 20.0);
        assert_eq!(line_subtotal(5.0, 1).unwrap(), 5.0);
        // No float drift: 0.1 * 3 rounds cleanly at 2dp
        assert_eq!(line_subtotal(0.1, 3).unwrap(), 0.3);
    }

    #[test]
    fn test_line_subtotal_rejects_bad_prices() {
        assert!(line_subtotal(-1.0, 1).is_err());
        assert!(line_subtotal(f64::NAN, 1).is_err());
        assert!(line_subtotal(f64::INFINITY, 1).is_err());
        assert!(line_subtotal(2_000_000.0, 1).is_err());
    }

    #[test]
    fn test_compute_totals_exact() {
        // Two line items: 10.00 x2 + 5.00 x1, 8% tax, 3.99 delivery
        let lines = [20.0, 5.0];
        let totals = compute_totals(&lines, 0.08, 3.99).unwrap();
        assert_eq!(totals.subtotal, 25.0);
        assert_eq!(totals.tax, 2.0);
        assert_eq!(totals.delivery_fee, 3.99);
        assert_eq!(totals.total_amount, 30.99);
    }

    #[test]
    fn test_compute_totals_invariant() {
        let totals = compute_totals(&[12.34, 0.99, 7.5], 0.0825, 2.5).unwrap();
        let sum = totals.subtotal + totals.tax + totals.delivery_fee;
        assert!((totals.total_amount - sum).abs() < 1e-9);
    }

    #[test]
    fn test_compute_totals_rejects_negative_policy() {
        assert!(compute_totals(&[10.0], -0.01, 0.0).is_err());
        assert!(compute_totals(&[10.0], 0.08, -1.0).is_err());
    }
}
