//! # Order Total Calculator
//!
//! Single source of truth for checkout pricing. Both payment adapters call
//! `compute_totals` on the validated request before constructing a provider
//! call, so the amount the provider charges is always the amount the server
//! computed. All arithmetic is in integer minor currency units.

use crate::checkout::{CheckoutItem, ShippingOption};
use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};

/// Derived totals for one checkout attempt; never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of `unit_amount * quantity` over all items, minor units
    pub items_total: i64,

    /// The chosen shipping option's amount, minor units
    pub shipping_total: i64,

    /// `items_total + shipping_total`, minor units; always > 0
    pub order_total: i64,
}

/// Compute totals from validated line items and the chosen shipping option.
///
/// Rejects when the grand total is not strictly positive; a zero-value
/// order must never reach a payment provider. All arithmetic is checked:
/// amounts large enough to overflow i64 minor units are rejected the same
/// way as any other invalid payload, never wrapped.
pub fn compute_totals(
    items: &[CheckoutItem],
    shipping_option: &ShippingOption,
) -> CheckoutResult<OrderTotals> {
    let mut items_total: i64 = 0;
    for item in items {
        let line_total = item
            .unit_amount
            .checked_mul(i64::from(item.quantity))
            .ok_or_else(amount_overflow)?;
        items_total = items_total
            .checked_add(line_total)
            .ok_or_else(amount_overflow)?;
    }
    let shipping_total = shipping_option.amount;
    let order_total = items_total
        .checked_add(shipping_total)
        .ok_or_else(amount_overflow)?;

    if order_total <= 0 {
        return Err(CheckoutError::validation(format!(
            "order total must be greater than zero (got {})",
            order_total
        )));
    }

    Ok(OrderTotals {
        items_total,
        shipping_total,
        order_total,
    })
}

fn amount_overflow() -> CheckoutError {
    CheckoutError::validation("order amounts exceed the supported range")
}

/// Format minor units as a two-decimal-place major-unit string, the wire
/// format PayPal's amount fields require (e.g. `2899` -> `"28.99"`).
pub fn format_major_units(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, unit_amount: i64, quantity: u32) -> CheckoutItem {
        CheckoutItem {
            id: id.into(),
            title: format!("Item {}", id),
            quantity,
            unit_amount,
        }
    }

    fn shipping(id: &str, amount: i64) -> ShippingOption {
        ShippingOption {
            id: id.into(),
            label: None,
            description: None,
            amount,
        }
    }

    #[test]
    fn test_reference_scenario() {
        // Two lines at 500x2 and 1500x1 plus 399 standard shipping
        let items = vec![item("A", 500, 2), item("B", 1500, 1)];
        let totals = compute_totals(&items, &shipping("standard", 399)).unwrap();

        assert_eq!(totals.items_total, 2500);
        assert_eq!(totals.shipping_total, 399);
        assert_eq!(totals.order_total, 2899);
    }

    #[test]
    fn test_order_independent_over_item_permutation() {
        let forward = vec![item("A", 500, 2), item("B", 1500, 1), item("C", 7, 3)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let ship = shipping("standard", 399);
        assert_eq!(
            compute_totals(&forward, &ship).unwrap(),
            compute_totals(&reversed, &ship).unwrap()
        );
    }

    #[test]
    fn test_zero_total_rejected() {
        let items = vec![item("A", 0, 2)];
        let err = compute_totals(&items, &shipping("collect", 0)).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_overflowing_amounts_rejected() {
        // A single line whose product overflows i64
        let items = vec![item("A", i64::MAX, 2)];
        let err = compute_totals(&items, &shipping("standard", 399)).unwrap_err();
        assert_eq!(err.status_code(), 400);

        // Lines that overflow when summed
        let items = vec![item("A", i64::MAX, 1), item("B", i64::MAX, 1)];
        assert!(compute_totals(&items, &shipping("standard", 0)).is_err());

        // Shipping pushing the sum over the edge
        let items = vec![item("A", i64::MAX, 1)];
        assert!(compute_totals(&items, &shipping("standard", 1)).is_err());
    }

    #[test]
    fn test_free_items_with_paid_shipping_accepted() {
        let items = vec![item("A", 0, 1)];
        let totals = compute_totals(&items, &shipping("standard", 399)).unwrap();
        assert_eq!(totals.order_total, 399);
    }

    #[test]
    fn test_format_major_units() {
        assert_eq!(format_major_units(2899), "28.99");
        assert_eq!(format_major_units(100), "1.00");
        assert_eq!(format_major_units(5), "0.05");
        assert_eq!(format_major_units(0), "0.00");
        assert_eq!(format_major_units(-150), "-1.50");
    }
}
