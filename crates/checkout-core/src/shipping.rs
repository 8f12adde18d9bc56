//! # Shipping Rules
//!
//! Delivery-estimate lookup keyed by shipping option id. The Stripe session
//! builder attaches these as business-day ranges; "collect" orders are
//! picked up in person and carry no estimate.

use serde::{Deserialize, Serialize};

/// Express delivery option id
pub const SHIPPING_EXPRESS: &str = "express";
/// In-person collection option id
pub const SHIPPING_COLLECT: &str = "collect";

/// A business-day delivery window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEstimate {
    pub min_business_days: u32,
    pub max_business_days: u32,
}

/// Map a shipping option id to its delivery estimate.
///
/// `"express"` -> 1-2 business days, `"collect"` -> none, anything else
/// (standard and unknown ids alike) -> 3-5 business days.
pub fn delivery_estimate_for(option_id: &str) -> Option<DeliveryEstimate> {
    match option_id {
        SHIPPING_EXPRESS => Some(DeliveryEstimate {
            min_business_days: 1,
            max_business_days: 2,
        }),
        SHIPPING_COLLECT => None,
        _ => Some(DeliveryEstimate {
            min_business_days: 3,
            max_business_days: 5,
        }),
    }
}
