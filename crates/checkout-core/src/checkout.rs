//! # Checkout Request Types
//!
//! The validated shape of a checkout submission. Validation is the single
//! gate before any pricing math or provider call, and runs identically for
//! both payment providers.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};

/// A cart-derived line item as submitted at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    /// Line identity from the cart
    pub id: String,

    /// Display title
    pub title: String,

    /// Quantity, must be >= 1
    pub quantity: u32,

    /// Unit price in minor currency units, must be >= 0
    pub unit_amount: i64,
}

/// Customer contact details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerContact {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Shipping address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub postal_code: String,
    /// Two-letter ISO country code; normalized to uppercase by validation
    pub country: String,
}

/// Chosen shipping option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingOption {
    /// Option identifier (e.g. "standard", "express", "collect")
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Shipping amount in minor currency units, must be >= 0
    pub amount: i64,
}

/// A checkout submission as received from the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    pub customer: CustomerContact,
    pub shipping_address: ShippingAddress,
    pub shipping_option: ShippingOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CheckoutRequest {
    /// Validate the payload and normalize the country code.
    ///
    /// Collects every violated constraint rather than failing on the first,
    /// so the 400 response itemizes the whole problem.
    pub fn validate(mut self) -> CheckoutResult<Self> {
        let mut issues = Vec::new();

        if self.items.is_empty() {
            issues.push("items list is empty".to_string());
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.quantity < 1 {
                issues.push(format!("items[{}]: quantity must be at least 1", i));
            }
            if item.unit_amount < 0 {
                issues.push(format!("items[{}]: unit amount must not be negative", i));
            }
            if item.id.is_empty() {
                issues.push(format!("items[{}]: id is required", i));
            }
        }

        if !is_plausible_email(&self.customer.email) {
            issues.push("customer email is malformed".to_string());
        }
        if self.customer.first_name.trim().is_empty() {
            issues.push("customer first name is required".to_string());
        }
        if self.customer.last_name.trim().is_empty() {
            issues.push("customer last name is required".to_string());
        }

        let addr = &self.shipping_address;
        for (field, value) in [
            ("first name", &addr.first_name),
            ("last name", &addr.last_name),
            ("address line 1", &addr.address_line1),
            ("city", &addr.city),
            ("postal code", &addr.postal_code),
        ] {
            if value.trim().is_empty() {
                issues.push(format!("shipping address {} is required", field));
            }
        }

        if is_two_letter_country(&addr.country) {
            self.shipping_address.country = addr.country.to_ascii_uppercase();
        } else {
            issues.push("shipping country must be a 2-letter code".to_string());
        }

        if self.shipping_option.id.trim().is_empty() {
            issues.push("shipping option id is required".to_string());
        }
        if self.shipping_option.amount < 0 {
            issues.push("shipping amount must not be negative".to_string());
        }

        if issues.is_empty() {
            Ok(self)
        } else {
            Err(CheckoutError::Validation { issues })
        }
    }
}

/// Minimal email plausibility check: one `@` with non-empty local part and
/// a domain containing a dot, no whitespace.
fn is_plausible_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => {
            !local.is_empty()
                && domain.len() >= 3
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

/// `^[A-Za-z]{2}$`
fn is_two_letter_country(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}
