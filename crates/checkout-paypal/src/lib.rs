//! # checkout-paypal
//!
//! PayPal Orders v2 adapter for storefront-checkout-rs.
//!
//! Two-phase flow matching PayPal's contract:
//!
//! 1. **Create**: builds a single purchase unit from the validated
//!    `CheckoutRequest` and server-computed `OrderTotals`: a currency-coded
//!    amount with item-total + shipping breakdown, per-item lines, payer
//!    contact, the provided shipping address (fixed, so the wallet cannot
//!    substitute another), and an immediate-payment application context.
//! 2. **Capture**: finalizes a previously approved order; only a
//!    `COMPLETED` status counts as success.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_paypal::PayPalGateway;
//! use checkout_core::{compute_totals, PaymentProvider, SiteConfig};
//!
//! let gateway = PayPalGateway::from_env(SiteConfig::from_env())?;
//!
//! let request = raw_request.validate()?;
//! let totals = compute_totals(&request.items, &request.shipping_option)?;
//! let session = gateway.create_session(&request, &totals).await?;
//!
//! // ... customer approves in the PayPal flow ...
//! let outcome = gateway.capture_order(&session.reference).await?;
//! assert_eq!(outcome.status, "COMPLETED");
//! ```

pub mod config;
pub mod order;

// Re-exports
pub use config::{PayPalConfig, PAYPAL_API_LIVE, PAYPAL_API_SANDBOX};
pub use order::{PayPalGateway, CAPTURE_COMPLETED};
