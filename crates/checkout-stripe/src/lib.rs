//! # checkout-stripe
//!
//! Stripe Checkout Session adapter for storefront-checkout-rs.
//!
//! Builds hosted checkout sessions from a validated `CheckoutRequest` and
//! server-computed `OrderTotals`: live-priced line items, one fixed-amount
//! shipping rate with a delivery-estimate window, shipping restricted to
//! the submitted country, and fulfilment metadata. Stripe captures payment
//! inside its hosted flow, so this adapter has no capture step.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_stripe::StripeGateway;
//! use checkout_core::{compute_totals, PaymentProvider, SiteConfig};
//!
//! let gateway = StripeGateway::from_env(SiteConfig::from_env())?;
//!
//! let request = raw_request.validate()?;
//! let totals = compute_totals(&request.items, &request.shipping_option)?;
//! let session = gateway.create_session(&request, &totals).await?;
//!
//! // Redirect the customer to session.redirect_url
//! ```

pub mod config;
pub mod session;

// Re-exports
pub use config::StripeConfig;
pub use session::StripeGateway;
