//! # checkout-core
//!
//! Core types and logic for the storefront checkout engine.
//!
//! This crate provides:
//! - `Cart`, `CartLine`, and `CartStorage` for the client cart session
//! - `CheckoutRequest` validation, the single gate before pricing
//! - `compute_totals` for authoritative order totals in integer minor units
//! - `PaymentProvider` trait implemented by the Stripe and PayPal adapters
//! - `SuccessReconciler` for the exactly-once post-payment cart clear
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{compute_totals, CheckoutRequest, PaymentProvider};
//!
//! // Validate the raw submission, then price it
//! let request = request.validate()?;
//! let totals = compute_totals(&request.items, &request.shipping_option)?;
//!
//! // Hand the same validated request + totals to either provider
//! let session = provider.create_session(&request, &totals).await?;
//!
//! // Redirect the customer to session.redirect_url
//! ```

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod provider;
pub mod shipping;
pub mod success;
pub mod totals;

// Re-exports for convenience
pub use cart::{
    line_id, Cart, CartItemInput, CartLine, CartStorage, CartVariant, MemoryCartStorage,
    PersistentCart, VariantOption, CART_STORAGE_KEY,
};
pub use checkout::{
    CheckoutItem, CheckoutRequest, CustomerContact, ShippingAddress, ShippingOption,
};
pub use config::SiteConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use provider::{BoxedPaymentProvider, CaptureOutcome, PaymentProvider, PaymentSession};
pub use shipping::{delivery_estimate_for, DeliveryEstimate, SHIPPING_COLLECT, SHIPPING_EXPRESS};
pub use success::{SuccessParams, SuccessReconciler};
pub use totals::{compute_totals, format_major_units, OrderTotals};
