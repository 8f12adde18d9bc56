//! # checkout-api
//!
//! HTTP API layer for storefront-checkout-rs.
//!
//! Exposes the checkout endpoints over axum:
//! - `POST /checkout/stripe`
//! - `POST /checkout/paypal/create`
//! - `POST /checkout/paypal/capture`
//! - `GET  /checkout/success`

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
