//! # Success Reconciliation
//!
//! Post-payment step: on return from either provider, clear the cart
//! exactly once. A guard flag makes repeated renders of the success page
//! idempotent, and a visit with no payment reference leaves the cart
//! untouched: a user landing on the route without paying keeps their cart.

use crate::cart::Cart;
use serde::Deserialize;
use tracing::info;

/// Query parameters carried back on the success return URL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuccessParams {
    /// Provider tag ("stripe" or "paypal")
    #[serde(default)]
    pub provider: Option<String>,

    /// PayPal order id
    #[serde(default, rename = "orderId")]
    pub order_id: Option<String>,

    /// Stripe session id
    #[serde(default)]
    pub session_id: Option<String>,
}

impl SuccessParams {
    /// The payment reference, whichever provider supplied one
    pub fn reference(&self) -> Option<&str> {
        self.order_id
            .as_deref()
            .or(self.session_id.as_deref())
            .filter(|r| !r.is_empty())
    }
}

/// Clears the cart at most once per page lifetime
#[derive(Debug, Default)]
pub struct SuccessReconciler {
    already_cleared: bool,
}

impl SuccessReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the cart if a payment reference is present and it has not
    /// been cleared before. Returns whether this call cleared it.
    pub fn reconcile(&mut self, params: &SuccessParams, cart: &mut Cart) -> bool {
        if self.already_cleared {
            return false;
        }
        let Some(reference) = params.reference() else {
            return false;
        };

        info!(
            provider = params.provider.as_deref().unwrap_or("unknown"),
            reference, "Clearing cart after completed payment"
        );
        cart.clear();
        self.already_cleared = true;
        true
    }

    /// Whether this reconciler has already cleared a cart
    pub fn cleared(&self) -> bool {
        self.already_cleared
    }
}
