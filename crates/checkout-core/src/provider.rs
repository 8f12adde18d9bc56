//! # Payment Provider Trait
//!
//! Provider-agnostic contract for creating payment sessions. Each provider
//! (Stripe, PayPal) implements this trait against the same validated
//! request and server-computed totals, so the two backends can never charge
//! different amounts for the same cart.
//!
//! For a single checkout attempt the sequence is strictly
//! validate -> compute totals -> build provider request -> call provider;
//! providers consume totals, they never recompute them.

use crate::checkout::CheckoutRequest;
use crate::error::{CheckoutError, CheckoutResult};
use crate::totals::OrderTotals;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opaque provider-side session reference returned to the client.
///
/// The provider is the system of record for payment status; no further
/// server-side state is held here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Provider tag ("stripe" or "paypal")
    pub provider: String,

    /// Stripe session id or PayPal order id
    pub reference: String,

    /// Hosted page to redirect the customer to, when the provider has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// Result of a capture call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureOutcome {
    /// Provider-reported status; the only success value is "COMPLETED"
    pub status: String,
}

/// Core trait for payment provider implementations
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a provider payment session for a validated, priced checkout.
    ///
    /// Implementations must fail with `CheckoutError::Configuration` before
    /// any network call when credentials are missing, and translate provider
    /// rejections into `CheckoutError::Provider` with the provider's message.
    async fn create_session(
        &self,
        request: &CheckoutRequest,
        totals: &OrderTotals,
    ) -> CheckoutResult<PaymentSession>;

    /// Finalize a previously created session.
    ///
    /// Only PayPal has an explicit capture step; Stripe settles inside its
    /// hosted flow, so the default is an `Unsupported` error.
    async fn capture_order(&self, reference: &str) -> CheckoutResult<CaptureOutcome> {
        let _ = reference;
        Err(CheckoutError::Unsupported(format!(
            "{} does not use an explicit capture step",
            self.provider_name()
        )))
    }

    /// Provider tag, used in responses and logging
    fn provider_name(&self) -> &'static str;
}

impl std::fmt::Debug for dyn PaymentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentProvider")
            .field("provider", &self.provider_name())
            .finish()
    }
}

/// Type alias for a boxed payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;
