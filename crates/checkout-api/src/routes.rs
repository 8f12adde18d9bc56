//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - POST /checkout/stripe - Create a Stripe Checkout Session
/// - POST /checkout/paypal/create - Create a PayPal order
/// - POST /checkout/paypal/capture - Capture an approved PayPal order
/// - GET  /checkout/success - Post-payment confirmation page
/// - GET  /health - Health check
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - the storefront origin in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let checkout_routes = Router::new()
        .route("/stripe", post(handlers::checkout_stripe))
        .route("/paypal/create", post(handlers::paypal_create))
        .route("/paypal/capture", post(handlers::paypal_capture))
        .route("/success", get(handlers::checkout_success));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/checkout", checkout_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum_test::TestServer;
    use checkout_core::{
        CaptureOutcome, CheckoutRequest, CheckoutResult, OrderTotals, PaymentProvider,
        PaymentSession, SiteConfig,
    };
    use std::sync::Arc;

    struct FakeProvider {
        name: &'static str,
        capture_status: &'static str,
    }

    #[async_trait]
    impl PaymentProvider for FakeProvider {
        async fn create_session(
            &self,
            _request: &CheckoutRequest,
            totals: &OrderTotals,
        ) -> CheckoutResult<PaymentSession> {
            Ok(PaymentSession {
                provider: self.name.to_string(),
                reference: format!("{}_ref_{}", self.name, totals.order_total),
                redirect_url: None,
            })
        }

        async fn capture_order(&self, _reference: &str) -> CheckoutResult<CaptureOutcome> {
            if self.capture_status == "COMPLETED" {
                Ok(CaptureOutcome {
                    status: self.capture_status.to_string(),
                })
            } else {
                Err(checkout_core::CheckoutError::IncompleteCapture {
                    status: self.capture_status.to_string(),
                })
            }
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }

    fn server(stripe: bool, paypal_capture_status: &'static str) -> TestServer {
        let state = AppState::with_providers(
            stripe.then(|| {
                Arc::new(FakeProvider {
                    name: "stripe",
                    capture_status: "COMPLETED",
                }) as _
            }),
            Some(Arc::new(FakeProvider {
                name: "paypal",
                capture_status: paypal_capture_status,
            }) as _),
            SiteConfig::new("http://localhost:3000", "Shop"),
        );
        TestServer::new(create_router(state)).unwrap()
    }

    fn checkout_body() -> serde_json::Value {
        serde_json::json!({
            "items": [
                { "id": "A", "title": "Walnut Side Table", "quantity": 2, "unit_amount": 500 },
                { "id": "B", "title": "Oak Bench", "quantity": 1, "unit_amount": 1500 }
            ],
            "customer": {
                "email": "jo@example.com",
                "first_name": "Jo",
                "last_name": "Bloggs"
            },
            "shipping_address": {
                "first_name": "Jo",
                "last_name": "Bloggs",
                "address_line1": "1 High Street",
                "city": "Sheffield",
                "postal_code": "S1 1AA",
                "country": "gb"
            },
            "shipping_option": { "id": "standard", "amount": 399 }
        })
    }

    #[tokio::test]
    async fn test_stripe_checkout_returns_session_id() {
        let server = server(true, "COMPLETED");
        let response = server.post("/checkout/stripe").json(&checkout_body()).await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["sessionId"], "stripe_ref_2899");
    }

    #[tokio::test]
    async fn test_paypal_create_returns_order_id() {
        let server = server(true, "COMPLETED");
        let response = server
            .post("/checkout/paypal/create")
            .json(&checkout_body())
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["orderId"], "paypal_ref_2899");
    }

    #[tokio::test]
    async fn test_paypal_capture_completed() {
        let server = server(true, "COMPLETED");
        let response = server
            .post("/checkout/paypal/capture")
            .json(&serde_json::json!({ "orderId": "ORDER-1" }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "COMPLETED");
    }

    #[tokio::test]
    async fn test_paypal_capture_pending_is_error() {
        let server = server(true, "PENDING");
        let response = server
            .post("/checkout/paypal/capture")
            .json(&serde_json::json!({ "orderId": "ORDER-1" }))
            .await;

        response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_400_with_details() {
        let server = server(true, "COMPLETED");
        let mut body = checkout_body();
        body["items"] = serde_json::json!([]);
        body["customer"]["email"] = serde_json::json!("not-an-email");

        let response = server.post("/checkout/stripe").json(&body).await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        let details = body["details"].as_array().unwrap();
        assert!(details.iter().any(|d| d.as_str().unwrap().contains("items list is empty")));
        assert!(details.iter().any(|d| d.as_str().unwrap().contains("email")));
    }

    #[tokio::test]
    async fn test_unconfigured_stripe_is_500_not_configured() {
        let server = server(false, "COMPLETED");
        let response = server.post("/checkout/stripe").json(&checkout_body()).await;

        response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_success_page_renders_reference() {
        let server = server(true, "COMPLETED");
        let response = server
            .get("/checkout/success")
            .add_query_param("provider", "paypal")
            .add_query_param("orderId", "ORDER-9")
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("ORDER-9"));
        assert!(response.text().contains("paypal"));
    }

    #[tokio::test]
    async fn test_success_page_escapes_query_values() {
        let server = server(true, "COMPLETED");
        let response = server
            .get("/checkout/success")
            .add_query_param("provider", "<script>alert(1)</script>")
            .add_query_param("orderId", "\"><img src=x onerror=alert(1)>")
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(!text.contains("<script>alert"));
        assert!(!text.contains("<img"));
        assert!(text.contains("&lt;script&gt;"));
    }
}
