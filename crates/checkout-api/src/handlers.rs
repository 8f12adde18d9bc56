//! # Request Handlers
//!
//! Axum request handlers for the checkout API. Every checkout submission
//! follows the same strictly sequential path: validate the payload, compute
//! authoritative totals, then build and send the provider request. The cart
//! itself is never trusted for pricing.

use crate::state::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use checkout_core::{compute_totals, CheckoutError, CheckoutRequest, SuccessParams};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Stripe checkout response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeCheckoutResponse {
    /// Stripe session id
    pub session_id: String,
    /// Hosted checkout page to redirect to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// PayPal order-create response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalCreateResponse {
    /// PayPal order id
    pub order_id: String,
    /// Approval page, when PayPal returned one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approve_url: Option<String>,
}

/// PayPal capture request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalCaptureRequest {
    pub order_id: String,
}

/// PayPal capture response
#[derive(Debug, Serialize)]
pub struct PayPalCaptureResponse {
    /// Provider status; the only success value is "COMPLETED"
    pub status: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let details = match &err {
        CheckoutError::Validation { issues } => Some(issues.clone()),
        _ => None,
    };
    let response = ErrorResponse {
        error: err.to_string(),
        code,
        details,
    };
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a Stripe Checkout Session
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn checkout_stripe(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<StripeCheckoutResponse>, (StatusCode, Json<ErrorResponse>)> {
    let gateway = state.stripe().map_err(checkout_error_to_response)?;

    let request = request.validate().map_err(checkout_error_to_response)?;
    let totals = compute_totals(&request.items, &request.shipping_option)
        .map_err(checkout_error_to_response)?;

    info!(
        "Creating Stripe session: {} items, order_total={}",
        request.items.len(),
        totals.order_total
    );

    let session = gateway
        .create_session(&request, &totals)
        .await
        .map_err(|e| {
            error!("Failed to create Stripe session: {}", e);
            checkout_error_to_response(e)
        })?;

    Ok(Json(StripeCheckoutResponse {
        session_id: session.reference,
        url: session.redirect_url,
    }))
}

/// Create a PayPal order
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn paypal_create(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<PayPalCreateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let gateway = state.paypal().map_err(checkout_error_to_response)?;

    let request = request.validate().map_err(checkout_error_to_response)?;
    let totals = compute_totals(&request.items, &request.shipping_option)
        .map_err(checkout_error_to_response)?;

    info!(
        "Creating PayPal order: {} items, order_total={}",
        request.items.len(),
        totals.order_total
    );

    let session = gateway
        .create_session(&request, &totals)
        .await
        .map_err(|e| {
            error!("Failed to create PayPal order: {}", e);
            checkout_error_to_response(e)
        })?;

    Ok(Json(PayPalCreateResponse {
        order_id: session.reference,
        approve_url: session.redirect_url,
    }))
}

/// Capture a previously approved PayPal order
#[instrument(skip(state, request), fields(order_id = %request.order_id))]
pub async fn paypal_capture(
    State(state): State<AppState>,
    Json(request): Json<PayPalCaptureRequest>,
) -> Result<Json<PayPalCaptureResponse>, (StatusCode, Json<ErrorResponse>)> {
    let gateway = state.paypal().map_err(checkout_error_to_response)?;

    if request.order_id.trim().is_empty() {
        return Err(checkout_error_to_response(CheckoutError::validation(
            "orderId is required",
        )));
    }

    let outcome = gateway
        .capture_order(&request.order_id)
        .await
        .map_err(|e| {
            error!("Failed to capture PayPal order {}: {}", request.order_id, e);
            checkout_error_to_response(e)
        })?;

    Ok(Json(PayPalCaptureResponse {
        status: outcome.status,
    }))
}

/// Confirmation page; query values are untrusted and escaped by the
/// template
#[derive(Template)]
#[template(path = "success.html")]
struct SuccessPage<'a> {
    provider: &'a str,
    reference: &'a str,
}

/// Checkout success page.
///
/// The cart clear itself happens client-side behind the reconciliation
/// guard; this page renders the confirmation from the return parameters.
pub async fn checkout_success(Query(params): Query<SuccessParams>) -> impl IntoResponse {
    let page = SuccessPage {
        provider: params.provider.as_deref().unwrap_or("unknown"),
        reference: params.reference().unwrap_or("none"),
    };
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render success page: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_validation_error_includes_details() {
        let err = CheckoutError::Validation {
            issues: vec!["items list is empty".into()],
        };
        let (status, Json(body)) = checkout_error_to_response(err);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.details.unwrap(), vec!["items list is empty"]);
    }

    #[test]
    fn test_configuration_error_maps_to_500() {
        let err = CheckoutError::Configuration("Stripe is not configured".into());
        let (status, Json(body)) = checkout_error_to_response(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.details.is_none());
    }

    #[test]
    fn test_incomplete_capture_maps_to_bad_gateway() {
        let err = CheckoutError::IncompleteCapture {
            status: "PENDING".into(),
        };
        let (status, _) = checkout_error_to_response(err);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
