//! # Stripe Checkout Sessions
//!
//! Maps a validated, priced checkout request to a Stripe Checkout Session
//! creation call. Line items use live price computation (no pre-created
//! catalog entries); exactly one fixed-amount shipping rate is attached,
//! tagged with the delivery-estimate window for the chosen shipping option.

use crate::config::StripeConfig;
use async_trait::async_trait;
use checkout_core::{
    delivery_estimate_for, CheckoutError, CheckoutRequest, CheckoutResult, OrderTotals,
    PaymentProvider, PaymentSession, SiteConfig,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

/// Stripe hosted-checkout adapter
pub struct StripeGateway {
    config: StripeConfig,
    site: SiteConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(config: StripeConfig, site: SiteConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            site,
            client,
        }
    }

    /// Create from environment variables
    pub fn from_env(site: SiteConfig) -> CheckoutResult<Self> {
        let config = StripeConfig::from_env()?;
        Ok(Self::new(config, site))
    }

    /// Build the form-encoded Checkout Session parameters
    fn build_form_params(
        &self,
        request: &CheckoutRequest,
        totals: &OrderTotals,
    ) -> Vec<(String, String)> {
        let currency = self.site.currency_lower();

        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), self.site.stripe_success_url()),
            ("cancel_url".to_string(), self.site.stripe_cancel_url()),
            ("customer_email".to_string(), request.customer.email.clone()),
            ("allow_promotion_codes".to_string(), "true".to_string()),
        ];

        // Phone collection only when the customer already supplied one
        if request.customer.phone.is_some() {
            params.push((
                "phone_number_collection[enabled]".to_string(),
                "true".to_string(),
            ));
        }

        // One live-priced line item per cart line
        for (i, item) in request.items.iter().enumerate() {
            params.push((
                format!("line_items[{}][price_data][currency]", i),
                currency.clone(),
            ));
            params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount.to_string(),
            ));
            params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.title.clone(),
            ));
            params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        // Exactly one fixed-amount shipping rate
        let option = &request.shipping_option;
        let display_name = option
            .label
            .clone()
            .unwrap_or_else(|| option.id.clone());
        params.push((
            "shipping_options[0][shipping_rate_data][type]".to_string(),
            "fixed_amount".to_string(),
        ));
        params.push((
            "shipping_options[0][shipping_rate_data][fixed_amount][amount]".to_string(),
            totals.shipping_total.to_string(),
        ));
        params.push((
            "shipping_options[0][shipping_rate_data][fixed_amount][currency]".to_string(),
            currency,
        ));
        params.push((
            "shipping_options[0][shipping_rate_data][display_name]".to_string(),
            display_name,
        ));

        if let Some(estimate) = delivery_estimate_for(&option.id) {
            for (bound, value) in [
                ("minimum", estimate.min_business_days),
                ("maximum", estimate.max_business_days),
            ] {
                params.push((
                    format!(
                        "shipping_options[0][shipping_rate_data][delivery_estimate][{}][unit]",
                        bound
                    ),
                    "business_day".to_string(),
                ));
                params.push((
                    format!(
                        "shipping_options[0][shipping_rate_data][delivery_estimate][{}][value]",
                        bound
                    ),
                    value.to_string(),
                ));
            }
        }

        // Shipping restricted to the single submitted country
        params.push((
            "shipping_address_collection[allowed_countries][0]".to_string(),
            request.shipping_address.country.clone(),
        ));

        // Order metadata for fulfilment
        params.push((
            "metadata[order_notes]".to_string(),
            request.notes.clone().unwrap_or_default(),
        ));
        params.push(("metadata[shipping_method]".to_string(), option.id.clone()));
        params.push((
            "metadata[shipping_city]".to_string(),
            request.shipping_address.city.clone(),
        ));
        params.push((
            "metadata[shipping_country]".to_string(),
            request.shipping_address.country.clone(),
        ));

        params
    }
}

#[async_trait]
impl PaymentProvider for StripeGateway {
    #[instrument(skip(self, request, totals), fields(items = request.items.len(), order_total = totals.order_total))]
    async fn create_session(
        &self,
        request: &CheckoutRequest,
        totals: &OrderTotals,
    ) -> CheckoutResult<PaymentSession> {
        let form_params = self.build_form_params(request, totals);

        debug!(
            "Creating Stripe checkout session: {} items, shipping={}",
            request.items.len(),
            request.shipping_option.id
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(CheckoutError::Provider {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(CheckoutError::Provider {
                provider: "stripe".to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let session: StripeSessionResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(PaymentSession {
            provider: "stripe".to_string(),
            reference: session.id,
            redirect_url: session.url,
        })
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{
        compute_totals, CheckoutItem, CustomerContact, ShippingAddress, ShippingOption,
    };
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(shipping_id: &str, phone: Option<&str>) -> CheckoutRequest {
        CheckoutRequest {
            items: vec![
                CheckoutItem {
                    id: "A".into(),
                    title: "Walnut Side Table".into(),
                    quantity: 2,
                    unit_amount: 500,
                },
                CheckoutItem {
                    id: "B".into(),
                    title: "Oak Bench".into(),
                    quantity: 1,
                    unit_amount: 1500,
                },
            ],
            customer: CustomerContact {
                email: "jo@example.com".into(),
                first_name: "Jo".into(),
                last_name: "Bloggs".into(),
                phone: phone.map(Into::into),
            },
            shipping_address: ShippingAddress {
                first_name: "Jo".into(),
                last_name: "Bloggs".into(),
                company: None,
                address_line1: "1 High Street".into(),
                address_line2: None,
                city: "Sheffield".into(),
                region: None,
                postal_code: "S1 1AA".into(),
                country: "gb".into(),
            },
            shipping_option: ShippingOption {
                id: shipping_id.into(),
                label: None,
                description: None,
                amount: 399,
            },
            notes: Some("Leave with neighbour".into()),
        }
        .validate()
        .unwrap()
    }

    fn gateway(site_base: &str) -> StripeGateway {
        StripeGateway::new(
            StripeConfig::new("sk_test_abc").with_api_base_url(site_base),
            SiteConfig::new("https://shop.example", "Shop"),
        )
    }

    fn form_value(params: &[(String, String)], key: &str) -> Option<String> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    #[test]
    fn test_form_params_line_items_and_metadata() {
        let gateway = gateway("https://api.stripe.com");
        let req = request("standard", None);
        let totals = compute_totals(&req.items, &req.shipping_option).unwrap();
        let params = gateway.build_form_params(&req, &totals);

        assert_eq!(
            form_value(&params, "line_items[0][price_data][unit_amount]").as_deref(),
            Some("500")
        );
        assert_eq!(
            form_value(&params, "line_items[1][price_data][product_data][name]").as_deref(),
            Some("Oak Bench")
        );
        assert_eq!(
            form_value(&params, "line_items[0][quantity]").as_deref(),
            Some("2")
        );
        assert_eq!(
            form_value(&params, "metadata[order_notes]").as_deref(),
            Some("Leave with neighbour")
        );
        assert_eq!(
            form_value(&params, "metadata[shipping_method]").as_deref(),
            Some("standard")
        );
        assert_eq!(
            form_value(&params, "metadata[shipping_city]").as_deref(),
            Some("Sheffield")
        );
        assert_eq!(
            form_value(&params, "metadata[shipping_country]").as_deref(),
            Some("GB")
        );
        assert_eq!(
            form_value(&params, "shipping_address_collection[allowed_countries][0]").as_deref(),
            Some("GB")
        );
        assert_eq!(
            form_value(&params, "allow_promotion_codes").as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_empty_notes_become_empty_string() {
        let gateway = gateway("https://api.stripe.com");
        let mut req = request("standard", None);
        req.notes = None;
        let totals = compute_totals(&req.items, &req.shipping_option).unwrap();
        let params = gateway.build_form_params(&req, &totals);
        assert_eq!(form_value(&params, "metadata[order_notes]").as_deref(), Some(""));
    }

    #[test]
    fn test_delivery_estimate_by_shipping_option() {
        let gateway = gateway("https://api.stripe.com");

        let express = request("express", None);
        let totals = compute_totals(&express.items, &express.shipping_option).unwrap();
        let params = gateway.build_form_params(&express, &totals);
        assert_eq!(
            form_value(
                &params,
                "shipping_options[0][shipping_rate_data][delivery_estimate][minimum][value]"
            )
            .as_deref(),
            Some("1")
        );
        assert_eq!(
            form_value(
                &params,
                "shipping_options[0][shipping_rate_data][delivery_estimate][maximum][value]"
            )
            .as_deref(),
            Some("2")
        );

        let collect = request("collect", None);
        let totals = compute_totals(&collect.items, &collect.shipping_option).unwrap();
        let params = gateway.build_form_params(&collect, &totals);
        assert!(!params
            .iter()
            .any(|(k, _)| k.contains("delivery_estimate")));

        let other = request("economy", None);
        let totals = compute_totals(&other.items, &other.shipping_option).unwrap();
        let params = gateway.build_form_params(&other, &totals);
        assert_eq!(
            form_value(
                &params,
                "shipping_options[0][shipping_rate_data][delivery_estimate][maximum][value]"
            )
            .as_deref(),
            Some("5")
        );
    }

    #[test]
    fn test_phone_collection_only_when_phone_supplied() {
        let gateway = gateway("https://api.stripe.com");

        let with_phone = request("standard", Some("+441234567890"));
        let totals = compute_totals(&with_phone.items, &with_phone.shipping_option).unwrap();
        let params = gateway.build_form_params(&with_phone, &totals);
        assert_eq!(
            form_value(&params, "phone_number_collection[enabled]").as_deref(),
            Some("true")
        );

        let without = request("standard", None);
        let totals = compute_totals(&without.items, &without.shipping_option).unwrap();
        let params = gateway.build_form_params(&without, &totals);
        assert!(form_value(&params, "phone_number_collection[enabled]").is_none());
    }

    #[tokio::test]
    async fn test_create_session_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header("Authorization", "Bearer sk_test_abc"))
            .and(body_string_contains("mode=payment"))
            .and(body_string_contains("customer_email=jo%40example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cs_test_123",
                "url": "https://checkout.stripe.com/c/pay/cs_test_123"
            })))
            .mount(&server)
            .await;

        let gateway = gateway(&server.uri());
        let req = request("standard", None);
        let totals = compute_totals(&req.items, &req.shipping_option).unwrap();

        let session = gateway.create_session(&req, &totals).await.unwrap();
        assert_eq!(session.provider, "stripe");
        assert_eq!(session.reference, "cs_test_123");
        assert!(session.redirect_url.unwrap().contains("cs_test_123"));
    }

    #[tokio::test]
    async fn test_provider_error_surfaces_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "Invalid currency: zzz" }
            })))
            .mount(&server)
            .await;

        let gateway = gateway(&server.uri());
        let req = request("standard", None);
        let totals = compute_totals(&req.items, &req.shipping_option).unwrap();

        let err = gateway.create_session(&req, &totals).await.unwrap_err();
        match err {
            CheckoutError::Provider { provider, message } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "Invalid currency: zzz");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }
}
