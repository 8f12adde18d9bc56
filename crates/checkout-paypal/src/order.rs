//! # PayPal Orders v2
//!
//! Two-phase protocol matching PayPal's own contract: create an order from
//! the validated, priced checkout request, then capture it after the
//! customer approves. Capture succeeds only on a `COMPLETED` status; any
//! other status is a definite failure with no automatic retry; the caller
//! decides whether to try again.

use crate::config::PayPalConfig;
use async_trait::async_trait;
use checkout_core::{
    format_major_units, CaptureOutcome, CheckoutError, CheckoutRequest, CheckoutResult,
    OrderTotals, PaymentProvider, PaymentSession, ShippingAddress, SiteConfig,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Longest item name PayPal accepts
const MAX_ITEM_NAME_LEN: usize = 127;

/// The only capture status treated as success
pub const CAPTURE_COMPLETED: &str = "COMPLETED";

/// PayPal Orders v2 adapter
pub struct PayPalGateway {
    config: PayPalConfig,
    site: SiteConfig,
    client: Client,
}

impl PayPalGateway {
    /// Create a new PayPal gateway
    pub fn new(config: PayPalConfig, site: SiteConfig) -> Self {
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
        let config = PayPalConfig::from_env()?;
        Ok(Self::new(config, site))
    }

    /// Fetch an OAuth2 access token via client credentials
    async fn access_token(&self) -> CheckoutResult<String> {
        let url = format!("{}/v1/oauth2/token", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("PayPal token error: status={}, body={}", status, body);
            return Err(CheckoutError::Provider {
                provider: "paypal".to_string(),
                message: format!("token request failed with HTTP {}", status),
            });
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse PayPal token response: {}", e))
        })?;

        Ok(token.access_token)
    }

    /// Build the order-create body from the validated request and totals
    fn build_order_body(&self, request: &CheckoutRequest, totals: &OrderTotals) -> OrderRequest {
        let currency = self.site.currency_upper();
        let addr = &request.shipping_address;

        let items = request
            .items
            .iter()
            .map(|item| OrderItem {
                name: truncate_name(&item.title),
                unit_amount: Money {
                    currency_code: currency.clone(),
                    value: format_major_units(item.unit_amount),
                },
                quantity: item.quantity.to_string(),
            })
            .collect();

        OrderRequest {
            intent: OrderIntent::Capture,
            purchase_units: vec![PurchaseUnit {
                amount: AmountWithBreakdown {
                    currency_code: currency.clone(),
                    value: format_major_units(totals.order_total),
                    breakdown: AmountBreakdown {
                        item_total: Money {
                            currency_code: currency.clone(),
                            value: format_major_units(totals.items_total),
                        },
                        shipping: Money {
                            currency_code: currency,
                            value: format_major_units(totals.shipping_total),
                        },
                    },
                },
                items,
                shipping: Shipping {
                    name: FullName {
                        full_name: format!("{} {}", addr.first_name, addr.last_name),
                    },
                    address: portable_address(addr),
                },
            }],
            payer: Payer {
                email_address: request.customer.email.clone(),
                name: PayerName {
                    given_name: request.customer.first_name.clone(),
                    surname: request.customer.last_name.clone(),
                },
                phone: request.customer.phone.as_deref().map(phone_number),
                // The checkout form collects one address; it stands in as
                // the billing address too
                address: portable_address(addr),
            },
            application_context: ApplicationContext {
                brand_name: self.site.brand_name.clone(),
                // The customer already entered their address; don't let the
                // PayPal wallet substitute a different one
                shipping_preference: "SET_PROVIDED_ADDRESS".to_string(),
                user_action: "PAY_NOW".to_string(),
            },
        }
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> CheckoutResult<(reqwest::StatusCode, String)> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;
        Ok((status, text))
    }

    fn provider_failure(status: reqwest::StatusCode, body: &str) -> CheckoutError {
        error!("PayPal API error: status={}, body={}", status, body);
        if let Ok(err) = serde_json::from_str::<PayPalErrorResponse>(body) {
            let detail = err
                .details
                .first()
                .and_then(|d| d.description.as_deref())
                .unwrap_or(&err.message);
            return CheckoutError::Provider {
                provider: "paypal".to_string(),
                message: detail.to_string(),
            };
        }
        CheckoutError::Provider {
            provider: "paypal".to_string(),
            message: format!("HTTP {}", status),
        }
    }
}

#[async_trait]
impl PaymentProvider for PayPalGateway {
    #[instrument(skip(self, request, totals), fields(items = request.items.len(), order_total = totals.order_total))]
    async fn create_session(
        &self,
        request: &CheckoutRequest,
        totals: &OrderTotals,
    ) -> CheckoutResult<PaymentSession> {
        let token = self.access_token().await?;
        let body = self.build_order_body(request, totals);

        debug!(
            "Creating PayPal order: {} items, total={}",
            request.items.len(),
            body.purchase_units[0].amount.value
        );

        let (status, text) = self.post_json("/v2/checkout/orders", &token, &body).await?;

        if !status.is_success() {
            return Err(Self::provider_failure(status, &text));
        }

        let order: OrderResponse = serde_json::from_str(&text).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse PayPal order response: {}", e))
        })?;

        let order_id = order.id.filter(|id| !id.is_empty()).ok_or_else(|| {
            CheckoutError::Provider {
                provider: "paypal".to_string(),
                message: "order response did not include an order id".to_string(),
            }
        })?;

        info!("Created PayPal order: id={}", order_id);

        let approve_url = order
            .links
            .iter()
            .find(|l| l.rel == "approve")
            .map(|l| l.href.clone());

        Ok(PaymentSession {
            provider: "paypal".to_string(),
            reference: order_id,
            redirect_url: approve_url,
        })
    }

    #[instrument(skip(self))]
    async fn capture_order(&self, reference: &str) -> CheckoutResult<CaptureOutcome> {
        let token = self.access_token().await?;
        let path = format!("/v2/checkout/orders/{}/capture", reference);

        // Capture takes an empty body; the order id in the path is the input
        let (status, text) = self
            .post_json(&path, &token, &serde_json::json!({}))
            .await?;

        if !status.is_success() {
            return Err(Self::provider_failure(status, &text));
        }

        let capture: CaptureResponse = serde_json::from_str(&text).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse PayPal capture response: {}", e))
        })?;

        if capture.status != CAPTURE_COMPLETED {
            // A response arrived but the capture is not definitively done
            return Err(CheckoutError::IncompleteCapture {
                status: capture.status,
            });
        }

        info!("Captured PayPal order: id={}", reference);

        Ok(CaptureOutcome {
            status: capture.status,
        })
    }

    fn provider_name(&self) -> &'static str {
        "paypal"
    }
}

fn portable_address(addr: &ShippingAddress) -> PortableAddress {
    PortableAddress {
        address_line_1: addr.address_line1.clone(),
        address_line_2: addr.address_line2.clone(),
        admin_area_2: addr.city.clone(),
        admin_area_1: addr.region.clone(),
        postal_code: addr.postal_code.clone(),
        country_code: addr.country.clone(),
    }
}

/// PayPal wants the national number as digits only
fn phone_number(raw: &str) -> Phone {
    Phone {
        phone_number: PhoneNumber {
            national_number: raw.chars().filter(|c| c.is_ascii_digit()).collect(),
        },
    }
}

/// Truncate an item name to PayPal's maximum, on a char boundary
fn truncate_name(name: &str) -> String {
    if name.chars().count() <= MAX_ITEM_NAME_LEN {
        name.to_string()
    } else {
        name.chars().take(MAX_ITEM_NAME_LEN).collect()
    }
}

// =============================================================================
// PayPal API Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum OrderIntent {
    Capture,
}

#[derive(Debug, Serialize)]
struct Money {
    currency_code: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct AmountBreakdown {
    item_total: Money,
    shipping: Money,
}

#[derive(Debug, Serialize)]
struct AmountWithBreakdown {
    currency_code: String,
    value: String,
    breakdown: AmountBreakdown,
}

#[derive(Debug, Serialize)]
struct OrderItem {
    name: String,
    unit_amount: Money,
    quantity: String,
}

#[derive(Debug, Serialize)]
struct FullName {
    full_name: String,
}

#[derive(Debug, Serialize)]
struct PortableAddress {
    address_line_1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_line_2: Option<String>,
    admin_area_2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_area_1: Option<String>,
    postal_code: String,
    country_code: String,
}

#[derive(Debug, Serialize)]
struct Shipping {
    name: FullName,
    address: PortableAddress,
}

#[derive(Debug, Serialize)]
struct PurchaseUnit {
    amount: AmountWithBreakdown,
    items: Vec<OrderItem>,
    shipping: Shipping,
}

#[derive(Debug, Serialize)]
struct PayerName {
    given_name: String,
    surname: String,
}

#[derive(Debug, Serialize)]
struct PhoneNumber {
    national_number: String,
}

#[derive(Debug, Serialize)]
struct Phone {
    phone_number: PhoneNumber,
}

#[derive(Debug, Serialize)]
struct Payer {
    email_address: String,
    name: PayerName,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<Phone>,
    address: PortableAddress,
}

#[derive(Debug, Serialize)]
struct ApplicationContext {
    brand_name: String,
    shipping_preference: String,
    user_action: String,
}

#[derive(Debug, Serialize)]
struct OrderRequest {
    intent: OrderIntent,
    purchase_units: Vec<PurchaseUnit>,
    payer: Payer,
    application_context: ApplicationContext,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct LinkDescription {
    href: String,
    rel: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    links: Vec<LinkDescription>,
}

#[derive(Debug, Deserialize)]
struct CaptureResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct PayPalErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<PayPalErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct PayPalErrorDetail {
    #[serde(default)]
    description: Option<String>,
}
