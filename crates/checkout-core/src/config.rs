//! # Site Configuration
//!
//! Brand, currency, and redirect URL configuration shared by both payment
//! providers. Built once at process start and threaded to callers, with no
//! module-level global state.

use serde::{Deserialize, Serialize};

/// Site-level checkout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public base URL of the storefront
    pub base_url: String,

    /// Brand name shown on provider-hosted pages
    pub brand_name: String,

    /// ISO 4217 currency code, lowercase for Stripe / uppercase for PayPal
    /// as needed by each adapter
    pub currency: String,

    /// Override for the post-payment redirect; defaults derive from
    /// `base_url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,

    /// Override for the cancel redirect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

impl SiteConfig {
    /// Load from environment variables.
    ///
    /// The base URL resolves through a fallback chain:
    /// `SITE_URL` -> `PUBLIC_SITE_URL` -> `http://localhost:3000`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("SITE_URL")
            .or_else(|_| std::env::var("PUBLIC_SITE_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Self {
            base_url,
            brand_name: std::env::var("BRAND_NAME").unwrap_or_else(|_| "Storefront".to_string()),
            currency: std::env::var("CHECKOUT_CURRENCY").unwrap_or_else(|_| "GBP".to_string()),
            success_url: std::env::var("CHECKOUT_SUCCESS_URL").ok(),
            cancel_url: std::env::var("CHECKOUT_CANCEL_URL").ok(),
        }
    }

    /// Create with explicit values (tests, embedding)
    pub fn new(base_url: impl Into<String>, brand_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            brand_name: brand_name.into(),
            currency: "GBP".to_string(),
            success_url: None,
            cancel_url: None,
        }
    }

    /// Builder: set currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Success URL for Stripe, with the session-id placeholder Stripe
    /// substitutes on redirect
    pub fn stripe_success_url(&self) -> String {
        self.success_url.clone().unwrap_or_else(|| {
            format!(
                "{}/checkout/success?provider=stripe&session_id={{CHECKOUT_SESSION_ID}}",
                self.base_url
            )
        })
    }

    /// Cancel URL: back to the checkout page
    pub fn stripe_cancel_url(&self) -> String {
        self.cancel_url
            .clone()
            .unwrap_or_else(|| format!("{}/checkout", self.base_url))
    }

    /// Currency in Stripe's lowercase wire form
    pub fn currency_lower(&self) -> String {
        self.currency.to_ascii_lowercase()
    }

    /// Currency in PayPal's uppercase wire form
    pub fn currency_upper(&self) -> String {
        self.currency.to_ascii_uppercase()
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000", "Storefront")
    }
}
