//! # PayPal Configuration
//!
//! Client credentials and environment selection for the PayPal Orders v2
//! adapter. Secrets are loaded from environment variables.

use checkout_core::CheckoutError;
use std::env;

/// Live API base URL
pub const PAYPAL_API_LIVE: &str = "https://api-m.paypal.com";
/// Sandbox API base URL
pub const PAYPAL_API_SANDBOX: &str = "https://api-m.sandbox.paypal.com";

/// PayPal API configuration
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    /// OAuth client id
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// API base URL (sandbox, live, or a test override)
    pub api_base_url: String,
}

impl PayPalConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYPAL_CLIENT_ID`
    /// - `PAYPAL_CLIENT_SECRET`
    ///
    /// `PAYPAL_ENVIRONMENT` selects `sandbox` (default) or `live`.
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok();

        let client_id = env::var("PAYPAL_CLIENT_ID")
            .map_err(|_| CheckoutError::Configuration("PAYPAL_CLIENT_ID not set".to_string()))?;
        let client_secret = env::var("PAYPAL_CLIENT_SECRET").map_err(|_| {
            CheckoutError::Configuration("PAYPAL_CLIENT_SECRET not set".to_string())
        })?;

        let api_base_url = match env::var("PAYPAL_ENVIRONMENT").as_deref() {
            Ok("live") => PAYPAL_API_LIVE.to_string(),
            Ok("sandbox") | Err(_) => PAYPAL_API_SANDBOX.to_string(),
            Ok(other) => {
                return Err(CheckoutError::Configuration(format!(
                    "PAYPAL_ENVIRONMENT must be 'sandbox' or 'live', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            client_id,
            client_secret,
            api_base_url,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_url: PAYPAL_API_SANDBOX.to_string(),
        }
    }

    /// Check if pointed at the sandbox
    pub fn is_sandbox(&self) -> bool {
        self.api_base_url == PAYPAL_API_SANDBOX
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}
