//! # Application State
//!
//! Shared state for the Axum application: site configuration and the two
//! payment gateways. Gateways are optional: a missing credential set is a
//! startup warning, and requests against that provider return a
//! configuration error without attempting any provider call.

use checkout_core::{BoxedPaymentProvider, CheckoutError, CheckoutResult, SiteConfig};
use checkout_paypal::PayPalGateway;
use checkout_stripe::StripeGateway;
use std::sync::Arc;
use tracing::warn;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Stripe gateway, when configured
    pub stripe: Option<BoxedPaymentProvider>,
    /// PayPal gateway, when configured
    pub paypal: Option<BoxedPaymentProvider>,
    /// Site configuration
    pub site: SiteConfig,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the environment. Unconfigured providers are logged
    /// and left out; their endpoints fail with a configuration error.
    pub fn from_env() -> Self {
        let config = AppConfig::from_env();
        let site = SiteConfig::from_env();

        let stripe = match StripeGateway::from_env(site.clone()) {
            Ok(gateway) => Some(Arc::new(gateway) as BoxedPaymentProvider),
            Err(e) => {
                warn!("Stripe checkout disabled: {}", e);
                None
            }
        };

        let paypal = match PayPalGateway::from_env(site.clone()) {
            Ok(gateway) => Some(Arc::new(gateway) as BoxedPaymentProvider),
            Err(e) => {
                warn!("PayPal checkout disabled: {}", e);
                None
            }
        };

        Self {
            stripe,
            paypal,
            site,
            config,
        }
    }

    /// Build state with explicit providers (tests)
    pub fn with_providers(
        stripe: Option<BoxedPaymentProvider>,
        paypal: Option<BoxedPaymentProvider>,
        site: SiteConfig,
    ) -> Self {
        Self {
            stripe,
            paypal,
            site,
            config: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
            },
        }
    }

    /// Names of the providers that are configured
    pub fn providers(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.stripe.is_some() {
            names.push("stripe");
        }
        if self.paypal.is_some() {
            names.push("paypal");
        }
        names
    }

    /// The Stripe gateway, or a configuration error reported before any
    /// provider call is attempted
    pub fn stripe(&self) -> CheckoutResult<&BoxedPaymentProvider> {
        self.stripe.as_ref().ok_or_else(|| {
            CheckoutError::Configuration("Stripe is not configured on this server".to_string())
        })
    }

    /// The PayPal gateway, with the same not-configured semantics
    pub fn paypal(&self) -> CheckoutResult<&BoxedPaymentProvider> {
        self.paypal.as_ref().ok_or_else(|| {
            CheckoutError::Configuration("PayPal is not configured on this server".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_unconfigured_providers_fail_without_network() {
        let state =
            AppState::with_providers(None, None, SiteConfig::new("http://localhost:3000", "Shop"));

        assert!(state.providers().is_empty());
        assert!(matches!(
            state.stripe().unwrap_err(),
            CheckoutError::Configuration(_)
        ));
        assert!(matches!(
            state.paypal().unwrap_err(),
            CheckoutError::Configuration(_)
        ));
    }
}
