//! # Storefront Checkout
//!
//! Checkout and payment-session API for the storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export PAYPAL_CLIENT_ID=...
//! export PAYPAL_CLIENT_SECRET=...
//! export SITE_URL=https://shop.example
//!
//! # Run the server
//! storefront-checkout
//! ```

use checkout_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    // Initialize application state
    let state = AppState::from_env();

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Site: {} ({})", state.site.brand_name, state.site.base_url);
    info!("Currency: {}", state.site.currency);
    info!("Payment providers: {:?}", state.providers());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Storefront checkout starting on http://{}", addr);

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("Stripe checkout: POST http://{}/checkout/stripe", addr);
        info!("PayPal create: POST http://{}/checkout/paypal/create", addr);
        info!("PayPal capture: POST http://{}/checkout/paypal/capture", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Storefront Checkout
  ━━━━━━━━━━━━━━━━━━━
  Cart, totals, and payment sessions
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
