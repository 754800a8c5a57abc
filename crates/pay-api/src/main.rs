//! # byte-pay-relay
//!
//! Douyin pay pre-order, callback and query relay.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export DOUYIN_APP_ID=tt...
//! export DOUYIN_MERCHANT_ID=...
//! export DOUYIN_PAYMENT_SALT=...
//! export DOUYIN_CALLBACK_TOKEN=...
//! export PUBLIC_BASE_URL=https://pay.example.com
//!
//! # Run the server
//! byte-pay-relay
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.gateway.provider_name());

    // Create router
    let callback_path = state.gateway.callback_path();
    let app = routes::create_router(state);

    info!("Payment relay starting on http://{}", addr);

    if !is_prod {
        info!("Health: GET http://{}/api/health", addr);
        info!("Pre-order: POST http://{}/api/payment/pre-order", addr);
        info!("Callback: POST http://{}{}", addr, callback_path);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  byte-pay-relay
  ━━━━━━━━━━━━━━━━━━━━━━━
  Douyin pay relay
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
