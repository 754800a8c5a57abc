//! # pay-check
//!
//! Deployment smoke test for byte-pay-relay.
//!
//! ```bash
//! pay-check https://pay.example.com
//! # or
//! PAY_CHECK_BASE_URL=https://pay.example.com pay-check
//! ```

use anyhow::Context;
use pay_check::DeploymentChecker;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PAY_CHECK_BASE_URL").ok())
        .context("usage: pay-check <BASE_URL> (or set PAY_CHECK_BASE_URL)")?;

    let checker = DeploymentChecker::new(&base_url)?;

    println!("Checking deployment at {}\n", base_url);

    let outcomes = checker.run_all().await;
    for outcome in &outcomes {
        println!("{}\n", outcome.report());
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    if failed == 0 {
        println!("All {} checks passed", outcomes.len());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{} of {} checks failed", failed, outcomes.len());
        Ok(ExitCode::FAILURE)
    }
}
