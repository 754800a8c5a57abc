//! # pay-check
//!
//! Smoke checks against a deployed byte-pay-relay instance. Each check
//! issues one request and reports pass (HTTP 200) or fail with the response.

use chrono::Utc;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Per-request timeout
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result of one endpoint check
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// e.g. `GET /api/health`
    pub name: String,
    pub status: Option<u16>,
    pub body: String,
    /// Transport error, if the request never completed
    pub error: Option<String>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.status == Some(200)
    }

    /// Human-readable report; JSON bodies are pretty-printed
    pub fn report(&self) -> String {
        let mark = if self.passed() { "PASS" } else { "FAIL" };

        let detail = match (&self.error, self.status) {
            (Some(err), _) => format!("request failed: {}", err),
            (None, Some(status)) => {
                let body = serde_json::from_str::<Value>(&self.body)
                    .ok()
                    .and_then(|v| serde_json::to_string_pretty(&v).ok())
                    .unwrap_or_else(|| self.body.clone());
                format!("status {}\n{}", status, body)
            }
            (None, None) => "no response".to_string(),
        };

        format!("[{}] {} - {}", mark, self.name, detail)
    }
}

/// Runs smoke checks against one deployment
pub struct DeploymentChecker {
    client: reqwest::Client,
    base_url: String,
}

impl DeploymentChecker {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CheckError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CheckError::InvalidBaseUrl(base_url));
        }

        let client = reqwest::Client::builder()
            .timeout(CHECK_TIMEOUT)
            .user_agent(concat!("pay-check/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub async fn check_get(&self, path: &str) -> CheckOutcome {
        let request = self.client.get(format!("{}{}", self.base_url, path));
        self.run(format!("GET {}", path), request).await
    }

    pub async fn check_post(&self, path: &str, body: &Value) -> CheckOutcome {
        let request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        self.run(format!("POST {}", path), request).await
    }

    /// Health check followed by a test pre-order
    pub async fn run_all(&self) -> Vec<CheckOutcome> {
        vec![
            self.check_get("/api/health").await,
            self.check_post("/api/payment/pre-order", &sample_pre_order())
                .await,
        ]
    }

    async fn run(&self, name: String, request: reqwest::RequestBuilder) -> CheckOutcome {
        debug!("Checking {}", name);

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                CheckOutcome {
                    name,
                    status: Some(status),
                    body,
                    error: None,
                }
            }
            Err(e) => CheckOutcome {
                name,
                status: None,
                body: String::new(),
                error: Some(if e.is_timeout() {
                    "timed out".to_string()
                } else {
                    e.to_string()
                }),
            },
        }
    }
}

/// A throwaway pre-order request
pub fn sample_pre_order() -> Value {
    json!({
        "orderId": format!("test_{}", Utc::now().timestamp_millis()),
        "amount": 9.9,
        "productName": "Monthly membership test",
        "userId": "test_user",
        "membershipType": "premium_monthly"
    })
}
