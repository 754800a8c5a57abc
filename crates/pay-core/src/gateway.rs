//! # Payment Gateway Trait
//!
//! Strategy seam between the HTTP layer and a payment platform.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentGateway (trait)                   │
//! │  ├── create_pre_order()                                     │
//! │  ├── query_order()                                          │
//! │  ├── verify_callback()                                      │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │ DouyinGateway │
//!                    │    (mock)     │
//!                    └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::order::{OrderQuery, OrderRecord, PreOrder, PreOrderResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// The three platform headers attached to every payment callback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackHeaders {
    pub timestamp: Option<String>,
    pub nonce: Option<String>,
    pub signature: Option<String>,
}

impl CallbackHeaders {
    pub const TIMESTAMP: &'static str = "byte-timestamp";
    pub const NONCE: &'static str = "byte-nonce-str";
    pub const SIGNATURE: &'static str = "byte-signature";

    /// Create from explicit values (for testing)
    pub fn new(
        timestamp: impl Into<String>,
        nonce: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            nonce: Some(nonce.into()),
            signature: Some(signature.into()),
        }
    }

    /// Collect the callback headers from name/value pairs.
    ///
    /// Header names are matched case-insensitively; unrelated headers are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut headers = Self::default();
        for (name, value) in pairs {
            let name = name.as_ref();
            if name.eq_ignore_ascii_case(Self::TIMESTAMP) {
                headers.timestamp = Some(value.into());
            } else if name.eq_ignore_ascii_case(Self::NONCE) {
                headers.nonce = Some(value.into());
            } else if name.eq_ignore_ascii_case(Self::SIGNATURE) {
                headers.signature = Some(value.into());
            }
        }
        headers
    }
}

/// Core trait for payment platform integrations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Sign and place a pre-order.
    ///
    /// # Returns
    /// The platform order id and token plus the outbound signature.
    async fn create_pre_order(&self, order: &PreOrder) -> PaymentResult<PreOrderResult>;

    /// Look up the state of an order.
    async fn query_order(&self, query: &OrderQuery) -> PaymentResult<OrderRecord>;

    /// Verify a payment callback signature.
    ///
    /// Never fails: any problem while verifying yields `false`.
    fn verify_callback(&self, headers: &CallbackHeaders, body: &Value) -> bool;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;

    /// Get the callback endpoint path for this provider.
    fn callback_path(&self) -> &'static str {
        "/api/payment/notify"
    }
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;
