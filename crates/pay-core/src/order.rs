//! # Order Types
//!
//! Pre-order, order query and callback types for byte-pay-relay.
//! Every value here lives for a single request; nothing is persisted.

use crate::error::{PaymentError, PaymentResult};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated pre-order request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreOrder {
    /// Merchant-side order number (becomes `out_order_no`)
    pub order_id: String,

    /// Amount in yuan, as sent by the client
    pub amount: f64,

    /// Product display name
    pub product_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_type: Option<String>,
}

impl PreOrder {
    /// Create a pre-order, rejecting blank fields and zero or non-finite amounts
    pub fn new(
        order_id: impl Into<String>,
        amount: f64,
        product_name: impl Into<String>,
    ) -> PaymentResult<Self> {
        let order_id = order_id.into();
        let product_name = product_name.into();

        if order_id.is_empty() || product_name.is_empty() || !amount.is_finite() || amount == 0.0
        {
            return Err(PaymentError::Validation(
                "missing required parameters: orderId, amount, productName".to_string(),
            ));
        }

        Ok(Self {
            order_id,
            amount,
            product_name,
            user_id: None,
            membership_type: None,
        })
    }

    /// Set the requesting user
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the membership tier being bought
    pub fn with_membership_type(mut self, membership_type: impl Into<String>) -> Self {
        self.membership_type = Some(membership_type.into());
        self
    }

    /// Amount in fen (smallest unit). Halves round toward positive infinity,
    /// so `-0.125` becomes `-12`.
    pub fn amount_cents(&self) -> i64 {
        (self.amount * 100.0 + 0.5).floor() as i64
    }
}

/// Result of a (mock) pre-order call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreOrderResult {
    /// Platform order id
    pub order_id: String,

    /// Token the client uses to launch the payment sheet
    pub order_token: String,

    /// Echo of the merchant order number
    pub out_order_no: String,

    /// Outbound request signature
    pub sign: String,

    /// RFC 3339 creation time
    pub timestamp: String,
}

/// Order query by platform id or merchant order number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    pub order_id: Option<String>,
    pub out_order_no: Option<String>,
}

impl OrderQuery {
    /// Build a query; at least one non-empty identifier is required
    pub fn new(order_id: Option<String>, out_order_no: Option<String>) -> PaymentResult<Self> {
        let order_id = order_id.filter(|s| !s.is_empty());
        let out_order_no = out_order_no.filter(|s| !s.is_empty());

        if order_id.is_none() && out_order_no.is_none() {
            return Err(PaymentError::Validation("missing order id".to_string()));
        }

        Ok(Self {
            order_id,
            out_order_no,
        })
    }

    /// Platform order id, falling back to the merchant order number
    pub fn order_id(&self) -> &str {
        self.order_id
            .as_deref()
            .or(self.out_order_no.as_deref())
            .unwrap_or_default()
    }

    /// Merchant order number, falling back to the platform order id
    pub fn out_order_no(&self) -> &str {
        self.out_order_no
            .as_deref()
            .or(self.order_id.as_deref())
            .unwrap_or_default()
    }
}

/// Order status as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Payment completed
    Success,
    /// Awaiting payment
    Processing,
    /// Payment failed
    Fail,
    /// Order expired before payment
    Timeout,
}

impl OrderStatus {
    /// Parse the platform's status text
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "SUCCESS" => Some(OrderStatus::Success),
            "PROCESSING" => Some(OrderStatus::Processing),
            "FAIL" => Some(OrderStatus::Fail),
            "TIMEOUT" => Some(OrderStatus::Timeout),
            _ => None,
        }
    }
}

/// Order record returned by order queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub out_order_no: String,
    pub status: OrderStatus,
    /// Amount paid in fen
    pub total_fee: i64,
    /// RFC 3339 payment time
    pub pay_time: String,
    /// Platform pay channel code
    pub pay_channel: u32,
}

/// Fields decoded from a verified payment callback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackNotification {
    pub out_order_no: Option<String>,
    pub order_status: Option<String>,
    pub total_fee: Option<i64>,
    pub pay_time: Option<String>,
    pub transaction_id: Option<String>,
}

impl CallbackNotification {
    /// Decode from a callback body. The body must be a JSON object; individual
    /// fields are optional and accept either strings or numbers.
    pub fn from_body(body: &Value) -> PaymentResult<Self> {
        let obj = body.as_object().ok_or_else(|| {
            PaymentError::Serialization("callback body is not an object".to_string())
        })?;

        let text = |key: &str| -> Option<String> {
            match obj.get(key)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };

        let total_fee = match obj.get("total_fee") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        Ok(Self {
            out_order_no: text("out_order_no"),
            order_status: text("order_status"),
            total_fee,
            pay_time: text("pay_time"),
            transaction_id: text("transaction_id"),
        })
    }

    /// Parsed order status, if recognised
    pub fn status(&self) -> Option<OrderStatus> {
        self.order_status.as_deref().and_then(OrderStatus::parse)
    }

    /// Check if the callback reports a completed payment
    pub fn is_paid(&self) -> bool {
        self.status() == Some(OrderStatus::Success)
    }
}

/// Current time in the RFC 3339 form used across responses
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
