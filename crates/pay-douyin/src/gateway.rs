//! # Douyin Gateway
//!
//! `PaymentGateway` implementation for Douyin pay. Pre-orders are signed for
//! real but never sent; order ids, tokens and query results are mock values.

use crate::config::DouyinConfig;
use crate::signature::{generate_outbound_signature, verify_callback_signature};
use async_trait::async_trait;
use chrono::Utc;
use pay_core::{
    now_rfc3339, CallbackHeaders, OrderQuery, OrderRecord, OrderStatus, PaymentGateway,
    PaymentResult, PreOrder, PreOrderResult,
};
use serde_json::{json, Map, Value};
use tracing::{info, instrument};
use uuid::Uuid;

/// Seconds a pre-order stays payable
pub const ORDER_VALID_TIME_SECS: u64 = 1800;

/// Pay channel code reported for Douyin pay
pub const PAY_CHANNEL_DOUYIN: u32 = 10;

/// Fee (in fen) reported by the mock order query
pub const MOCK_TOTAL_FEE: i64 = 2990;

const ORDER_SUBJECT_PREFIX: &str = "Membership service";
const ORDER_BODY: &str = "Premium membership, unlocks all features";

/// Douyin pay gateway (mock transport)
#[derive(Debug, Clone)]
pub struct DouyinGateway {
    config: DouyinConfig,
}

impl DouyinGateway {
    /// Create a new gateway with config
    pub fn new(config: DouyinConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = DouyinConfig::from_env()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &DouyinConfig {
        &self.config
    }

    /// Parameters signed for a pre-order.
    ///
    /// `app_id` is carried along but excluded from the digest.
    pub fn pre_order_sign_params(&self, order: &PreOrder) -> Map<String, Value> {
        let params = json!({
            "app_id": self.config.app_id,
            "out_order_no": order.order_id,
            "total_amount": order.amount_cents(),
            "subject": format!("{} - {}", ORDER_SUBJECT_PREFIX, order.product_name),
            "body": ORDER_BODY,
            "valid_time": ORDER_VALID_TIME_SECS,
            "notify_url": self.config.notify_url(),
        });

        match params {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for DouyinGateway {
    #[instrument(skip(self, order), fields(out_order_no = %order.order_id))]
    async fn create_pre_order(&self, order: &PreOrder) -> PaymentResult<PreOrderResult> {
        let params = self.pre_order_sign_params(order);
        let sign = generate_outbound_signature(&params, &self.config.payment_salt);

        let result = PreOrderResult {
            order_id: format!(
                "DOUYIN_{}_{}",
                Utc::now().timestamp_millis(),
                random_hex(6)
            ),
            order_token: format!("TOKEN_{}", random_hex(16)),
            out_order_no: order.order_id.clone(),
            sign,
            timestamp: now_rfc3339(),
        };

        info!(
            "Created pre-order: order_id={}, out_order_no={}, amount={}",
            result.order_id,
            result.out_order_no,
            order.amount_cents()
        );

        Ok(result)
    }

    async fn query_order(&self, query: &OrderQuery) -> PaymentResult<OrderRecord> {
        Ok(OrderRecord {
            order_id: query.order_id().to_string(),
            out_order_no: query.out_order_no().to_string(),
            status: OrderStatus::Success,
            total_fee: MOCK_TOTAL_FEE,
            pay_time: now_rfc3339(),
            pay_channel: PAY_CHANNEL_DOUYIN,
        })
    }

    fn verify_callback(&self, headers: &CallbackHeaders, body: &Value) -> bool {
        verify_callback_signature(headers, body, &self.config.callback_token)
    }

    fn provider_name(&self) -> &'static str {
        "douyin"
    }
}

fn random_hex(len: usize) -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(len);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::sign_callback;

    fn gateway() -> DouyinGateway {
        DouyinGateway::new(DouyinConfig::new(
            "tt_app",
            "merchant",
            "salt",
            "cb_token",
            "https://pay.example.com",
        ))
    }

    #[test]
    fn test_pre_order_sign_params() {
        let order = PreOrder::new("ORD1", 9.9, "Pro").unwrap();
        let params = gateway().pre_order_sign_params(&order);

        assert_eq!(params["app_id"], "tt_app");
        assert_eq!(params["total_amount"], 990);
        assert_eq!(params["subject"], "Membership service - Pro");
        assert_eq!(params["valid_time"], 1800);
        assert_eq!(
            params["notify_url"],
            "https://pay.example.com/api/payment/notify"
        );
    }

    #[tokio::test]
    async fn test_create_pre_order() {
        let order = PreOrder::new("ORD1", 9.9, "Pro").unwrap();
        let result = gateway().create_pre_order(&order).await.unwrap();

        // md5 of the sorted values of the pre-order field set plus "salt"
        assert_eq!(result.sign, "1d90a2c00ef70d33d6b26aadf4a916e6");
        assert_eq!(result.out_order_no, "ORD1");
        assert!(result.order_id.starts_with("DOUYIN_"));
        assert_eq!(result.order_id.rsplit('_').next().unwrap().len(), 6);
        assert_eq!(result.order_token.len(), "TOKEN_".len() + 16);
    }

    #[tokio::test]
    async fn test_pre_order_ids_are_unique() {
        let order = PreOrder::new("ORD1", 9.9, "Pro").unwrap();
        let gateway = gateway();
        let first = gateway.create_pre_order(&order).await.unwrap();
        let second = gateway.create_pre_order(&order).await.unwrap();

        assert_ne!(first.order_token, second.order_token);
        assert_eq!(first.sign, second.sign);
    }

    #[tokio::test]
    async fn test_query_order_is_mock_success() {
        let query = OrderQuery::new(None, Some("OUT1".into())).unwrap();
        let record = gateway().query_order(&query).await.unwrap();

        assert_eq!(record.order_id, "OUT1");
        assert_eq!(record.status, OrderStatus::Success);
        assert_eq!(record.total_fee, 2990);
        assert_eq!(record.pay_channel, 10);
    }

    #[test]
    fn test_verify_callback_uses_callback_token() {
        let gateway = gateway();
        let body = json!({ "out_order_no": "ORD1", "order_status": "SUCCESS" });
        let sig = sign_callback("cb_token", "1700000000", "nonce", &body).unwrap();

        assert!(gateway.verify_callback(&CallbackHeaders::new("1700000000", "nonce", sig), &body));

        let wrong = sign_callback("salt", "1700000000", "nonce", &body).unwrap();
        assert!(!gateway.verify_callback(&CallbackHeaders::new("1700000000", "nonce", wrong), &body));
    }
}
