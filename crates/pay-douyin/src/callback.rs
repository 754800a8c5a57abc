//! # Payment Callbacks
//!
//! Handling for verified Douyin pay callbacks. Verification happens before
//! anything here runs; these hooks only see authenticated payloads.

use pay_core::{CallbackNotification, OrderStatus, PaymentResult};
use serde_json::Value;
use tracing::{info, warn};

/// Callback handler trait
///
/// Implement this trait to act on payment outcomes.
pub trait CallbackHandler: Send + Sync {
    /// Called when a payment completed
    fn on_payment_succeeded(&self, notification: &CallbackNotification) -> PaymentResult<()> {
        info!(
            order_id = ?notification.out_order_no,
            status = ?notification.order_status,
            amount = ?notification.total_fee,
            pay_time = ?notification.pay_time,
            transaction_id = ?notification.transaction_id,
            "Payment succeeded"
        );
        Ok(())
    }

    /// Called when a payment failed or the order timed out
    fn on_payment_failed(&self, notification: &CallbackNotification) -> PaymentResult<()> {
        warn!(
            order_id = ?notification.out_order_no,
            status = ?notification.order_status,
            transaction_id = ?notification.transaction_id,
            "Payment not completed"
        );
        Ok(())
    }

    /// Called for pending or unrecognised statuses
    fn on_other_status(&self, notification: &CallbackNotification) -> PaymentResult<()> {
        info!(
            order_id = ?notification.out_order_no,
            status = ?notification.order_status,
            "Unhandled payment status"
        );
        Ok(())
    }
}

/// Default handler (just logs callbacks)
pub struct LoggingCallbackHandler;

impl CallbackHandler for LoggingCallbackHandler {}

/// Decode a verified callback body and dispatch it to the handler
pub fn dispatch_callback(
    handler: &dyn CallbackHandler,
    body: &Value,
) -> PaymentResult<CallbackNotification> {
    let notification = CallbackNotification::from_body(body)?;

    match notification.status() {
        Some(OrderStatus::Success) => handler.on_payment_succeeded(&notification)?,
        Some(OrderStatus::Fail) | Some(OrderStatus::Timeout) => {
            handler.on_payment_failed(&notification)?
        }
        Some(OrderStatus::Processing) | None => handler.on_other_status(&notification)?,
    }

    Ok(notification)
}
