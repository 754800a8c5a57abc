//! # pay-douyin
//!
//! Douyin (ByteDance mini-program) pay integration for byte-pay-relay.
//!
//! This crate provides:
//!
//! 1. **Signatures** - outbound MD5 request signing and inbound SHA-1
//!    callback verification
//! 2. **DouyinGateway** - `PaymentGateway` implementation returning mock
//!    order ids, tokens and query results
//! 3. **Callbacks** - dispatch of verified callbacks to a `CallbackHandler`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_douyin::DouyinGateway;
//! use pay_core::{PaymentGateway, PreOrder};
//!
//! let gateway = DouyinGateway::from_env()?;
//!
//! let order = PreOrder::new("ORD-1", 9.9, "Monthly")?;
//! let result = gateway.create_pre_order(&order).await?;
//! ```
//!
//! ## Callback Handling
//!
//! ```rust,ignore
//! use pay_douyin::{dispatch_callback, CallbackHandler};
//!
//! struct MyHandler;
//!
//! impl CallbackHandler for MyHandler {
//!     fn on_payment_succeeded(&self, n: &CallbackNotification) -> PaymentResult<()> {
//!         println!("Order {:?} paid", n.out_order_no);
//!         Ok(())
//!     }
//! }
//!
//! // In your callback endpoint:
//! if gateway.verify_callback(&headers, &body) {
//!     dispatch_callback(&MyHandler, &body)?;
//! }
//! ```

pub mod callback;
pub mod config;
pub mod gateway;
pub mod signature;

// Re-exports
pub use callback::{dispatch_callback, CallbackHandler, LoggingCallbackHandler};
pub use config::DouyinConfig;
pub use gateway::DouyinGateway;
pub use signature::{
    callback_signature, generate_outbound_signature, sign_callback, verify_callback_signature,
    SIGN_EXCLUDED_FIELDS,
};
