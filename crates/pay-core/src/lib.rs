//! # pay-core
//!
//! Core types and traits for the byte-pay-relay payment relay.
//!
//! This crate provides:
//! - `PaymentGateway` trait for payment platform integrations
//! - `PreOrder`, `OrderQuery` and `OrderRecord` for the order flow
//! - `CallbackHeaders` and `CallbackNotification` for platform callbacks
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{PaymentGateway, PreOrder};
//!
//! let order = PreOrder::new("ORD-1", 9.9, "Monthly")?;
//! let result = gateway.create_pre_order(&order).await?;
//!
//! // Hand result.order_token to the mini-program
//! ```

pub mod error;
pub mod gateway;
pub mod order;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use gateway::{BoxedPaymentGateway, CallbackHeaders, PaymentGateway};
pub use order::{
    now_rfc3339, CallbackNotification, OrderQuery, OrderRecord, OrderStatus, PreOrder,
    PreOrderResult,
};
