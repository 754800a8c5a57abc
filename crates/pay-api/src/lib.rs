//! # pay-api
//!
//! HTTP API layer for byte-pay-relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Pre-order and order query endpoints
//! - The platform payment callback endpoint
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Redirect to health check |
//! | GET | `/api/health` | Health check |
//! | POST | `/api/payment/pre-order` | Create signed pre-order |
//! | POST | `/api/payment/notify` | Payment callback |
//! | POST | `/api/payment/query-order` | Query order status |

pub mod handlers;
pub mod routes;
pub mod state;

pub use handlers::ApiResponse;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
