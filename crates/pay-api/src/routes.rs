//! # Routes
//!
//! Axum router configuration for the payment relay.

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Maximum accepted request body
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Create the main application router
///
/// Routes:
/// - Payment:
///   - POST /api/payment/pre-order - Sign and place a pre-order
///   - POST /api/payment/notify - Platform payment callback
///   - POST /api/payment/query-order - Query an order's status
///
/// - Service:
///   - GET /api/health - Health check
///   - GET / - Redirects to /api/health
///
/// Anything else, including a known path with the wrong method, gets a 404
/// envelope naming the path.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let payment_routes = Router::new()
        .route(
            "/pre-order",
            post(handlers::create_pre_order).fallback(handlers::not_found),
        )
        .route(
            "/notify",
            post(handlers::payment_notify).fallback(handlers::not_found),
        )
        .route(
            "/query-order",
            post(handlers::query_order).fallback(handlers::not_found),
        );

    Router::new()
        .route("/", get(handlers::root).fallback(handlers::not_found))
        .route(
            "/api/health",
            get(handlers::health).fallback(handlers::not_found),
        )
        .nest("/api/payment", payment_routes)
        .fallback(handlers::not_found)
        // Middleware
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handlers::handle_panic))
        // State
        .with_state(state)
}
