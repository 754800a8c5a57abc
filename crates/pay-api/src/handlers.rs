//! # Request Handlers
//!
//! Axum request handlers for the payment relay.
//! Every JSON response uses the `{err_no, err_tips, data?}` envelope.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        OriginalUri, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pay_core::{
    now_rfc3339, CallbackHeaders, OrderQuery, OrderRecord, PaymentError, PreOrder,
    PreOrderResult,
};
use pay_douyin::dispatch_callback;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 0 on success, otherwise the HTTP-style error code
    pub err_no: u16,
    pub err_tips: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            err_no: 0,
            err_tips: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(err_no: u16, err_tips: impl Into<String>) -> Self {
        Self {
            err_no,
            err_tips: err_tips.into(),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success envelope without data
    pub fn ok() -> Self {
        Self {
            err_no: 0,
            err_tips: "success".to_string(),
            data: None,
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Create pre-order request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreOrderRequest {
    #[serde(default)]
    pub order_id: Option<Value>,
    /// Amount in yuan, as a number or numeric string
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub product_name: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub membership_type: Option<Value>,
}

impl PreOrderRequest {
    /// Validate into a `PreOrder`
    pub fn into_pre_order(self) -> Result<PreOrder, PaymentError> {
        let amount = match self.amount {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        let mut order = PreOrder::new(
            value_text(self.order_id).unwrap_or_default(),
            amount.unwrap_or_default(),
            value_text(self.product_name).unwrap_or_default(),
        )?;

        if let Some(user_id) = value_text(self.user_id) {
            order = order.with_user(user_id);
        }
        if let Some(membership_type) = value_text(self.membership_type) {
            order = order.with_membership_type(membership_type);
        }

        Ok(order)
    }
}

/// Query order request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOrderRequest {
    #[serde(default)]
    pub order_id: Option<Value>,
    #[serde(default)]
    pub out_order_no: Option<Value>,
}

impl QueryOrderRequest {
    pub fn into_query(self) -> Result<OrderQuery, PaymentError> {
        OrderQuery::new(value_text(self.order_id), value_text(self.out_order_no))
    }
}

/// Text of a string or number field; anything else counts as absent
fn value_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Convert a payment error into an envelope.
///
/// In production, details of internal errors are replaced by a generic message.
pub fn payment_error_to_response(err: PaymentError, production: bool) -> ApiError {
    let code = err.status_code();
    let tips = if !err.is_internal() {
        err.to_string()
    } else if production {
        "internal server error".to_string()
    } else {
        format!("internal server error: {}", err)
    };

    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ApiResponse::error(code, tips)),
    )
}

/// Classify a body extraction failure; oversized bodies keep their 413
fn body_rejection(status: StatusCode, text: String) -> PaymentError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        PaymentError::PayloadTooLarge(text)
    } else {
        PaymentError::Validation(format!("invalid request body: {}", text))
    }
}

fn signature_failure() -> PaymentError {
    PaymentError::SignatureMismatch("signature verification failed".to_string())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "OK",
        "service": state.config.service_name,
        "timestamp": now_rfc3339(),
        "environment": state.config.environment,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Root redirects to the health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/api/health")])
}

/// Create a signed pre-order
#[instrument(skip(state, payload))]
pub async fn create_pre_order(
    State(state): State<AppState>,
    payload: Result<Json<PreOrderRequest>, JsonRejection>,
) -> ApiResult<PreOrderResult> {
    let Json(request) = payload.map_err(|e| {
        warn!("Rejected pre-order body: {}", e.body_text());
        payment_error_to_response(
            body_rejection(e.status(), e.body_text()),
            state.config.is_production(),
        )
    })?;

    info!("Received pre-order request: {:?}", request);

    let order = request
        .into_pre_order()
        .map_err(|e| payment_error_to_response(e, state.config.is_production()))?;

    let result = state.gateway.create_pre_order(&order).await.map_err(|e| {
        error!("Failed to create pre-order: {}", e);
        payment_error_to_response(e, state.config.is_production())
    })?;

    info!("Returning pre-order result: {:?}", result);

    Ok(Json(ApiResponse::success(result)))
}

/// Handle a payment callback from the platform.
///
/// Once the signature is accepted the platform always receives a success
/// envelope, even if processing fails, so it does not retry.
#[instrument(skip(state, headers, body))]
pub async fn payment_notify(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let production = state.config.is_production();

    let body = body.map_err(|e| {
        warn!("Rejected callback body: {}", e.body_text());
        payment_error_to_response(body_rejection(e.status(), e.body_text()), production)
    })?;

    let callback_headers = CallbackHeaders::from_pairs(
        headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?.to_string()))),
    );

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Callback body is not valid JSON: {}", e);
            return Err(payment_error_to_response(signature_failure(), production));
        }
    };

    if !state.gateway.verify_callback(&callback_headers, &payload) {
        error!(
            provider = state.gateway.provider_name(),
            "Callback signature verification failed"
        );
        return Err(payment_error_to_response(signature_failure(), production));
    }

    info!("Callback signature verified");

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        dispatch_callback(state.callbacks.as_ref(), &payload)
    }));

    match outcome {
        Ok(Ok(notification)) => info!(
            order_id = ?notification.out_order_no,
            status = ?notification.order_status,
            "Callback processed"
        ),
        Ok(Err(e)) => error!("Callback processing failed: {}", e),
        Err(_) => error!("Callback processing panicked"),
    }

    Ok(Json(ApiResponse::ok()))
}

/// Query an order's status
#[instrument(skip(state, payload))]
pub async fn query_order(
    State(state): State<AppState>,
    payload: Result<Json<QueryOrderRequest>, JsonRejection>,
) -> ApiResult<OrderRecord> {
    let Json(request) = payload.map_err(|e| {
        warn!("Rejected query body: {}", e.body_text());
        payment_error_to_response(
            body_rejection(e.status(), e.body_text()),
            state.config.is_production(),
        )
    })?;

    let query = request
        .into_query()
        .map_err(|e| payment_error_to_response(e, state.config.is_production()))?;

    let record = state.gateway.query_order(&query).await.map_err(|e| {
        error!("Failed to query order: {}", e);
        payment_error_to_response(e, state.config.is_production())
    })?;

    Ok(Json(ApiResponse::success(record)))
}

/// Fallback for unmatched routes and methods
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    payment_error_to_response(PaymentError::NotFound { path }, false)
}

/// Response for panics caught by the catch-all layer
pub fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    error!("Unhandled panic while serving request");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error(500, "internal server error")),
    )
        .into_response()
}
