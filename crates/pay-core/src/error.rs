//! # Payment Error Types
//!
//! Typed error handling for the byte-pay-relay payment relay.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing env vars, blank secrets)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required request field is missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Callback signature did not match
    #[error("{0}")]
    SignatureMismatch(String),

    /// Request body exceeded the accepted size
    #[error("request body too large: {0}")]
    PayloadTooLarge(String),

    /// No route matched the request
    #[error("route not found: {path}")]
    NotFound { path: String },

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error.
    ///
    /// The same value is reported as `err_no` in the response envelope.
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::Validation(_) => 400,
            PaymentError::SignatureMismatch(_) => 400,
            PaymentError::PayloadTooLarge(_) => 413,
            PaymentError::NotFound { .. } => 404,
            PaymentError::Internal(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }

    /// Returns true if the error exposes internal details that should be
    /// scrubbed before leaving a production deployment
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Serialization(err.to_string())
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PaymentError::Validation("missing".into()).status_code(), 400);
        assert_eq!(
            PaymentError::SignatureMismatch("bad".into()).status_code(),
            400
        );
        assert_eq!(
            PaymentError::NotFound {
                path: "/x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(
            PaymentError::PayloadTooLarge("limit".into()).status_code(),
            413
        );
        assert_eq!(PaymentError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_internal_errors() {
        assert!(PaymentError::Internal("boom".into()).is_internal());
        assert!(PaymentError::Configuration("unset".into()).is_internal());
        assert!(!PaymentError::Validation("missing".into()).is_internal());
        assert!(!PaymentError::PayloadTooLarge("limit".into()).is_internal());
    }

    #[test]
    fn test_not_found_message_names_path() {
        let err = PaymentError::NotFound {
            path: "/unknown/path".into(),
        };
        assert_eq!(err.to_string(), "route not found: /unknown/path");
    }

    #[test]
    fn test_from_serde_error() {
        let err: PaymentError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, PaymentError::Serialization(_)));
    }
}
