//! # Douyin Pay Configuration
//!
//! Configuration management for the Douyin pay integration.
//! All secrets are loaded from environment variables; there are no
//! built-in fallback values.

use pay_core::PaymentError;
use std::env;
use std::fmt;

/// Douyin pay configuration
#[derive(Clone)]
pub struct DouyinConfig {
    /// Mini-program application id (tt...)
    pub app_id: String,

    /// Merchant id
    pub merchant_id: String,

    /// Salt for outbound request signatures
    pub payment_salt: String,

    /// Token for callback signature verification
    pub callback_token: String,

    /// Public base URL of this service, without trailing slash
    pub public_base_url: String,
}

impl DouyinConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `DOUYIN_APP_ID`
    /// - `DOUYIN_MERCHANT_ID`
    /// - `DOUYIN_PAYMENT_SALT`
    /// - `DOUYIN_CALLBACK_TOKEN`
    /// - `PUBLIC_BASE_URL`
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| PaymentError::Configuration(format!("{} not set", key)))
        };

        let public_base_url = required("PUBLIC_BASE_URL")?;
        if !public_base_url.starts_with("http://") && !public_base_url.starts_with("https://") {
            return Err(PaymentError::Configuration(
                "PUBLIC_BASE_URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            app_id: required("DOUYIN_APP_ID")?,
            merchant_id: required("DOUYIN_MERCHANT_ID")?,
            payment_salt: required("DOUYIN_PAYMENT_SALT")?,
            callback_token: required("DOUYIN_CALLBACK_TOKEN")?,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        app_id: impl Into<String>,
        merchant_id: impl Into<String>,
        payment_salt: impl Into<String>,
        callback_token: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            merchant_id: merchant_id.into(),
            payment_salt: payment_salt.into(),
            callback_token: callback_token.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL the platform posts payment callbacks to
    pub fn notify_url(&self) -> String {
        format!("{}/api/payment/notify", self.public_base_url)
    }
}

impl fmt::Debug for DouyinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DouyinConfig")
            .field("app_id", &self.app_id)
            .field("merchant_id", &self.merchant_id)
            .field("payment_salt", &"<redacted>")
            .field("callback_token", &"<redacted>")
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DOUYIN_APP_ID", "tt0000000000000000"),
            ("DOUYIN_MERCHANT_ID", "7000000000"),
            ("DOUYIN_PAYMENT_SALT", "salt"),
            ("DOUYIN_CALLBACK_TOKEN", "token"),
            ("PUBLIC_BASE_URL", "https://pay.example.com/"),
        ])
    }

    #[test]
    fn test_from_lookup() {
        let vars = vars();
        let config = DouyinConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.app_id, "tt0000000000000000");
        assert_eq!(config.public_base_url, "https://pay.example.com");
        assert_eq!(
            config.notify_url(),
            "https://pay.example.com/api/payment/notify"
        );
    }

    #[test]
    fn test_from_lookup_missing_or_blank_key() {
        let mut vars = vars();
        vars.remove("DOUYIN_PAYMENT_SALT");
        let err = DouyinConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap_err();
        assert!(err.to_string().contains("DOUYIN_PAYMENT_SALT"));

        let mut vars = self::vars();
        vars.insert("DOUYIN_CALLBACK_TOKEN", "   ");
        assert!(DouyinConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).is_err());
    }

    #[test]
    fn test_from_lookup_rejects_bad_base_url() {
        let mut vars = vars();
        vars.insert("PUBLIC_BASE_URL", "pay.example.com");
        assert!(DouyinConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = DouyinConfig::new("tt1", "m1", "s3cret", "t0ken", "http://localhost:8080");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("t0ken"));
    }

    #[test]
    fn test_from_env_missing_key() {
        env::remove_var("DOUYIN_CALLBACK_TOKEN");

        let result = DouyinConfig::from_env();
        assert!(result.is_err());
    }
}
