//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment gateway, the callback handler and configuration.

use pay_core::BoxedPaymentGateway;
use pay_douyin::{CallbackHandler, DouyinGateway, LoggingCallbackHandler};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Service name reported by the health check
    pub service_name: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "byte-pay-relay".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway
    pub gateway: BoxedPaymentGateway,
    /// Handler for verified payment callbacks
    pub callbacks: Arc<dyn CallbackHandler>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with the Douyin gateway
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let gateway = DouyinGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Douyin pay: {}", e))?;

        Ok(Self::with_parts(
            config,
            Arc::new(gateway),
            Arc::new(LoggingCallbackHandler),
        ))
    }

    /// Assemble state from explicit parts (for testing)
    pub fn with_parts(
        config: AppConfig,
        gateway: BoxedPaymentGateway,
        callbacks: Arc<dyn CallbackHandler>,
    ) -> Self {
        Self {
            gateway,
            callbacks,
            config,
        }
    }

    /// Swap the callback handler
    pub fn with_callbacks(mut self, callbacks: Arc<dyn CallbackHandler>) -> Self {
        self.callbacks = callbacks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        // Clear env vars for test
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("ENVIRONMENT");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(!config.is_production());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            service_name: "byte-pay-relay".to_string(),
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_socket_addr_invalid_host() {
        let config = AppConfig {
            host: "not a host".to_string(),
            port: 3000,
            environment: "production".to_string(),
            service_name: "byte-pay-relay".to_string(),
        };

        assert!(config.socket_addr().is_err());
        assert!(config.is_production());
    }
}
