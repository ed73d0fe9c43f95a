//! Error handling for the health engine
//!
//! This module defines all error types used throughout the crate.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the health engine
pub type Result<T> = std::result::Result<T, HealthError>;

/// Main error type for the health engine
#[derive(Error, Debug)]
pub enum HealthError {
    /// Rejected builder input: missing values or reserved detail keys
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The async runtime driving the checks is unavailable
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Metrics registry errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResponseError for HealthError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            HealthError::InvalidArgument(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_ARGUMENT",
                self.to_string(),
            ),
            HealthError::Config(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            HealthError::Runtime(_) => (
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                "RUNTIME_UNAVAILABLE",
                self.to_string(),
            ),
            _ => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}

/// Helper functions for creating specific errors
impl HealthError {
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn runtime<S: Into<String>>(message: S) -> Self {
        Self::Runtime(message.into())
    }
}
