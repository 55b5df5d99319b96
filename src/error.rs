// src/error.rs

//! Unified error handling for the newsroom client.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport-level failure (connection refused, timeout, DNS, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// Server answered 401; the stored credential has been cleared
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Server answered 403
    #[error("Access denied")]
    AccessDenied,

    /// An authenticated endpoint was called without a credential
    #[error("Not logged in")]
    Unauthenticated,

    /// Response body did not match the expected schema
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an HTTP status error.
    pub fn http(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a schema decoding error.
    pub fn decode(endpoint: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for transport failures that never reached the server.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// True for errors that require the user to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Unauthenticated)
    }
}
