// src/error.rs

//! Unified error handling for the regeneration crawler.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be constructed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Local metadata store failed
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Outbound call failed after its retry budget
    #[error("Network error for {context}: {source}")]
    Network {
        context: String,
        #[source]
        source: NetworkError,
    },

    /// The wiki API answered with an error object
    #[error("API error [{code}]: {info}")]
    Api { code: String, info: String },

    /// Worker pool or aggregator failure
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a pipeline error.
    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline(message.into())
    }

    /// Wrap a network failure with the call it belongs to.
    pub fn network(context: impl Into<String>, source: NetworkError) -> Self {
        Self::Network {
            context: context.into(),
            source,
        }
    }
}

/// Failure of a single outbound call.
///
/// Every variant except [`NetworkError::Request`] is transient and may be
/// retried by a [`RetryPolicy`](crate::utils::retry::RetryPolicy);
/// `Status` is retried only for 5xx, 408 and 429.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The call did not complete within the configured timeout
    #[error("timed out: {0}")]
    Timeout(String),

    /// Connection could not be established (includes DNS failures)
    #[error("connection failed: {0}")]
    Connect(String),

    /// The response could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Any other transport-layer failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered with a non-success status
    #[error("HTTP status {code}")]
    Status { code: u16 },

    /// The request itself is invalid; never retried
    #[error("invalid request: {0}")]
    Request(String),
}

impl NetworkError {
    /// Classify a reqwest failure into the closed retryable set.
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        let message = error.to_string();
        if error.is_timeout() {
            Self::Timeout(message)
        } else if error.is_connect() {
            Self::Connect(message)
        } else if error.is_decode() || error.is_body() {
            Self::Malformed(message)
        } else if let Some(status) = error.status() {
            Self::Status {
                code: status.as_u16(),
            }
        } else if error.is_builder() || error.is_redirect() {
            Self::Request(message)
        } else if error.is_request() {
            Self::Transport(message)
        } else {
            Self::Request(message)
        }
    }

    /// Create a malformed-response error.
    pub fn malformed(message: impl fmt::Display) -> Self {
        Self::Malformed(message.to_string())
    }
}
