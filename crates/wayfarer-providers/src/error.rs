//! Error types for model providers.

use thiserror::Error;

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Provider error types.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Authentication error (invalid API key, etc.).
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Invalid request (bad parameters, etc.).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Content filtered (safety filters triggered).
    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    /// Server error from the provider.
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create a rate limit error.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit(message.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a content filtered error.
    pub fn content_filtered(message: impl Into<String>) -> Self {
        Self::ContentFiltered(message.into())
    }

    /// Create a server error.
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Map a non-success HTTP status and its error message.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::auth(message),
            429 => Self::rate_limit(message),
            400 => Self::invalid_request(message),
            _ => Self::server_error(status, message),
        }
    }
}
