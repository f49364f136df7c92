//! Agent error types.

use std::io;
use thiserror::Error;
use wayfarer_memory::MemoryError;
use wayfarer_providers::ProviderError;

/// Errors that can occur during agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Model provider error.
    #[error("Model API error: {0}")]
    Provider(#[from] ProviderError),

    /// Knowledge base or preference store error.
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    /// Session not found.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Session could not be created or updated.
    #[error("Session error: {0}")]
    Session(String),

    /// Tool not found.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool execution error.
    #[error("Tool execution failed: {0}")]
    ToolExecution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// Create a tool execution error.
    pub fn tool_execution(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a session error.
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error came from a tool rather than the model or session
    /// layer.
    pub fn is_tool_error(&self) -> bool {
        matches!(self, Self::ToolNotFound(_) | Self::ToolExecution(_))
    }

    /// Whether the error came from session bookkeeping.
    pub fn is_session_error(&self) -> bool {
        matches!(self, Self::SessionNotFound(_) | Self::Session(_))
    }
}
