//! Gateway error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wayfarer_agent::AgentError;

/// Errors that can occur in the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Agent error.
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// Not found error.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status for the error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Json(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Category of a failed chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The model API failed.
    Provider,
    /// A tool could not be run.
    Tool,
    /// Session lookup or storage failed.
    Session,
    /// Anything else.
    Internal,
}

/// Typed error attached to a chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl From<&AgentError> for ChatFailure {
    fn from(err: &AgentError) -> Self {
        let kind = match err {
            AgentError::Provider(_) => FailureKind::Provider,
            e if e.is_tool_error() => FailureKind::Tool,
            e if e.is_session_error() => FailureKind::Session,
            _ => FailureKind::Internal,
        };

        Self {
            kind,
            detail: err.to_string(),
        }
    }
}
