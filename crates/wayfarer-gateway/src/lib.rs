//! HTTP chat gateway for Wayfarer.
//!
//! This crate provides:
//! - `POST /chat` backed by the agent runtime
//! - `GET /` serving the static chat page
//! - `GET /health`

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::{ChatFailure, FailureKind, GatewayError};
pub use handlers::{ChatReply, ChatRequest};
pub use server::{Gateway, GatewayConfig};
pub use state::AppState;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
