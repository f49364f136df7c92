//! HTTP request handlers.
//!
//! - [`chat`] - `POST /chat`
//! - [`health`] - `GET /health`
//! - [`page`] - `GET /`

pub mod chat;
pub mod health;
pub mod page;

pub use chat::{ChatReply, ChatRequest};
pub use health::HealthResponse;
