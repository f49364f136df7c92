//! Chat handler.

use crate::error::ChatFailure;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Prefix of the reply text when a turn fails.
pub const ERROR_PREFIX: &str = "Sorry, I encountered an error: ";

/// Number of reply characters written to the log.
const LOG_PREVIEW_CHARS: usize = 120;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

/// Reply to `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub user_id: String,
    pub response: String,

    /// Set when the turn failed; `response` then carries the apology text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ChatFailure>,
}

/// Run one chat turn for a user.
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<ChatReply> {
    info!(user = %request.user_id, message = %request.message, "Chat request");

    let result = match state.sessions.get_or_create(&request.user_id).await {
        Ok(session_id) => {
            state
                .runtime
                .respond(&session_id, &request.user_id, &request.message)
                .await
        }
        Err(e) => Err(e),
    };

    let reply = match result {
        Ok(response) => ChatReply {
            user_id: request.user_id,
            response,
            error: None,
        },
        Err(e) => {
            error!(user = %request.user_id, "Chat turn failed: {}", e);
            ChatReply {
                user_id: request.user_id,
                response: format!("{}{}", ERROR_PREFIX, e),
                error: Some(ChatFailure::from(&e)),
            }
        }
    };

    info!(user = %reply.user_id, "Chat response: {}...", preview(&reply.response, LOG_PREVIEW_CHARS));
    Json(reply)
}

/// First `max_chars` characters of `text`.
fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
