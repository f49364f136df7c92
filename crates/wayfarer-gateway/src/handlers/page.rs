//! Static chat page.

use crate::error::GatewayError;
use crate::state::AppState;
use crate::Result;
use axum::extract::State;
use axum::response::Html;
use std::io::ErrorKind;

/// Serve the configured HTML page.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let path = state.index_html();
    match tokio::fs::read_to_string(path).await {
        Ok(html) => Ok(Html(html)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(GatewayError::NotFound(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
