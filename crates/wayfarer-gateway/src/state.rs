//! Process-wide state shared by the handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use wayfarer_agent::{AgentRuntime, SessionManager};

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    /// User to session mapping.
    pub sessions: Arc<SessionManager>,

    /// Agent runtime.
    pub runtime: Arc<AgentRuntime>,

    /// Static chat page.
    index_html: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        sessions: Arc<SessionManager>,
        runtime: Arc<AgentRuntime>,
        index_html: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sessions,
            runtime,
            index_html: Arc::new(index_html.into()),
        }
    }

    /// Path of the static chat page.
    pub fn index_html(&self) -> &Path {
        &self.index_html
    }
}
