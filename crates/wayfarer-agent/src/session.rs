//! Session management.
//!
//! A [`SessionService`] owns sessions and their conversation history. The
//! [`SessionManager`] maps each user to exactly one session id, creating it
//! through the service on the user's first message.

use crate::error::AgentError;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;
use wayfarer_providers::Message;

/// A conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session id.
    pub id: String,

    /// Application the session belongs to.
    pub app_name: String,

    /// Owning user.
    pub user_id: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with a fresh id.
    pub fn new(app_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            app_name: app_name.into(),
            user_id: user_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// Storage for sessions and their history.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Create a new session for a user.
    async fn create_session(&self, app_name: &str, user_id: &str) -> Result<Session>;

    /// Conversation history of a session, oldest first.
    async fn history(&self, session_id: &str) -> Result<Vec<Message>>;

    /// Append messages to a session's history.
    async fn append(&self, session_id: &str, messages: Vec<Message>) -> Result<()>;
}

struct SessionRecord {
    session: Session,
    messages: Vec<Message>,
}

/// Session service that keeps everything in process memory.
#[derive(Default)]
pub struct InMemorySessionService {
    records: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session by id.
    pub async fn get(&self, session_id: &str) -> Option<Session> {
        let records = self.records.read().await;
        records.get(session_id).map(|r| r.session.clone())
    }

    /// Number of sessions.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create_session(&self, app_name: &str, user_id: &str) -> Result<Session> {
        let session = Session::new(app_name, user_id);
        let mut records = self.records.write().await;
        records.insert(
            session.id.clone(),
            SessionRecord {
                session: session.clone(),
                messages: Vec::new(),
            },
        );
        Ok(session)
    }

    async fn history(&self, session_id: &str) -> Result<Vec<Message>> {
        let records = self.records.read().await;
        records
            .get(session_id)
            .map(|r| r.messages.clone())
            .ok_or_else(|| AgentError::SessionNotFound(session_id.to_string()))
    }

    async fn append(&self, session_id: &str, messages: Vec<Message>) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(session_id)
            .ok_or_else(|| AgentError::SessionNotFound(session_id.to_string()))?;
        record.messages.extend(messages);
        Ok(())
    }
}

/// Maps user ids to session ids.
pub struct SessionManager {
    service: Arc<dyn SessionService>,
    app_name: String,
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionManager {
    /// Create a new session manager.
    pub fn new(service: Arc<dyn SessionService>, app_name: impl Into<String>) -> Self {
        Self {
            service,
            app_name: app_name.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Get the session id for a user, creating a session on first use.
    pub async fn get_or_create(&self, user_id: &str) -> Result<String> {
        if let Some(id) = self.sessions.read().await.get(user_id) {
            return Ok(id.clone());
        }

        // Held across creation so concurrent first requests share one session.
        let mut sessions = self.sessions.write().await;
        if let Some(id) = sessions.get(user_id) {
            debug!("Session for {} created concurrently", user_id);
            return Ok(id.clone());
        }

        let session = self
            .service
            .create_session(&self.app_name, user_id)
            .await?;
        info!(user = %user_id, session = %session.id, "Created session");
        sessions.insert(user_id.to_string(), session.id.clone());

        Ok(session.id)
    }

    /// Session id for a user, if one exists.
    pub async fn lookup(&self, user_id: &str) -> Option<String> {
        self.sessions.read().await.get(user_id).cloned()
    }

    /// Number of users with a session.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// The underlying session service.
    pub fn service(&self) -> Arc<dyn SessionService> {
        self.service.clone()
    }
}
