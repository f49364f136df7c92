//! Shared fakes for the integration tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use wayfarer_agent::{InMemorySessionService, Session, SessionService};
use wayfarer_memory::EmbeddingProvider;
use wayfarer_providers::{
    ChatOptions, ChatResponse, Message, Provider, ProviderError, StopReason, ToolUse, Usage,
};

/// Embeds text as its normalised a-z letter histogram.
pub struct LetterEmbeddings;

impl LetterEmbeddings {
    pub fn vector(text: &str) -> Vec<f32> {
        let mut counts = vec![0f32; 26];
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            counts[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        let norm = counts.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            counts.iter_mut().for_each(|v| *v /= norm);
        }
        counts
    }
}

#[async_trait]
impl EmbeddingProvider for LetterEmbeddings {
    fn dimension(&self) -> usize {
        26
    }

    async fn embed(&self, texts: &[String]) -> wayfarer_memory::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}

/// One scripted model reply.
pub enum Step {
    Text(String),
    Call { name: String, input: Value },
    Fail,
}

impl Step {
    pub fn text(s: &str) -> Self {
        Self::Text(s.to_string())
    }

    pub fn call(name: &str, input: Value) -> Self {
        Self::Call {
            name: name.to_string(),
            input,
        }
    }
}

/// Provider that replays a fixed script and records every request.
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Conversations sent to the model so far.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        _options: Option<ChatOptions>,
    ) -> wayfarer_providers::Result<ChatResponse> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let step = self.steps.lock().unwrap().pop_front();

        let (content, tool_calls) = match step {
            Some(Step::Text(text)) => (text, Vec::new()),
            Some(Step::Call { name, input }) => (
                String::new(),
                vec![ToolUse {
                    id: format!("call-{}", name),
                    name,
                    input,
                }],
            ),
            Some(Step::Fail) => return Err(ProviderError::server_error(500, "model unavailable")),
            None => return Err(ProviderError::internal("script exhausted")),
        };

        let stop_reason = if tool_calls.is_empty() {
            StopReason::EndTurn
        } else {
            StopReason::ToolUse
        };
        Ok(ChatResponse {
            id: "scripted".to_string(),
            model: model.to_string(),
            content,
            tool_calls,
            stop_reason,
            usage: Usage::default(),
        })
    }
}

/// In-memory session service that counts `create_session` calls.
#[derive(Default)]
pub struct CountingSessionService {
    inner: InMemorySessionService,
    created: AtomicUsize,
}

impl CountingSessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionService for CountingSessionService {
    async fn create_session(&self, app_name: &str, user_id: &str) -> wayfarer_agent::Result<Session> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.inner.create_session(app_name, user_id).await
    }

    async fn history(&self, session_id: &str) -> wayfarer_agent::Result<Vec<Message>> {
        self.inner.history(session_id).await
    }

    async fn append(&self, session_id: &str, messages: Vec<Message>) -> wayfarer_agent::Result<()> {
        self.inner.append(session_id, messages).await
    }
}
