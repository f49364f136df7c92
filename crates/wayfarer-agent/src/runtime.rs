//! Agent runtime for executing conversations.
//!
//! One call to [`AgentRuntime::run_turn`] sends the session history and the
//! new user message to the model, executes any tool calls it makes, feeds
//! the results back and repeats until the model answers in plain text.

use crate::error::AgentError;
use crate::prompt::SYSTEM_PROMPT;
use crate::session::SessionService;
use crate::tools::{ToolContext, ToolRegistry, ToolResult};
use crate::Result;
use async_stream::stream;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};
use wayfarer_core::config::DEFAULT_CHAT_MODEL;
use wayfarer_providers::{ChatOptions, Message, Provider, Usage};

/// Reply used when a turn produced no text at all.
pub const FALLBACK_RESPONSE: &str = "Sorry, I could not generate a response.";

/// Configuration for the agent runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Chat model name.
    pub model: String,

    /// Maximum model calls per user message.
    pub max_turns: usize,

    /// Maximum output tokens.
    pub max_output_tokens: usize,

    /// Temperature for generation.
    pub temperature: f32,

    /// System prompt.
    pub system_prompt: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            max_turns: 10,
            max_output_tokens: 4096,
            temperature: 0.7,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Something that happened during a turn.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// A text fragment from the model.
    Text(String),

    /// The model asked for a tool.
    ToolCall {
        id: String,
        name: String,
        input: Value,
    },

    /// A tool finished.
    ToolResult { name: String, result: ToolResult },

    /// The turn is complete.
    Done { turns: usize, usage: Usage },
}

/// The agent runtime manages conversation execution.
pub struct AgentRuntime {
    /// Runtime configuration.
    config: RuntimeConfig,

    /// Model provider.
    provider: Arc<dyn Provider>,

    /// Tool registry.
    tools: Arc<ToolRegistry>,

    /// Session storage.
    sessions: Arc<dyn SessionService>,
}

impl AgentRuntime {
    /// Create a new agent runtime.
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        sessions: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            config: RuntimeConfig::default(),
            provider,
            tools,
            sessions,
        }
    }

    /// Set the runtime configuration.
    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run one user message through the tool-calling loop.
    ///
    /// History is only written back when the turn completes.
    pub fn run_turn(
        &self,
        session_id: String,
        user_id: String,
        message: String,
    ) -> Pin<Box<dyn Stream<Item = Result<AgentEvent>> + Send + '_>> {
        Box::pin(stream! {
            let history = match self.sessions.history(&session_id).await {
                Ok(h) => h,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let mut conversation = Vec::with_capacity(history.len() + 2);
            conversation.push(Message::system(self.config.system_prompt.clone()));
            conversation.extend(history);

            let user_message = Message::user(message);
            conversation.push(user_message.clone());
            let mut pending = vec![user_message];

            let definitions = self.tools.definitions().await;
            let context = ToolContext::new(user_id, session_id.clone());
            let mut usage = Usage::default();
            let mut turns = 0;
            let mut finished = false;

            while turns < self.config.max_turns {
                turns += 1;

                let options = ChatOptions::with_max_tokens(self.config.max_output_tokens)
                    .temperature(self.config.temperature)
                    .tools(definitions.clone());

                let response = match self
                    .provider
                    .chat(&self.config.model, &conversation, Some(options))
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        yield Err(AgentError::from(e));
                        return;
                    }
                };

                usage.input_tokens += response.usage.input_tokens;
                usage.output_tokens += response.usage.output_tokens;

                if !response.content.is_empty() {
                    yield Ok(AgentEvent::Text(response.content.clone()));
                }

                if !response.has_tool_calls() {
                    let reply = Message::assistant(response.content);
                    conversation.push(reply.clone());
                    pending.push(reply);
                    finished = true;
                    break;
                }

                let request = Message::assistant_tool_calls(
                    response.content,
                    response.tool_calls.clone(),
                );
                conversation.push(request.clone());
                pending.push(request);

                for call in response.tool_calls {
                    yield Ok(AgentEvent::ToolCall {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        input: call.input.clone(),
                    });

                    let result = match self
                        .tools
                        .execute(&call.id, &call.name, call.input, &context)
                        .await
                    {
                        Ok(r) => r,
                        Err(e) => {
                            warn!("Tool '{}' failed: {}", call.name, e);
                            ToolResult::error(&call.id, e.to_string())
                        }
                    };
                    debug!(tool = %call.name, is_error = result.is_error, "Tool finished");

                    let reply = Message::tool_result(&call.id, &call.name, result.output.to_string());
                    conversation.push(reply.clone());
                    pending.push(reply);

                    yield Ok(AgentEvent::ToolResult { name: call.name, result });
                }
            }

            if !finished {
                warn!("Reached max turns ({}) for session {}", self.config.max_turns, session_id);
            }

            if let Err(e) = self.sessions.append(&session_id, pending).await {
                yield Err(e);
                return;
            }

            yield Ok(AgentEvent::Done { turns, usage });
        })
    }

    /// Run a turn and collect its text into one reply.
    pub async fn respond(&self, session_id: &str, user_id: &str, message: &str) -> Result<String> {
        let mut events = self.run_turn(
            session_id.to_string(),
            user_id.to_string(),
            message.to_string(),
        );

        let mut text = String::new();
        while let Some(event) = events.next().await {
            if let AgentEvent::Text(fragment) = event? {
                text.push_str(&fragment);
            }
        }

        let text = text.trim();
        if text.is_empty() {
            Ok(FALLBACK_RESPONSE.to_string())
        } else {
            Ok(text.to_string())
        }
    }
}
