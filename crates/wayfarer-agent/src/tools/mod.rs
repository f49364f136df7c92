//! Tool execution framework and the travel tools.
//!
//! This module provides:
//! - [`Tool`] trait for implementing tools
//! - [`ToolRegistry`] for managing and executing available tools
//! - The six travel tools the agent is given

mod knowledge;
mod preferences;
mod weather;
mod web;

pub use knowledge::KbSearchTool;
pub use preferences::{LoadPreferencesTool, SavePreferenceTool};
pub use weather::WeatherTool;
pub use web::{FlightPriceTool, WebSearchTool};

use crate::error::AgentError;
use crate::search::CustomSearchClient;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::debug;
use wayfarer_memory::{KnowledgeBase, PreferenceStore};
use wayfarer_providers::ToolDefinition;

/// A tool that can be executed by an agent.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name.
    fn name(&self) -> &str;

    /// Get the tool definition for the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with given arguments.
    async fn execute(
        &self,
        tool_use_id: &str,
        args: Value,
        context: &ToolContext,
    ) -> Result<ToolResult>;
}

/// Context for tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// User the turn belongs to.
    pub user_id: String,

    /// Session ID.
    pub session_id: String,
}

impl ToolContext {
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// Result of one tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool use ID.
    pub tool_use_id: String,

    /// Output value.
    pub output: Value,

    /// Whether the result is an error.
    #[serde(default)]
    pub is_error: bool,

    /// Execution duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result.
    pub fn success(tool_use_id: impl Into<String>, output: Value) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            output,
            is_error: false,
            duration_ms: None,
        }
    }

    /// Create an error result. The message is wrapped as `{"error": ...}`.
    pub fn error(tool_use_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            output: serde_json::json!({ "error": message.into() }),
            is_error: true,
            duration_ms: None,
        }
    }
}

/// Shared state the travel tools close over.
#[derive(Clone)]
pub struct TravelToolset {
    pub knowledge: Arc<KnowledgeBase>,
    pub preferences: Arc<PreferenceStore>,
    pub search: Arc<CustomSearchClient>,
}

/// Registry for available tools.
pub struct ToolRegistry {
    /// Registered tools by name.
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry with the six travel tools.
    pub async fn travel_defaults(toolset: TravelToolset) -> Self {
        let registry = Self::new();

        // Search tools
        registry
            .register(Arc::new(WebSearchTool::new(toolset.search.clone())))
            .await;
        registry
            .register(Arc::new(FlightPriceTool::new(toolset.search)))
            .await;

        // Knowledge base
        registry
            .register(Arc::new(KbSearchTool::new(toolset.knowledge)))
            .await;

        // Weather
        registry.register(Arc::new(WeatherTool)).await;

        // Preferences
        registry
            .register(Arc::new(SavePreferenceTool::new(toolset.preferences.clone())))
            .await;
        registry
            .register(Arc::new(LoadPreferencesTool::new(toolset.preferences)))
            .await;

        registry
    }

    /// Register a tool, replacing any tool with the same name.
    pub async fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        let mut tools = self.tools.write().await;
        tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().await;
        tools.get(name).cloned()
    }

    /// List all tool names, sorted.
    pub async fn list(&self) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut names: Vec<String> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get all tool definitions, sorted by name so requests are stable.
    pub async fn definitions(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().await;
        let mut definitions: Vec<ToolDefinition> = tools.values().map(|t| t.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Execute a tool by name.
    pub async fn execute(
        &self,
        tool_use_id: &str,
        name: &str,
        args: Value,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .await
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        debug!("Executing tool '{}' with args: {}", name, args);
        let start = Instant::now();
        let mut result = tool.execute(tool_use_id, args, context).await?;
        result.duration_ms = Some(start.elapsed().as_millis() as u64);

        Ok(result)
    }
}

/// Read a required string argument.
pub(crate) fn required_str(args: &Value, key: &str) -> Result<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AgentError::tool_execution(format!("Missing required parameter: {}", key)))
}

/// Read an optional string argument.
pub(crate) fn optional_str(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read an optional count argument. Models sometimes send numbers as
/// floats or strings.
pub(crate) fn optional_count(args: &Value, key: &str) -> Option<usize> {
    match args.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
