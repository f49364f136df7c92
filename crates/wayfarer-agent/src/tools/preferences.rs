//! Preference tools.
//!
//! - [`SavePreferenceTool`] - Remember a user preference
//! - [`LoadPreferencesTool`] - Recall stored preferences

use super::{required_str, Tool, ToolContext, ToolResult};
use crate::error::AgentError;
use crate::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use wayfarer_memory::PreferenceStore;
use wayfarer_providers::ToolDefinition;

/// Appends one preference to the store.
pub struct SavePreferenceTool {
    store: Arc<PreferenceStore>,
}

impl SavePreferenceTool {
    pub fn new(store: Arc<PreferenceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SavePreferenceTool {
    fn name(&self) -> &str {
        "save_preference"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "save_preference".to_string(),
            description: "Remember a travel preference the user stated, such as \
                'vegetarian' or 'prefers museums'."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "preference": {
                        "type": "string",
                        "description": "The preference to remember"
                    }
                },
                "required": ["preference"]
            }),
        }
    }

    async fn execute(
        &self,
        tool_use_id: &str,
        args: Value,
        context: &ToolContext,
    ) -> Result<ToolResult> {
        let preference = required_str(&args, "preference")?;

        let total = self
            .store
            .save(&preference)
            .await
            .map_err(|e| AgentError::tool_execution(format!("Failed to save preference: {}", e)))?;

        info!(user = %context.user_id, total, "Saved preference");
        Ok(ToolResult::success(
            tool_use_id,
            json!({
                "status": "ok",
                "saved_preference": preference,
                "total_preferences": total
            }),
        ))
    }
}

/// Lists every stored preference.
pub struct LoadPreferencesTool {
    store: Arc<PreferenceStore>,
}

impl LoadPreferencesTool {
    pub fn new(store: Arc<PreferenceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for LoadPreferencesTool {
    fn name(&self) -> &str {
        "load_preferences"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "load_preferences".to_string(),
            description: "Recall the travel preferences saved so far.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(
        &self,
        tool_use_id: &str,
        _args: Value,
        _context: &ToolContext,
    ) -> Result<ToolResult> {
        let preferences = self.store.load().await;
        Ok(ToolResult::success(tool_use_id, json!(preferences)))
    }
}
