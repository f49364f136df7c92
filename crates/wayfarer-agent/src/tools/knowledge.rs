//! Knowledge base search.

use super::{optional_count, required_str, Tool, ToolContext, ToolResult};
use crate::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use wayfarer_memory::KnowledgeBase;
use wayfarer_providers::ToolDefinition;

/// Nearest-neighbour search over the travel knowledge base.
pub struct KbSearchTool {
    knowledge: Arc<KnowledgeBase>,
}

impl KbSearchTool {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl Tool for KbSearchTool {
    fn name(&self) -> &str {
        "kb_search"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "kb_search".to_string(),
            description: "Search the travel planning knowledge base for guides and tips. \
                Lower scores are closer matches."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to look for"
                    },
                    "top_k": {
                        "type": "integer",
                        "description": "Number of passages to return (default: 5)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(
        &self,
        tool_use_id: &str,
        args: Value,
        _context: &ToolContext,
    ) -> Result<ToolResult> {
        let query = required_str(&args, "query")?;
        let top_k = optional_count(&args, "top_k").unwrap_or(5);

        let response = self.knowledge.search(&query, top_k).await?;
        Ok(ToolResult::success(tool_use_id, serde_json::to_value(response)?))
    }
}
