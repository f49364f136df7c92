//! Web tools.
//!
//! - [`WebSearchTool`] - General web search
//! - [`FlightPriceTool`] - Flight price lookup via web search

use super::{optional_count, required_str, Tool, ToolContext, ToolResult};
use crate::search::{CustomSearchClient, SearchHit};
use crate::Result;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;
use wayfarer_providers::ToolDefinition;

/// Source label attached to every search reply.
pub const SEARCH_SOURCE: &str = "google_custom_search";

/// Merge search outcome fields into a reply object.
fn search_reply(mut reply: Map<String, Value>, outcome: std::result::Result<Vec<SearchHit>, String>) -> Value {
    match outcome {
        Ok(hits) => {
            reply.insert("results".to_string(), json!(hits));
        }
        Err(message) => {
            reply.insert("results".to_string(), json!([]));
            reply.insert("error".to_string(), json!(message));
        }
    }
    reply.insert("source".to_string(), json!(SEARCH_SOURCE));
    Value::Object(reply)
}

/// Web search tool.
pub struct WebSearchTool {
    client: Arc<CustomSearchClient>,
}

impl WebSearchTool {
    pub fn new(client: Arc<CustomSearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "web_search".to_string(),
            description: "Search the web for attractions, restaurants, hotels, events, and prices. \
                Returns titles, snippets, and URLs."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results (default: 5, at most 10)"
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
        let max_results = optional_count(&args, "max_results").unwrap_or(5);

        debug!("Web search: {} (max {})", query, max_results);
        let outcome = self
            .client
            .search(&query, max_results)
            .await
            .map_err(|e| e.to_string());

        let mut reply = Map::new();
        reply.insert("query".to_string(), json!(query));
        Ok(ToolResult::success(tool_use_id, search_reply(reply, outcome)))
    }
}

/// Flight price lookup.
///
/// Searches the web for fares; the model reads prices out of the snippets.
pub struct FlightPriceTool {
    client: Arc<CustomSearchClient>,
}

impl FlightPriceTool {
    pub fn new(client: Arc<CustomSearchClient>) -> Self {
        Self { client }
    }

    /// Query sent to the search endpoint.
    pub fn query_for(origin: &str, destination: &str, date: &str) -> String {
        format!("{} to {} flight {} price", origin, destination, date)
    }
}

#[async_trait]
impl Tool for FlightPriceTool {
    fn name(&self) -> &str {
        "search_flight_price"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_flight_price".to_string(),
            description: "Look up flight prices between two cities on a date. \
                Returns web results whose snippets may mention fares and airlines."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "origin": {
                        "type": "string",
                        "description": "Departure city or airport"
                    },
                    "destination": {
                        "type": "string",
                        "description": "Arrival city or airport"
                    },
                    "date": {
                        "type": "string",
                        "description": "Travel date, e.g. 2025-05-01"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results (default: 10)"
                    }
                },
                "required": ["origin", "destination", "date"]
            }),
        }
    }

    async fn execute(
        &self,
        tool_use_id: &str,
        args: Value,
        _context: &ToolContext,
    ) -> Result<ToolResult> {
        let origin = required_str(&args, "origin")?;
        let destination = required_str(&args, "destination")?;
        let date = required_str(&args, "date")?;
        let max_results = optional_count(&args, "max_results").unwrap_or(10);

        let query = Self::query_for(&origin, &destination, &date);
        debug!("Flight search: {}", query);
        let outcome = self
            .client
            .search(&query, max_results)
            .await
            .map_err(|e| e.to_string());

        let mut reply = Map::new();
        reply.insert("origin".to_string(), json!(origin));
        reply.insert("destination".to_string(), json!(destination));
        reply.insert("date".to_string(), json!(date));
        Ok(ToolResult::success(tool_use_id, search_reply(reply, outcome)))
    }
}
