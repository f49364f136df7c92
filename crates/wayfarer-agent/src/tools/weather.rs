//! Weather lookup.

use super::{optional_str, required_str, Tool, ToolContext, ToolResult};
use crate::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use wayfarer_providers::ToolDefinition;

/// Returns a fixed forecast. No weather service is wired in.
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_weather".to_string(),
            description: "Get the weather forecast for a location and date.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City or place name"
                    },
                    "date": {
                        "type": "string",
                        "description": "Date of interest (default: today)"
                    }
                },
                "required": ["location"]
            }),
        }
    }

    async fn execute(
        &self,
        tool_use_id: &str,
        args: Value,
        _context: &ToolContext,
    ) -> Result<ToolResult> {
        let location = required_str(&args, "location")?;
        let date = optional_str(&args, "date").unwrap_or_else(|| "today".to_string());

        Ok(ToolResult::success(
            tool_use_id,
            json!({
                "location": location,
                "date": date,
                "summary": "Partly cloudy with mild temperatures.",
                "temperature_celsius": 24.0,
                "precipitation_chance": 0.2,
                "source": "mock_weather_service"
            }),
        ))
    }
}
