//! Common types for model providers.

use serde::{Deserialize, Serialize};

/// Message role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message (instructions).
    System,
    /// User message.
    User,
    /// Assistant message.
    Assistant,
    /// Tool result message.
    Tool,
}

impl MessageRole {
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User)
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, Self::Assistant)
    }

    pub fn is_tool(&self) -> bool {
        matches!(self, Self::Tool)
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message role.
    pub role: MessageRole,

    /// Message content.
    pub content: MessageContent,

    /// Tool name (for tool results).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tool call ID (for tool results).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn text_message(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(content.into()),
            name: None,
            tool_call_id: None,
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::text_message(MessageRole::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::text_message(MessageRole::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text_message(MessageRole::Assistant, content)
    }

    /// Create an assistant message that requests tool calls.
    ///
    /// Any text the model produced alongside the calls comes first.
    pub fn assistant_tool_calls(text: impl Into<String>, calls: Vec<ToolUse>) -> Self {
        let text = text.into();
        let mut parts = Vec::with_capacity(calls.len() + 1);
        if !text.is_empty() {
            parts.push(ContentPart::Text(text));
        }
        parts.extend(calls.into_iter().map(ContentPart::ToolUse));

        Self {
            role: MessageRole::Assistant,
            content: MessageContent::Parts(parts),
            name: None,
            tool_call_id: None,
        }
    }

    /// Create a tool result message.
    ///
    /// `content` is the tool output, normally a JSON document.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: MessageRole::Tool,
            content: MessageContent::Text(content.into()),
            name: Some(tool_name.into()),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Get the first text fragment of the message.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(s) => Some(s),
            MessageContent::Parts(parts) => parts.iter().find_map(|part| match part {
                ContentPart::Text(s) => Some(s.as_str()),
                _ => None,
            }),
        }
    }

    /// Tool calls carried by an assistant message.
    pub fn tool_calls(&self) -> Vec<&ToolUse> {
        match &self.content {
            MessageContent::Text(_) => Vec::new(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::ToolUse(tool) => Some(tool),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content.
    Text(String),

    /// Multi-part content (text + tool calls).
    Parts(Vec<ContentPart>),
}

/// A part of multi-part content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content.
    Text(String),

    /// Tool use request.
    ToolUse(ToolUse),
}

/// Tool use request from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    /// Unique ID for this tool use.
    pub id: String,

    /// Tool name.
    pub name: String,

    /// Tool arguments as JSON.
    pub input: serde_json::Value,
}

/// Chat completion options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Temperature for sampling (0.0 to 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Tools available for the model to use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

impl ChatOptions {
    /// Create new chat options with max tokens.
    pub fn with_max_tokens(max_tokens: usize) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            ..Default::default()
        }
    }

    /// Set temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set tools.
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }
}

/// Tool definition for function calling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,

    /// Tool description.
    pub description: String,

    /// Input schema (JSON Schema subset understood by Gemini).
    pub input_schema: serde_json::Value,
}

/// Chat completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Response ID.
    pub id: String,

    /// Model used.
    pub model: String,

    /// Response text (all text parts concatenated).
    pub content: String,

    /// Tool calls requested by the model.
    #[serde(default)]
    pub tool_calls: Vec<ToolUse>,

    /// Stop reason.
    pub stop_reason: StopReason,

    /// Token usage.
    pub usage: Usage,
}

impl ChatResponse {
    /// Check if the model wants to use tools.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// Hit max tokens limit.
    MaxTokens,
    /// Model wants to use a tool.
    ToolUse,
    /// Content was filtered.
    ContentFilter,
    /// Unknown reason.
    Unknown,
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Input/prompt tokens.
    pub input_tokens: usize,

    /// Output/completion tokens.
    pub output_tokens: usize,
}

impl Usage {
    /// Get total tokens used.
    pub fn total_tokens(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_creation() {
        let sys = Message::system("You are a travel planner.");
        assert!(sys.role.is_system());
        assert_eq!(sys.text(), Some("You are a travel planner."));

        let user = Message::user("Find me flights");
        assert!(user.role.is_user());

        let assistant = Message::assistant("Sure.");
        assert!(assistant.role.is_assistant());
        assert!(assistant.tool_calls().is_empty());
    }

    #[test]
    fn test_assistant_tool_calls() {
        let call = ToolUse {
            id: "call-1".to_string(),
            name: "get_weather".to_string(),
            input: json!({"location": "Lisbon"}),
        };

        let msg = Message::assistant_tool_calls("", vec![call.clone()]);
        assert_eq!(msg.text(), None);
        assert_eq!(msg.tool_calls(), vec![&call]);

        let msg = Message::assistant_tool_calls("Checking.", vec![call]);
        assert_eq!(msg.text(), Some("Checking."));
        assert_eq!(msg.tool_calls().len(), 1);
    }

    #[test]
    fn test_tool_result() {
        let msg = Message::tool_result("call-1", "get_weather", r#"{"summary":"sunny"}"#);
        assert!(msg.role.is_tool());
        assert_eq!(msg.name.as_deref(), Some("get_weather"));
        assert_eq!(msg.tool_call_id.as_deref(), Some("call-1"));
    }

    #[test]
    fn test_chat_options() {
        let opts = ChatOptions::with_max_tokens(1000).temperature(0.7);
        assert_eq!(opts.max_tokens, Some(1000));
        assert_eq!(opts.temperature, Some(0.7));
        assert!(opts.tools.is_none());
    }

    #[test]
    fn test_usage() {
        let usage = Usage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(usage.total_tokens(), 150);
    }
}
