//! Google Gemini provider implementation.
//!
//! Talks to the `generateContent` REST endpoint with function calling.

use crate::{
    ChatOptions, ChatResponse, ContentPart, Message, MessageContent, MessageRole, Provider,
    ProviderError, Result, StopReason, ToolDefinition, ToolUse, Usage,
};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Default Google AI API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini provider.
pub struct GoogleProvider {
    /// HTTP client.
    client: Client,

    /// API key.
    api_key: SecretString,

    /// API base URL.
    api_base: String,
}

impl GoogleProvider {
    /// Create a new Google provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_secret(SecretString::new(api_key.into()))
    }

    /// Create a provider from an already-wrapped API key.
    pub fn from_secret(api_key: SecretString) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(ProviderError::config("API key is required"));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| ProviderError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Convert messages to Gemini format.
    ///
    /// Consecutive tool results are merged into one `user` turn, which is
    /// how Gemini expects parallel function responses.
    fn convert_messages(
        &self,
        messages: &[Message],
    ) -> (Option<GeminiSystemInstruction>, Vec<GeminiContent>) {
        let mut system_instruction = None;
        let mut contents: Vec<GeminiContent> = Vec::new();
        let mut previous_was_tool = false;

        for msg in messages {
            match msg.role {
                MessageRole::System => {
                    if let Some(text) = msg.text() {
                        system_instruction = Some(GeminiSystemInstruction {
                            parts: vec![GeminiPart::Text {
                                text: text.to_string(),
                            }],
                        });
                    }
                }
                MessageRole::User => {
                    contents.push(GeminiContent {
                        role: "user".to_string(),
                        parts: convert_content(&msg.content),
                    });
                }
                MessageRole::Assistant => {
                    contents.push(GeminiContent {
                        role: "model".to_string(),
                        parts: convert_content(&msg.content),
                    });
                }
                MessageRole::Tool => {
                    let part = GeminiPart::FunctionResponse {
                        function_response: GeminiFunctionResponse {
                            name: msg.name.clone().unwrap_or_default(),
                            response: function_response_body(msg.text().unwrap_or("")),
                        },
                    };

                    match contents.last_mut() {
                        Some(last) if previous_was_tool => last.parts.push(part),
                        _ => contents.push(GeminiContent {
                            role: "user".to_string(),
                            parts: vec![part],
                        }),
                    }
                }
            }
            previous_was_tool = msg.role.is_tool();
        }

        (system_instruction, contents)
    }

    /// Convert tools to Gemini format.
    fn convert_tools(&self, tools: &[ToolDefinition]) -> Vec<GeminiTool> {
        vec![GeminiTool {
            function_declarations: tools
                .iter()
                .map(|t| GeminiFunctionDeclaration {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: declared_parameters(&t.input_schema),
                })
                .collect(),
        }]
    }

    /// Parse Gemini response.
    fn parse_response(&self, response: GeminiResponse, model: &str) -> Result<ChatResponse> {
        let candidate = match response.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                let reason = response
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .unwrap_or_else(|| "no candidates returned".to_string());
                return Err(ProviderError::content_filtered(reason));
            }
        };

        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for part in candidate.content.parts {
            match part {
                GeminiPart::Text { text } => {
                    content.push_str(&text);
                }
                GeminiPart::FunctionCall { function_call } => {
                    tool_calls.push(ToolUse {
                        id: uuid::Uuid::new_v4().to_string(),
                        name: function_call.name,
                        input: function_call.args,
                    });
                }
                GeminiPart::FunctionResponse { .. } | GeminiPart::Other(_) => {
                    debug!("Ignoring non-text part in Gemini response");
                }
            }
        }

        let stop_reason = if !tool_calls.is_empty() {
            StopReason::ToolUse
        } else {
            match candidate.finish_reason.as_deref() {
                Some("STOP") => StopReason::EndTurn,
                Some("MAX_TOKENS") => StopReason::MaxTokens,
                Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => {
                    StopReason::ContentFilter
                }
                _ => StopReason::Unknown,
            }
        };

        let usage = response.usage_metadata.unwrap_or_default();

        Ok(ChatResponse {
            id: uuid::Uuid::new_v4().to_string(),
            model: model.to_string(),
            content,
            tool_calls,
            stop_reason,
            usage: Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }
}

/// Convert content to Gemini parts.
fn convert_content(content: &MessageContent) -> Vec<GeminiPart> {
    match content {
        MessageContent::Text(s) => vec![GeminiPart::Text { text: s.clone() }],
        MessageContent::Parts(parts) => parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(s) => GeminiPart::Text { text: s.clone() },
                ContentPart::ToolUse(tool) => GeminiPart::FunctionCall {
                    function_call: GeminiFunctionCall {
                        name: tool.name.clone(),
                        args: tool.input.clone(),
                    },
                },
            })
            .collect(),
    }
}

/// Gemini requires `functionResponse.response` to be a JSON object.
/// Gemini rejects OBJECT schemas with no properties; such tools are declared
/// without a `parameters` field.
fn declared_parameters(schema: &Value) -> Option<Value> {
    match schema.get("properties").and_then(Value::as_object) {
        Some(properties) if properties.is_empty() => None,
        None if schema.get("type").and_then(Value::as_str) == Some("object") => None,
        _ => Some(schema.clone()),
    }
}

fn function_response_body(output: &str) -> Value {
    match serde_json::from_str::<Value>(output) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(other) => json!({ "result": other }),
        Err(_) => json!({ "result": output }),
    }
}

#[async_trait]
impl Provider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<ChatOptions>,
    ) -> Result<ChatResponse> {
        let options = options.unwrap_or_default();
        let (system_instruction, contents) = self.convert_messages(messages);

        let request = GeminiRequest {
            contents,
            system_instruction,
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: options.max_tokens,
                temperature: options.temperature,
            }),
            tools: options
                .tools
                .as_ref()
                .filter(|t| !t.is_empty())
                .map(|t| self.convert_tools(t)),
        };

        debug!(model, turns = request.contents.len(), "Sending request to Gemini");

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.api_base, model))
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| {
                    if body.is_empty() {
                        "Unknown error".to_string()
                    } else {
                        body
                    }
                });

            warn!(status = status.as_u16(), "Gemini request failed");
            return Err(ProviderError::from_status(status.as_u16(), message));
        }

        let response: GeminiResponse = response.json().await?;
        self.parse_response(response, model)
    }
}

// Internal types for Gemini API

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "systemInstruction")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "generationConfig")]
    generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: GeminiFunctionCall,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: GeminiFunctionResponse,
    },
    /// Parts this client does not use (inline data, thoughts, ...).
    Other(Value),
}

#[derive(Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none", rename = "maxOutputTokens")]
    max_output_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct GeminiTool {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Serialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Value>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsageMetadata>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct GeminiUsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: usize,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: usize,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "gemini-test";

    async fn provider_for(server: &MockServer) -> GoogleProvider {
        GoogleProvider::new("test-key")
            .unwrap()
            .with_base_url(server.uri())
    }

    fn weather_tool() -> ToolDefinition {
        ToolDefinition {
            name: "get_weather".to_string(),
            description: "Weather forecast".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"location": {"type": "string"}},
                "required": ["location"]
            }),
        }
    }

    #[test]
    fn test_provider_creation() {
        let provider = GoogleProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "google");
    }

    #[test]
    fn test_provider_empty_key() {
        assert!(matches!(
            GoogleProvider::new(""),
            Err(ProviderError::Config(_))
        ));
    }

    #[test]
    fn test_function_response_body_wraps_non_objects() {
        assert_eq!(
            function_response_body(r#"{"status":"ok"}"#),
            json!({"status": "ok"})
        );
        assert_eq!(
            function_response_body(r#"["a","b"]"#),
            json!({"result": ["a", "b"]})
        );
        assert_eq!(
            function_response_body("plain text"),
            json!({"result": "plain text"})
        );
    }

    #[test]
    fn test_consecutive_tool_results_share_one_turn() {
        let provider = GoogleProvider::new("test-key").unwrap();
        let calls = vec![
            ToolUse {
                id: "1".to_string(),
                name: "get_weather".to_string(),
                input: json!({"location": "Osaka"}),
            },
            ToolUse {
                id: "2".to_string(),
                name: "load_preferences".to_string(),
                input: json!({}),
            },
        ];
        let messages = vec![
            Message::system("be helpful"),
            Message::user("weather in Osaka?"),
            Message::assistant_tool_calls("", calls),
            Message::tool_result("1", "get_weather", r#"{"summary":"sunny"}"#),
            Message::tool_result("2", "load_preferences", r#"["window seat"]"#),
        ];

        let (system, contents) = provider.convert_messages(&messages);
        assert!(system.is_some());
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[1].parts.len(), 2);
        assert_eq!(contents[2].role, "user");
        assert_eq!(contents[2].parts.len(), 2);

        let wire = serde_json::to_value(&contents[2]).unwrap();
        assert_eq!(
            wire["parts"][0]["functionResponse"]["name"],
            json!("get_weather")
        );
        assert_eq!(
            wire["parts"][1]["functionResponse"]["response"],
            json!({"result": ["window seat"]})
        );
    }

    #[tokio::test]
    async fn test_chat_request_shape_and_text_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", MODEL)))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "traveler"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let options = ChatOptions::with_max_tokens(256).tools(vec![weather_tool()]);
        let response = provider
            .chat(
                MODEL,
                &[Message::system("policy"), Message::user("hi")],
                Some(options),
            )
            .await
            .unwrap();

        assert_eq!(response.content, "Hello traveler");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert!(!response.has_tool_calls());
        assert_eq!(response.usage.total_tokens(), 15);

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], json!("policy"));
        assert_eq!(body["contents"][0]["role"], json!("user"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], json!("hi"));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], json!(256));
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            json!("get_weather")
        );
    }

    #[tokio::test]
    async fn test_parameterless_tool_omits_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "ok"}]},
                    "finishReason": "STOP"
                }]
            })))
            .mount(&server)
            .await;

        let load_preferences = ToolDefinition {
            name: "load_preferences".to_string(),
            description: "Load saved preferences".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        };
        let provider = provider_for(&server).await;
        let options = ChatOptions::default().tools(vec![weather_tool(), load_preferences]);
        provider
            .chat(MODEL, &[Message::user("what do I like?")], Some(options))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let declarations = body["tools"][0]["functionDeclarations"].as_array().unwrap();
        assert_eq!(declarations.len(), 2);
        assert!(declarations[0]["parameters"]["properties"]["location"].is_object());
        assert_eq!(declarations[1]["name"], json!("load_preferences"));
        assert!(declarations[1].get("parameters").is_none());
    }

    #[tokio::test]
    async fn test_chat_parses_function_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", MODEL)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [
                        {"functionCall": {"name": "get_weather", "args": {"location": "Rome"}}},
                        {"functionCall": {"name": "load_preferences"}}
                    ]},
                    "finishReason": "STOP"
                }]
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let response = provider
            .chat(MODEL, &[Message::user("weather?")], None)
            .await
            .unwrap();

        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.tool_calls.len(), 2);
        assert_eq!(response.tool_calls[0].name, "get_weather");
        assert_eq!(response.tool_calls[0].input, json!({"location": "Rome"}));
        assert_eq!(response.tool_calls[1].input, Value::Null);
        assert_ne!(response.tool_calls[0].id, response.tool_calls[1].id);
        assert!(response.content.is_empty());
    }

    #[tokio::test]
    async fn test_chat_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider
            .chat(MODEL, &[Message::user("hi")], None)
            .await
            .unwrap_err();

        match err {
            ProviderError::Authentication(message) => assert_eq!(message, "API key not valid"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_server_error_with_plain_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider
            .chat(MODEL, &[Message::user("hi")], None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::ServerError { status: 500, ref message } if message == "upstream exploded"
        ));
    }

    #[tokio::test]
    async fn test_chat_blocked_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let err = provider
            .chat(MODEL, &[Message::user("hi")], None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::ContentFiltered(ref r) if r == "SAFETY"));
    }
}
