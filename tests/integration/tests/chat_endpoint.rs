//! `POST /chat` end to end with a scripted model and the real travel tools.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use wayfarer_agent::{
    AgentRuntime, CustomSearchClient, SessionManager, ToolRegistry, TravelToolset,
};
use wayfarer_core::{paths, SearchConfig};
use wayfarer_gateway::{AppState, Gateway, GatewayConfig};
use wayfarer_integration_tests::{CountingSessionService, LetterEmbeddings, ScriptedProvider, Step};
use wayfarer_memory::{builtin_documents, KnowledgeBaseBuilder, PreferenceStore};
use wayfarer_providers::MessageRole;

struct Harness {
    router: Router,
    provider: Arc<ScriptedProvider>,
    sessions: Arc<CountingSessionService>,
}

async fn harness(data_dir: &Path, steps: Vec<Step>) -> Harness {
    let knowledge = KnowledgeBaseBuilder::new(Arc::new(LetterEmbeddings))
        .build(&builtin_documents())
        .await
        .unwrap()
        .unwrap();
    let preferences = PreferenceStore::new(paths::preferences_file(data_dir));
    // No credentials: search tools answer with a structured error.
    let search = CustomSearchClient::new(&SearchConfig::default()).unwrap();

    let tools = ToolRegistry::travel_defaults(TravelToolset {
        knowledge: Arc::new(knowledge),
        preferences: Arc::new(preferences),
        search: Arc::new(search),
    })
    .await;

    let provider = Arc::new(ScriptedProvider::new(steps));
    let sessions = Arc::new(CountingSessionService::new());
    let manager = Arc::new(SessionManager::new(sessions.clone(), "travel_agent_app"));
    let runtime = Arc::new(AgentRuntime::new(
        provider.clone(),
        Arc::new(tools),
        sessions.clone(),
    ));

    let gateway = Gateway::new(
        GatewayConfig::default(),
        AppState::new(manager, runtime, data_dir.join("index.html")),
    );

    Harness {
        router: gateway.router(),
        provider,
        sessions,
    }
}

async fn post_chat(router: &Router, user_id: &str, message: &str) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(json!({"user_id": user_id, "message": message}).to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Output of the last tool result the model was shown.
fn last_tool_output(provider: &ScriptedProvider) -> Value {
    let requests = provider.requests();
    let message = requests
        .last()
        .and_then(|conversation| conversation.iter().rev().find(|m| m.role == MessageRole::Tool))
        .expect("a tool result was sent back")
        .clone();
    serde_json::from_str(message.text().unwrap()).unwrap()
}

#[tokio::test]
async fn test_preference_is_saved_through_chat() {
    let tmp = tempfile::tempdir().unwrap();
    let h = harness(
        tmp.path(),
        vec![
            Step::call("save_preference", json!({"preference": "vegetarian"})),
            Step::text("Noted, "),
            Step::text("anything else?"),
        ],
    )
    .await;

    let body = post_chat(&h.router, "alice", "I am vegetarian").await;
    assert_eq!(body, json!({"user_id": "alice", "response": "Noted,"}));

    assert_eq!(
        last_tool_output(&h.provider),
        json!({"status": "ok", "saved_preference": "vegetarian", "total_preferences": 1})
    );

    let stored: Value =
        serde_json::from_str(&std::fs::read_to_string(paths::preferences_file(tmp.path())).unwrap())
            .unwrap();
    assert_eq!(stored, json!({"preferences": ["vegetarian"]}));

    // Second request reuses the session and carries the history.
    let body = post_chat(&h.router, "alice", "Plan Kyoto").await;
    assert_eq!(body["response"], "anything else?");
    assert_eq!(h.sessions.created(), 1);

    let requests = h.provider.requests();
    let last = requests.last().unwrap();
    assert!(last.iter().any(|m| m.text() == Some("I am vegetarian")));
}

#[tokio::test]
async fn test_search_without_credentials_reports_error_to_model() {
    let tmp = tempfile::tempdir().unwrap();
    let h = harness(
        tmp.path(),
        vec![
            Step::call(
                "search_flight_price",
                json!({"origin": "SFO", "destination": "NRT", "date": "2025-03-01"}),
            ),
            Step::text("I could not find a clear price for that date."),
        ],
    )
    .await;

    let body = post_chat(&h.router, "bob", "SFO to Tokyo on March 1st?").await;
    assert_eq!(body["response"], "I could not find a clear price for that date.");
    assert!(body.get("error").is_none());

    let output = last_tool_output(&h.provider);
    assert_eq!(output["results"], json!([]));
    assert_eq!(
        output["error"],
        "Missing CUSTOM_SEARCH_API_KEY or CUSTOM_SEARCH_CX in environment."
    );
    assert_eq!(output["source"], "google_custom_search");
}

#[tokio::test]
async fn test_kb_search_through_chat() {
    let tmp = tempfile::tempdir().unwrap();
    let h = harness(
        tmp.path(),
        vec![
            Step::call("kb_search", json!({"query": "anime travel", "top_k": 2})),
            Step::text("Here are some anime spots."),
        ],
    )
    .await;

    post_chat(&h.router, "carol", "Anime trip ideas?").await;

    let output = last_tool_output(&h.provider);
    assert_eq!(output["query"], "anime travel");
    assert_eq!(output["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_model_failure_returns_typed_error() {
    let tmp = tempfile::tempdir().unwrap();
    let h = harness(tmp.path(), vec![Step::Fail]).await;

    let body = post_chat(&h.router, "dave", "Hello").await;
    assert_eq!(body["user_id"], "dave");
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("Sorry, I encountered an error: "));
    assert_eq!(body["error"]["kind"], "provider");
}

#[tokio::test]
async fn test_empty_reply_uses_fallback() {
    let tmp = tempfile::tempdir().unwrap();
    let h = harness(tmp.path(), vec![Step::text("")]).await;

    let body = post_chat(&h.router, "erin", "Hello").await;
    assert_eq!(body["response"], "Sorry, I could not generate a response.");
}

#[tokio::test]
async fn test_each_user_gets_one_session() {
    let tmp = tempfile::tempdir().unwrap();
    let h = harness(
        tmp.path(),
        vec![Step::text("a"), Step::text("b"), Step::text("c")],
    )
    .await;

    post_chat(&h.router, "frank", "1").await;
    post_chat(&h.router, "grace", "2").await;
    post_chat(&h.router, "frank", "3").await;
    assert_eq!(h.sessions.created(), 2);

    let response = h
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health, json!({"status": "ok", "sessions": 2}));
}
