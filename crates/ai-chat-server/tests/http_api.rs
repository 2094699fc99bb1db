//! Router-level tests: status codes, response shapes and memory behaviour.
//! LLM and document store are replaced with in-process fakes.

use ai_chat_server::config::Settings;
use ai_chat_server::models::chat::ChatMessage;
use ai_chat_server::services::{ContextBundle, ContextProvider, LlmProvider, MemoryRegistry};
use ai_chat_server::{build_router, AppState};
use anyhow::{anyhow, Result};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Echoes the last user message and records every prompt it saw
#[derive(Default)]
struct EchoLlm {
    fail: AtomicBool,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait::async_trait]
impl LlmProvider for EchoLlm {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        self.prompts.lock().push(messages.to_vec());
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("provider unavailable"));
        }
        let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(format!("echo: {}", last))
    }
}

/// Stands in for a handler bug
struct PanickingLlm;

#[async_trait::async_trait]
impl LlmProvider for PanickingLlm {
    async fn generate(&self, _messages: &[ChatMessage]) -> Result<String> {
        panic!("provider exploded");
    }
}

#[derive(Default)]
struct EmptyContext {
    queries: Mutex<Vec<(String, String)>>,
}

#[async_trait::async_trait]
impl ContextProvider for EmptyContext {
    async fn fetch(&self, query: &str, user_id: &str) -> Result<ContextBundle> {
        self.queries.lock().push((query.to_string(), user_id.to_string()));
        Ok(ContextBundle::default())
    }
}

struct Harness {
    app: Router,
    memory: Arc<MemoryRegistry>,
    llm: Arc<EchoLlm>,
    context: Arc<EmptyContext>,
}

fn harness(window_size: usize) -> Harness {
    let memory = Arc::new(MemoryRegistry::new(window_size));
    let llm = Arc::new(EchoLlm::default());
    let context = Arc::new(EmptyContext::default());
    let state = AppState::new(Settings::default(), memory.clone(), llm.clone(), context.clone());

    Harness {
        app: build_router(state),
        memory,
        llm,
        context,
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let payload = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, payload)
}

async fn send_message(app: &Router, user_id: &str, message: &str) -> (StatusCode, Value) {
    post(app, "/get-response", json!({"message": message, "user_id": user_id})).await
}

fn history_texts(memory: &MemoryRegistry, user: &str) -> Vec<String> {
    memory
        .get_or_create(user)
        .history()
        .into_iter()
        .map(|t| t.text)
        .collect()
}

#[tokio::test]
async fn health_returns_ok() {
    let h = harness(20);
    let (status, payload) = get(&h.app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], "healthy");
    assert_eq!(payload["service"], "ai-chat-server");
}

#[tokio::test]
async fn readiness_reports_registry_stats() {
    let h = harness(20);
    let (status, payload) = get(&h.app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], "ready");
    assert_eq!(payload["active_conversations"], 0);

    send_message(&h.app, "a", "hi").await;
    send_message(&h.app, "b", "hi").await;

    let (_, payload) = get(&h.app, "/health/ready").await;
    assert_eq!(payload["active_conversations"], 2);
    assert_eq!(payload["buffered_turns"], 4);
}

#[tokio::test]
async fn handler_panic_becomes_500() {
    let memory = Arc::new(MemoryRegistry::new(20));
    let state = AppState::new(
        Settings::default(),
        memory.clone(),
        Arc::new(PanickingLlm),
        Arc::new(EmptyContext::default()),
    );
    let app = build_router(state);

    let (status, body) = send_message(&app, "u1", "hi").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "An error occurred while processing your request.");
    assert!(memory.is_empty());

    // The router keeps serving after the panic
    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn get_response_replies_and_remembers() {
    let h = harness(20);

    let (status, body) = send_message(&h.app, "u1", "hi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "echo: hi");

    let (status, _) = send_message(&h.app, "u1", "again").await;
    assert_eq!(status, StatusCode::OK);

    // Second prompt carried the first exchange
    let prompts = h.llm.prompts.lock();
    let second = &prompts[1];
    let contents: Vec<_> = second.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(second[0].role, "system");
    assert_eq!(&contents[1..], &["hi", "echo: hi", "again"]);
}

#[tokio::test]
async fn missing_message_is_400() {
    let h = harness(20);
    let (status, body) = post(&h.app, "/get-response", json!({"user_id": "u1"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
    assert!(h.llm.prompts.lock().is_empty());
}

#[tokio::test]
async fn malformed_json_is_400() {
    let h = harness(20);
    let response = h
        .app
        .clone()
        .oneshot(
            Request::post("/get-response")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn llm_failure_is_500_and_history_unchanged() {
    let h = harness(20);
    send_message(&h.app, "u1", "first").await;
    let before = history_texts(&h.memory, "u1");

    h.llm.fail.store(true, Ordering::SeqCst);
    let (status, body) = send_message(&h.app, "u1", "second").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "An error occurred while processing your request.");
    assert_eq!(history_texts(&h.memory, "u1"), before);
}

#[tokio::test]
async fn failed_first_request_leaves_nothing_to_reset() {
    let h = harness(20);
    h.llm.fail.store(true, Ordering::SeqCst);

    let (status, _) = send_message(&h.app, "newbie", "hello?").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!h.memory.contains("newbie"));

    let (status, body) = post(&h.app, "/reset-conversations", json!({"user_id": "newbie"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No conversation found for user newbie.");
}

#[tokio::test]
async fn default_user_is_used_when_absent() {
    let h = harness(20);
    post(&h.app, "/get-response", json!({"message": "anonymous"})).await;

    assert!(h.memory.contains("default_user"));
    assert_eq!(history_texts(&h.memory, "default_user").len(), 2);
}

#[tokio::test]
async fn ai_response_fetches_context_for_query() {
    let h = harness(20);
    let (status, body) = post(
        &h.app,
        "/get-ai-response",
        json!({"query": "Any tasks due?", "userId": "s-9"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "echo: Any tasks due?");
    assert_eq!(
        h.context.queries.lock().as_slice(),
        &[("Any tasks due?".to_string(), "s-9".to_string())]
    );
    assert_eq!(history_texts(&h.memory, "s-9").len(), 2);
}

#[tokio::test]
async fn ai_response_without_query_is_400() {
    let h = harness(20);
    let (status, body) = post(&h.app, "/get-ai-response", json!({"userId": "s-9"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query is required");
}

#[tokio::test]
async fn reset_single_user_then_not_found() {
    let h = harness(20);
    send_message(&h.app, "alice", "hi").await;

    let (status, body) = post(&h.app, "/reset-conversations", json!({"user_id": "alice"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Conversation for user alice has been reset.");

    let (status, _) = post(&h.app, "/reset-conversations", json!({"user_id": "alice"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_without_user_clears_everyone() {
    let h = harness(20);
    send_message(&h.app, "a", "hi").await;
    send_message(&h.app, "b", "hi").await;

    let (status, body) = post(&h.app, "/reset-conversations", json!({"user_id": null})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All conversations have been reset.");
    assert!(h.memory.is_empty());
}

#[tokio::test]
async fn window_of_two_keeps_latest_turns() {
    let h = harness(2);
    send_message(&h.app, "u", "hi").await;
    send_message(&h.app, "u", "bye").await;

    assert_eq!(history_texts(&h.memory, "u"), vec!["bye", "echo: bye"]);
}

#[tokio::test]
async fn concurrent_requests_for_one_user_are_all_recorded() {
    let h = harness(100);
    let requests = (0..20).map(|i| {
        let app = h.app.clone();
        async move {
            send_message(&app, "busy", &format!("m{}", i)).await
        }
    });

    let results = futures::future::join_all(requests).await;
    assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));

    let history = history_texts(&h.memory, "busy");
    assert_eq!(history.len(), 40);
    for pair in history.chunks(2) {
        assert_eq!(format!("echo: {}", pair[0]), pair[1]);
    }
}

#[tokio::test]
async fn suggest_replies_requires_conversation() {
    let h = harness(20);
    let (status, body) = post(&h.app, "/suggest-replies", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Conversation context is required");
}

#[tokio::test]
async fn assist_endpoints_do_not_touch_memory() {
    let h = harness(20);
    let (status, body) =
        post(&h.app, "/pyapi/generate-content", json!({"prompt": "lab report"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "echo: lab report");
    assert!(h.memory.is_empty());
}
