use super::mocks::StubLlmClient;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use skill_relay::{
    callback::CallbackDispatcher,
    config::TaskConfig,
    llm::InferenceGateway,
    server::{self, AppState},
    task::TaskRunner,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tower::ServiceExt; // for `oneshot`
use wiremock::MockServer;

pub const SKILL_PATH: &str = "/skill";

/// Router backed by `stub`, plus a handle on the prompts it records.
pub fn create_test_app(stub: StubLlmClient) -> (Router, Arc<Mutex<Vec<String>>>) {
    let prompts = stub.prompt_log();
    let gateway = Arc::new(InferenceGateway::new(Arc::new(stub)));
    (create_app_with_gateway(gateway), prompts)
}

pub fn create_app_with_gateway(gateway: Arc<InferenceGateway>) -> Router {
    server::router(AppState::new(create_runner(gateway)), SKILL_PATH)
}

pub fn create_runner(gateway: Arc<InferenceGateway>) -> TaskRunner {
    let dispatcher = Arc::new(
        CallbackDispatcher::with_timeout(Duration::from_secs(2), 1)
            .expect("Failed to build dispatcher"),
    );
    TaskRunner::new(gateway, dispatcher, &TaskConfig::default())
}

pub fn skill_body(utterance: &str, callback_url: Option<&str>) -> Value {
    let mut user_request = json!({
        "timezone": "Asia/Seoul",
        "utterance": utterance,
        "lang": "ko",
        "user": { "id": "test-user", "type": "botUserKey", "properties": {} }
    });
    if let Some(url) = callback_url {
        user_request["callbackUrl"] = json!(url);
    }

    json!({
        "intent": { "id": "intent-1", "name": "fallback" },
        "userRequest": user_request,
        "bot": { "id": "bot-1", "name": "relay" },
        "action": { "name": "relay", "params": {} }
    })
}

pub async fn post_raw(app: Router, content_type: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(SKILL_PATH)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn post_skill(app: Router, body: &Value) -> (StatusCode, Value) {
    post_raw(app, "application/json", body.to_string()).await
}

pub fn response_text(body: &Value) -> &str {
    body["template"]["outputs"][0]["simpleText"]["text"]
        .as_str()
        .expect("response has no simpleText")
}

/// Polls `server` until it has seen `count` requests or `timeout` passes.
pub async fn wait_for_requests(
    server: &MockServer,
    count: usize,
    timeout: Duration,
) -> Vec<wiremock::Request> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let received = server.received_requests().await.unwrap_or_default();
        if received.len() >= count || tokio::time::Instant::now() >= deadline {
            return received;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
