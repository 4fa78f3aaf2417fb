//! Local API tests

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tempfile::TempDir;

use velo_studio::app::state::{AppState, Services};
use velo_studio::server::serve::router;
use velo_studio::storage::api_config::{load_api_config, ApiConfig};
use velo_studio::storage::layout::StorageLayout;
use velo_studio::storage::settings::Settings;

use crate::fakes::{spawn_server, FakePlatform};

struct TestServer {
    base: String,
    state: Arc<AppState>,
    layout: StorageLayout,
    _dir: TempDir,
}

async fn start() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let layout = StorageLayout::new(dir.path());
    let state = Arc::new(
        AppState::from_config(
            layout.api_config_file(),
            ApiConfig::default(),
            Settings::default(),
        )
        .unwrap(),
    );
    let base = spawn_server(router(state.clone())).await;
    TestServer {
        base,
        state,
        layout,
        _dir: dir,
    }
}

async fn with_fake_platform(server: &TestServer) {
    *server.state.services.write().await = Services {
        platform: Some(Arc::new(FakePlatform::default())),
        ..Default::default()
    };
}

async fn post(server: &TestServer, path: &str, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}{}", server.base, path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap_or(Value::Null))
}

async fn get(server: &TestServer, path: &str) -> (StatusCode, Value) {
    let response = reqwest::get(format!("{}{}", server.base, path)).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health() {
    let server = start().await;
    let (status, body) = get(&server, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_parse_returns_graph_report_and_diagram() {
    let server = start().await;
    let (status, body) = post(
        &server,
        "/workflows/parse",
        json!({ "prompt": "typeform to airtable" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["graph"]["name"], "Typeform to Airtable Automation");
    assert_eq!(body["graph"]["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(body["report"]["valid"], true);
    assert!(body["diagram"].as_str().unwrap().starts_with("graph TD"));
}

#[tokio::test]
async fn test_draft_without_key_uses_parser() {
    let server = start().await;
    let (status, body) = post(&server, "/workflows/draft", json!({ "prompt": "payment" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "local");
    assert_eq!(body["graph"]["nodes"][0]["name"], "Razorpay Webhook");
}

#[tokio::test]
async fn test_validate_untyped_json() {
    let server = start().await;
    let (status, body) = post(&server, "/workflows/validate", json!({ "name": "x", "nodes": [] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn test_import_rejects_prose() {
    let server = start().await;
    let (status, body) = post(&server, "/workflows/import", json!({ "text": "no json here" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "invalid_format");
}

#[tokio::test]
async fn test_import_reports_node_problems() {
    let server = start().await;
    let text = r#"{"name": "CRM", "nodes": [{"name": "Start",
        "type": "n8n-nodes-base.manualTrigger", "typeVersion": 1, "position": [0, 0]}]}"#;
    let (status, body) = post(&server, "/workflows/import", json!({ "text": text })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["graph"]["name"], "CRM");
    assert_eq!(body["report"]["valid"], false);
    assert_eq!(body["report"]["errors"], json!(["Node 0: missing id"]));
}

#[tokio::test]
async fn test_edit_applies_operations_in_order() {
    let server = start().await;
    let (_, parsed) = post(&server, "/workflows/parse", json!({ "prompt": "typeform to gmail" })).await;

    let (status, body) = post(
        &server,
        "/workflows/edit",
        json!({
            "workflow": parsed["graph"],
            "edits": [
                { "op": "rename", "name": "Leads" },
                { "op": "duplicate_node", "index": 1 },
                { "op": "update_node", "index": 2, "field": "name", "value": "Send Copy" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["graph"]["name"], "Leads");
    assert_eq!(body["graph"]["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(body["graph"]["nodes"][2]["name"], "Send Copy");
    assert_eq!(body["report"]["valid"], true);

    let (status, body) = post(
        &server,
        "/workflows/edit",
        json!({ "workflow": parsed["graph"], "edits": [{ "op": "remove_node", "index": 7 }] }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_deploy_requires_platform_key() {
    let server = start().await;
    let (status, body) = post(
        &server,
        "/workflows/deploy",
        json!({ "workflow": { "name": "x", "nodes": [] } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "config_error");
}

#[tokio::test]
async fn test_deploy_validation_and_success() {
    let server = start().await;
    with_fake_platform(&server).await;

    let (status, body) = post(
        &server,
        "/workflows/deploy",
        json!({ "workflow": { "name": "x", "nodes": [] } }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_failed");
    assert!(body["details"].as_array().unwrap().len() >= 2);

    let graph = velo_studio::generator::parse("typeform to gmail");
    let (status, body) = post(
        &server,
        "/workflows/deploy",
        json!({ "workflow": graph, "activate": true }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "wf-1");
    assert_eq!(body["active"], true);

    let (status, body) = get(&server, "/platform/workflows").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_emotion() {
    let server = start().await;
    let (_, body) = post(&server, "/emotion", json!({ "text": "we must ship" })).await;
    assert_eq!(body["emotion"], "confident");
    assert_eq!(body["confidence"], 75);
}

#[tokio::test]
async fn test_chat_requires_model_key() {
    let server = start().await;
    let (status, _) = post(&server, "/chat", json!({ "message": "hi" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&server, "/chat/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_config_update_is_saved_and_masked() {
    let server = start().await;

    let response = reqwest::Client::new()
        .put(format!("{}/config", server.base))
        .json(&json!({
            "openRouterKey": "sk-or-v1-abcdef",
            "n8nUrl": "http://n8n.local:5678",
            "n8nApiKey": "n8n-key-1234"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, body) = get(&server, "/config").await;
    assert_eq!(body["openRouterKey"], "***********cdef");
    assert_eq!(body["n8nUrl"], "http://n8n.local:5678");

    let stored = load_api_config(&server.layout.api_config_file()).await.unwrap();
    assert_eq!(stored.n8n_api_key, "n8n-key-1234");

    let services = server.state.services().await;
    assert!(services.completions.is_some());
    assert!(services.drafter.has_provider());

    // Send the masked view back with only the URL changed
    let mut edited = body.clone();
    edited["n8nUrl"] = json!("http://n8n.other:5678");
    let response = reqwest::Client::new()
        .put(format!("{}/config", server.base))
        .json(&edited)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = load_api_config(&server.layout.api_config_file()).await.unwrap();
    assert_eq!(stored.openrouter_api_key, "sk-or-v1-abcdef");
    assert_eq!(stored.n8n_api_key, "n8n-key-1234");
    assert_eq!(stored.n8n_url, "http://n8n.other:5678");
}
