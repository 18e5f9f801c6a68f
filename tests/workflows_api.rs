//! Integration tests for workflow management and simulated execution.
//!
//! The app runs with an instant node pace so simulated runs resolve within
//! the polling window.

use agentdeck::config::{Config, DatabaseConfig, RelayConfig, RuntimeConfig, ServerConfig};
use agentdeck::create_app;
use serde_json::{json, Value};
use std::time::Duration;

/// Start the application with an isolated data directory.
async fn start_app() -> String {
    let data_dir =
        std::env::temp_dir().join(format!("agentdeck-workflows-{}", uuid::Uuid::new_v4()));
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            data_dir: data_dir.to_string_lossy().into_owned(),
        },
        relay: RelayConfig {
            adk_service_url: "http://127.0.0.1:1".to_string(),
            openrouter_api_url: "http://127.0.0.1:1".to_string(),
            openrouter_api_key: None,
            chat_model: "openai/gpt-3.5-turbo".to_string(),
        },
        runtime: RuntimeConfig::instant(),
    };

    let app = create_app(config).await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn post_json(base: &str, path: &str, body: Value) -> (u16, Value) {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}{}", base, path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn get_json(base: &str, path: &str) -> (u16, Value) {
    let resp = reqwest::get(format!("{}{}", base, path)).await.unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// A three-node pipeline: trigger -> agent -> notifier.
fn pipeline(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Invoice Pipeline",
        "nodes": [
            { "id": "start", "name": "Start", "type": "trigger" },
            { "id": "work", "name": "Parse Invoices", "type": "agent" },
            { "id": "notify", "name": "Notify Team", "type": "notifier" }
        ],
        "connections": [
            { "from": "start", "to": "work" },
            { "from": "work", "to": "notify" }
        ]
    })
}

/// Poll a workflow until every node completed or the window elapses.
async fn wait_for_completion(base: &str, id: &str) -> Value {
    for _ in 0..100 {
        let (status, body) = get_json(base, &format!("/api/workflows/{}", id)).await;
        assert_eq!(status, 200);
        let all_completed = body["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .all(|n| n["status"] == "completed");
        if all_completed && body["status"] == "paused" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("workflow '{}' did not complete in time", id);
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn create_get_update_delete_round_trip() {
    let base = start_app().await;

    let (status, body) = post_json(&base, "/api/workflows", pipeline("wf-crud")).await;
    assert_eq!(status, 201);
    assert_eq!(body["id"], "wf-crud");

    let (status, body) = get_json(&base, "/api/workflows/wf-crud").await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Invoice Pipeline");
    assert_eq!(body["status"], "paused");
    assert_eq!(body["nodes"][0]["status"], "idle");

    // Update renames the workflow
    let mut updated = pipeline("wf-crud");
    updated["name"] = json!("Renamed Pipeline");
    let client = reqwest::Client::new();
    let resp = client
        .put(format!("{}/api/workflows/wf-crud", base))
        .json(&updated)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let (_, body) = get_json(&base, "/api/workflows/wf-crud").await;
    assert_eq!(body["name"], "Renamed Pipeline");

    let resp = client
        .delete(format!("{}/api/workflows/wf-crud", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let (status, _) = get_json(&base, "/api/workflows/wf-crud").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn create_rejects_duplicate_id() {
    let base = start_app().await;

    let (status, _) = post_json(&base, "/api/workflows", pipeline("wf-dup")).await;
    assert_eq!(status, 201);
    let (status, _) = post_json(&base, "/api/workflows", pipeline("wf-dup")).await;
    assert_eq!(status, 409);
}

#[tokio::test]
async fn list_shows_created_workflows() {
    let base = start_app().await;

    post_json(&base, "/api/workflows", pipeline("wf-a")).await;
    post_json(&base, "/api/workflows", pipeline("wf-b")).await;

    let (status, body) = get_json(&base, "/api/workflows").await;
    assert_eq!(status, 200);
    let ids: Vec<&str> = body["workflows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"wf-a"));
    assert!(ids.contains(&"wf-b"));
}

#[tokio::test]
async fn duplicate_creates_reset_copy() {
    let base = start_app().await;

    post_json(&base, "/api/workflows", pipeline("wf-src")).await;
    let (status, copy) = post_json(&base, "/api/workflows/wf-src/duplicate", json!({})).await;
    assert_eq!(status, 201);

    let copy_id = copy["id"].as_str().unwrap();
    assert!(copy_id.starts_with("wf-src-copy-"));
    assert_eq!(copy["name"], "Invoice Pipeline (Copy)");
    assert_eq!(copy["status"], "paused");
    assert!(copy["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .all(|n| n["status"] == "idle"));

    // The copy is a real record
    let (status, _) = get_json(&base, &format!("/api/workflows/{}", copy_id)).await;
    assert_eq!(status, 200);
}

// ============================================================================
// CSV import/export
// ============================================================================

#[tokio::test]
async fn template_download_serves_csv() {
    let base = start_app().await;

    let resp = reqwest::get(format!("{}/api/workflows/template", base))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["content-type"], "text/csv");

    let body = resp.text().await.unwrap();
    assert!(body.starts_with("workflow_name,workflow_description,node_id"));
    assert!(body.contains("Sample Workflow"));
}

#[tokio::test]
async fn import_creates_workflows_from_csv() {
    let base = start_app().await;
    let client = reqwest::Client::new();

    let csv = "workflow_name,workflow_description,node_id,node_name,node_type,connection_from,connection_to\n\
Imported Pipeline,Loaded from a file,start,Start,trigger,,\n\
Imported Pipeline,Loaded from a file,work,Work,agent,start,work\n";

    let resp = client
        .post(format!("{}/api/workflows/import", base))
        .header("content-type", "text/csv")
        .body(csv)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("1 workflow"));
    let id = body["workflows"][0].as_str().unwrap().to_string();
    assert!(id.starts_with("imported-pipeline-"));

    let (status, body) = get_json(&base, &format!("/api/workflows/{}", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["description"], "Loaded from a file");
    assert_eq!(body["status"], "paused");
    assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(body["connections"][0]["from"], "start");

    // Imported workflows are executable right away
    let (status, _) =
        post_json(&base, &format!("/api/workflows/{}/execute", id), json!({})).await;
    assert_eq!(status, 202);
}

#[tokio::test]
async fn import_rejects_empty_csv() {
    let base = start_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/workflows/import", base))
        .header("content-type", "text/csv")
        .body("")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn export_round_trips_through_import() {
    let base = start_app().await;
    let client = reqwest::Client::new();

    post_json(&base, "/api/workflows", pipeline("wf-exported")).await;

    let resp = reqwest::get(format!("{}/api/workflows/export", base))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["content-type"], "text/csv");
    let csv = resp.text().await.unwrap();
    assert!(csv.contains("Invoice Pipeline"));

    // The exported file imports as a new record under a fresh ID
    let resp = client
        .post(format!("{}/api/workflows/import", base))
        .header("content-type", "text/csv")
        .body(csv)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let body: Value = resp.json().await.unwrap();
    let id = body["workflows"][0].as_str().unwrap();
    assert!(id.starts_with("invoice-pipeline-"));
    assert_ne!(id, "wf-exported");

    let (_, body) = get_json(&base, "/api/workflows").await;
    assert_eq!(body["workflows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn export_with_no_workflows_returns_404() {
    let base = start_app().await;

    let resp = reqwest::get(format!("{}/api/workflows/export", base))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

// ============================================================================
// Simulated execution
// ============================================================================

#[tokio::test]
async fn execute_runs_all_nodes_and_parks_paused() {
    let base = start_app().await;

    post_json(&base, "/api/workflows", pipeline("wf-run")).await;

    let (status, body) = post_json(&base, "/api/workflows/wf-run/execute", json!({})).await;
    assert_eq!(status, 202);
    assert!(body["message"].as_str().unwrap().contains("wf-run"));

    let finished = wait_for_completion(&base, "wf-run").await;
    assert_eq!(finished["status"], "paused");
}

#[tokio::test]
async fn execute_unknown_workflow_returns_404() {
    let base = start_app().await;

    let (status, _) = post_json(&base, "/api/workflows/ghost/execute", json!({})).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn execute_without_trigger_returns_422() {
    let base = start_app().await;

    let workflow = json!({
        "id": "wf-no-trigger",
        "name": "No Trigger",
        "nodes": [ { "id": "work", "name": "Work", "type": "agent" } ],
        "connections": []
    });
    post_json(&base, "/api/workflows", workflow).await;

    let (status, body) = post_json(&base, "/api/workflows/wf-no-trigger/execute", json!({})).await;
    assert_eq!(status, 422);
    assert!(body["error"].as_str().unwrap().contains("trigger"));

    // The failed attempt parks the workflow
    let (_, body) = get_json(&base, "/api/workflows/wf-no-trigger").await;
    assert_eq!(body["status"], "paused");
}

#[tokio::test]
async fn execute_cyclic_workflow_returns_422() {
    let base = start_app().await;

    let workflow = json!({
        "id": "wf-cycle",
        "name": "Cycle",
        "nodes": [
            { "id": "start", "name": "Start", "type": "trigger" },
            { "id": "a", "name": "A", "type": "agent" },
            { "id": "b", "name": "B", "type": "agent" }
        ],
        "connections": [
            { "from": "start", "to": "a" },
            { "from": "a", "to": "b" },
            { "from": "b", "to": "a" }
        ]
    });
    post_json(&base, "/api/workflows", workflow).await;

    let (status, body) = post_json(&base, "/api/workflows/wf-cycle/execute", json!({})).await;
    assert_eq!(status, 422);
    assert!(body["error"].as_str().unwrap().contains("cycle"));
}

#[tokio::test]
async fn looping_workflow_clears_flag_after_replay() {
    let base = start_app().await;

    let mut workflow = pipeline("wf-loop");
    workflow["isLooping"] = json!(true);
    post_json(&base, "/api/workflows", workflow).await;

    let (status, _) = post_json(&base, "/api/workflows/wf-loop/execute", json!({})).await;
    assert_eq!(status, 202);

    let finished = wait_for_completion(&base, "wf-loop").await;
    assert_eq!(finished["isLooping"], false);
}

#[tokio::test]
async fn stop_parks_workflow_paused() {
    let base = start_app().await;

    post_json(&base, "/api/workflows", pipeline("wf-stop")).await;

    // Stopping with no run in flight still parks the record
    let (status, body) = post_json(&base, "/api/workflows/wf-stop/stop", json!({})).await;
    assert_eq!(status, 200);
    assert!(body["message"].as_str().unwrap().contains("wf-stop"));

    let (_, body) = get_json(&base, "/api/workflows/wf-stop").await;
    assert_eq!(body["status"], "paused");
}

#[tokio::test]
async fn stop_unknown_workflow_returns_404() {
    let base = start_app().await;

    let (status, _) = post_json(&base, "/api/workflows/ghost/stop", json!({})).await;
    assert_eq!(status, 404);
}
