//! Integration tests for the friction item CRUD endpoints.
//!
//! Each test boots the real axum server on a random port with a throwaway
//! data directory and drives it over HTTP.

use frictiond::{config::ServerConfig, rest::build_router, AppContext};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// Spawn a test server on a random port. The TempDir must stay alive for the
/// duration of the test.
async fn spawn_server() -> (String, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = Arc::new(ServerConfig::new(
        Some(0),
        Some(dir.path().to_path_buf()),
        Some("error".to_string()),
        None,
    ));
    let ctx = Arc::new(AppContext::init(config).await.unwrap());
    let router = build_router(ctx);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), dir)
}

async fn create_item(base: &str, body: Value) -> Value {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/api/friction-items"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn health_and_root_endpoints() {
    let (base, _dir) = spawn_server().await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");

    let resp = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Friction Log API");
}

#[tokio::test]
async fn create_then_read_returns_same_fields() {
    let (base, _dir) = spawn_server().await;

    let created = create_item(
        &base,
        json!({
            "title": "Printer jams every morning",
            "description": "tray 2 specifically",
            "annoyance_level": 4,
            "category": "work"
        }),
    )
    .await;

    assert_eq!(created["title"], "Printer jams every morning");
    assert_eq!(created["description"], "tray 2 specifically");
    assert_eq!(created["annoyance_level"], 4);
    assert_eq!(created["category"], "work");
    assert_eq!(created["status"], "not_fixed");
    assert!(created["fixed_at"].is_null());
    assert!(created["created_at"].is_string());

    let id = created["id"].as_i64().unwrap();
    let resp = reqwest::get(format!("{base}/api/friction-items/{id}"))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_validation_failures_return_422() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    // Empty title.
    let resp = client
        .post(format!("{base}/api/friction-items"))
        .json(&json!({"title": "  ", "annoyance_level": 2, "category": "home"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    // Annoyance level out of range.
    for level in [0, 6] {
        let resp = client
            .post(format!("{base}/api/friction-items"))
            .json(&json!({"title": "x", "annoyance_level": level, "category": "home"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 422, "level {level}");
    }

    // Unknown category is rejected by deserialization.
    let resp = client
        .post(format!("{base}/api/friction-items"))
        .json(&json!({"title": "x", "annoyance_level": 2, "category": "garden"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn get_missing_item_returns_404() {
    let (base, _dir) = spawn_server().await;
    let resp = reqwest::get(format!("{base}/api/friction-items/9999"))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "friction item not found");
}

#[tokio::test]
async fn list_is_newest_first_and_filterable() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    let a = create_item(&base, json!({"title": "A", "annoyance_level": 1, "category": "home"})).await;
    let b = create_item(&base, json!({"title": "B", "annoyance_level": 2, "category": "work"})).await;
    let c = create_item(&base, json!({"title": "C", "annoyance_level": 3, "category": "home"})).await;

    let all: Vec<Value> = reqwest::get(format!("{base}/api/friction-items"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|i| i["id"].as_i64().unwrap()).collect();
    assert_eq!(
        ids,
        vec![
            c["id"].as_i64().unwrap(),
            b["id"].as_i64().unwrap(),
            a["id"].as_i64().unwrap()
        ]
    );

    let home: Vec<Value> = reqwest::get(format!("{base}/api/friction-items?category=home"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(home.len(), 2);

    // Fix one item, then filter by status.
    let b_id = b["id"].as_i64().unwrap();
    client
        .put(format!("{base}/api/friction-items/{b_id}"))
        .json(&json!({"status": "fixed"}))
        .send()
        .await
        .unwrap();
    let fixed: Vec<Value> = reqwest::get(format!("{base}/api/friction-items?status=fixed"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fixed.len(), 1);
    assert_eq!(fixed[0]["id"], b_id);

    // Unknown filter values are a validation error.
    let resp = reqwest::get(format!("{base}/api/friction-items?status=resolved"))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
    let resp = reqwest::get(format!("{base}/api/friction-items?category=garden"))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn update_persists_and_leaves_absent_fields_alone() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    let created = create_item(
        &base,
        json!({
            "title": "Slow wifi",
            "description": "upstairs only",
            "annoyance_level": 3,
            "category": "digital"
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let resp = client
        .put(format!("{base}/api/friction-items/{id}"))
        .json(&json!({"annoyance_level": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["annoyance_level"], 5);
    assert_eq!(updated["title"], "Slow wifi");
    assert_eq!(updated["description"], "upstairs only");
    assert_eq!(updated["category"], "digital");
}

#[tokio::test]
async fn fixing_sets_fixed_at_and_reopening_clears_it() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    let created = create_item(
        &base,
        json!({"title": "Sticky lock", "annoyance_level": 2, "category": "home"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let fixed: Value = client
        .put(format!("{base}/api/friction-items/{id}"))
        .json(&json!({"status": "fixed"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fixed["status"], "fixed");
    assert!(fixed["fixed_at"].is_string());

    let reopened: Value = client
        .put(format!("{base}/api/friction-items/{id}"))
        .json(&json!({"status": "in_progress"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reopened["status"], "in_progress");
    assert!(reopened["fixed_at"].is_null());
}

#[tokio::test]
async fn update_missing_item_returns_404() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .put(format!("{base}/api/friction-items/9999"))
        .json(&json!({"title": "new title"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_removes_item() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    let created = create_item(
        &base,
        json!({"title": "Going away", "annoyance_level": 1, "category": "other"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let resp = client
        .delete(format!("{base}/api/friction-items/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = reqwest::get(format!("{base}/api/friction-items/{id}"))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = client
        .delete(format!("{base}/api/friction-items/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn encounter_endpoint_counts_and_flags_limit() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    let created = create_item(
        &base,
        json!({
            "title": "Phone notifications",
            "annoyance_level": 3,
            "category": "digital",
            "encounter_limit": 2
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["encounter_count"], 0);

    let first: Value = client
        .post(format!("{base}/api/friction-items/{id}/encounter"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["encounter_count"], 1);
    assert_eq!(first["is_limit_exceeded"], false);

    let second: Value = client
        .post(format!("{base}/api/friction-items/{id}/encounter"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["encounter_count"], 2);
    assert_eq!(second["is_limit_exceeded"], true);
    assert!(second["last_encounter_date"].is_string());

    let resp = client
        .post(format!("{base}/api/friction-items/9999/encounter"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
