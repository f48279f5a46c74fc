use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, AppState};
use service::diagram::repository::mock::MockDiagramRepository;
use service::diagram::DiagramService;
use service::storage::memory::MemoryBlobStore;

// The HTTP layer is exercised end to end against the in-memory repository
// and blob store, so no database or object store needs to be running.
struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let repo = Arc::new(MockDiagramRepository::default());
    let blobs = Arc::new(MemoryBlobStore::new());
    let diagrams = Arc::new(DiagramService::new(repo, blobs));

    let app: Router = routes::build_router(
        AppState { diagrams },
        CorsLayer::very_permissive(),
    );
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn public_root_and_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(format!("{}/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Diagram Service");

    let res = c.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn auth_stub_login() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/auth/login", app.base_url))
        .json(&json!({"username": "testuser", "password": "password"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["token"], "fake-jwt-token");

    let res = c
        .post(format!("{}/auth/login", app.base_url))
        .json(&json!({"username": "testuser", "password": "wrong"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn create_get_update_delete_flow() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let owner = Uuid::new_v4();
    let payload = json!({"type": "sequence", "steps": []});

    // Create
    let res = c
        .post(format!("{}/diagrams", app.base_url))
        .json(&json!({"name": "Login Flow", "payload": payload, "owner_id": owner}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    assert_eq!(created["name"], "Login Flow");
    assert_eq!(created["owner_id"], json!(owner));
    assert_eq!(created["payload"], payload);
    assert_eq!(created["created_at"], created["updated_at"]);
    let id = created["id"].as_str().unwrap().to_string();
    let object_key = created["object_key"].as_str().unwrap().to_string();
    assert!(object_key.ends_with(".json"));

    // Get echoes the stored payload
    let res = c.get(format!("{}/diagrams/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let fetched = res.json::<serde_json::Value>().await?;
    assert_eq!(fetched["payload"], payload);
    assert_eq!(fetched["object_key"], json!(object_key));

    // Update payload; the object key must not change
    let new_payload = json!({"type": "sequence", "steps": ["a"]});
    let res = c
        .put(format!("{}/diagrams/{}", app.base_url, id))
        .json(&json!({"payload": new_payload}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<serde_json::Value>().await?;
    assert_eq!(updated["payload"], new_payload);
    assert_eq!(updated["object_key"], json!(object_key));

    // Delete, then the id is gone
    let res = c.delete(format!("{}/diagrams/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["ok"], true);

    let res = c.get(format!("{}/diagrams/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_has_no_payload_field() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    for name in ["Diagram 1", "Diagram 2"] {
        let res = c
            .post(format!("{}/diagrams", app.base_url))
            .json(&json!({"name": name, "payload": {"nodes": []}}))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }

    let res = c.get(format!("{}/diagrams", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let listed = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(listed.len(), 2);
    for entry in &listed {
        assert!(entry.get("payload").is_none());
        assert!(entry.get("object_key").is_some());
    }
    Ok(())
}

#[tokio::test]
async fn missing_owner_is_defaulted() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/diagrams", app.base_url))
        .json(&json!({"name": "No Owner", "payload": {}}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    // A fresh owner id gets derived at the HTTP boundary.
    assert!(created["owner_id"].as_str().unwrap().parse::<Uuid>().is_ok());
    Ok(())
}

#[tokio::test]
async fn validation_and_not_found_statuses() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/diagrams", app.base_url))
        .json(&json!({"name": "  ", "payload": {}}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let ghost = Uuid::new_v4();
    let res = c.get(format!("{}/diagrams/{}", app.base_url, ghost)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "diagram not found");
    assert_eq!(body["retryable"], false);

    let res = c
        .put(format!("{}/diagrams/{}", app.base_url, ghost))
        .json(&json!({"name": "x"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(format!("{}/diagrams/{}", app.base_url, ghost)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}
