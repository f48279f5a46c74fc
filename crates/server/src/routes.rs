use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

use common::types::{Banner, Health};
use service::diagram::domain::{
    CreateDiagramInput, DiagramRecord, HydratedDiagram, UpdateDiagramInput,
};
use service::diagram::DiagramService;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub diagrams: Arc<DiagramService>,
}

pub async fn root() -> Json<Banner> {
    Json(Banner { message: "Diagram Service" })
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct Token {
    pub token: String,
}

/// Auth stub. Real authentication is an external collaborator; this mirrors
/// the fixed-credential placeholder the service fronts today.
pub async fn login(
    Json(input): Json<LoginRequest>,
) -> Result<Json<Token>, (StatusCode, Json<serde_json::Value>)> {
    if input.username == "testuser" && input.password == "password" {
        return Ok(Json(Token { token: "fake-jwt-token".into() }));
    }
    Err((
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"error": "invalid credentials"})),
    ))
}

#[derive(Deserialize)]
pub struct CreateDiagramRequest {
    pub name: String,
    pub payload: serde_json::Value,
    pub owner_id: Option<Uuid>,
}

#[derive(Deserialize, Default)]
pub struct UpdateDiagramRequest {
    pub name: Option<String>,
    pub payload: Option<serde_json::Value>,
}

async fn create_diagram(
    State(state): State<AppState>,
    Json(req): Json<CreateDiagramRequest>,
) -> Result<(StatusCode, Json<HydratedDiagram>), ApiError> {
    // Owner derivation is HTTP-layer policy; the coordinator always gets one.
    let owner_id = req.owner_id.unwrap_or_else(Uuid::new_v4);
    let created = state
        .diagrams
        .create(CreateDiagramInput { name: req.name, payload: req.payload, owner_id })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_diagram(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HydratedDiagram>, ApiError> {
    Ok(Json(state.diagrams.get(id).await?))
}

async fn list_diagrams(
    State(state): State<AppState>,
) -> Result<Json<Vec<DiagramRecord>>, ApiError> {
    Ok(Json(state.diagrams.list().await?))
}

async fn update_diagram(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDiagramRequest>,
) -> Result<Json<HydratedDiagram>, ApiError> {
    let updated = state
        .diagrams
        .update(id, UpdateDiagramInput { name: req.name, payload: req.payload })
        .await?;
    Ok(Json(updated))
}

async fn delete_diagram(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.diagrams.delete(id).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", axum::routing::post(login));

    let api = Router::new()
        .route("/diagrams", get(list_diagrams).post(create_diagram))
        .route(
            "/diagrams/:id",
            get(get_diagram).put(update_diagram).delete(delete_diagram),
        );

    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
