//! HTTP routes
//!
//! Every list endpoint answers 200 with a JSON array; upstream trouble shows up
//! as stale or empty data, never as a 5xx.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use indexmap::IndexMap;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::server::auth::require_bearer;
use crate::server::state::AppState;
use crate::version::refresh::get_or_refresh;
use crate::version::source::SourceKind;

const NODE_PATH: &str = "/api/v1/docker/node";

fn minecraft_path(kind: SourceKind) -> String {
    format!("/api/v1/minecraft/{}", kind)
}

/// Builds the API router over `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/endpoints", get(endpoints))
        .route("/api/v1/minecraft/{source}", get(minecraft_versions))
        .route(NODE_PATH, get(node_versions))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn endpoints(State(state): State<AppState>) -> Json<Value> {
    let minecraft: IndexMap<&str, String> = state
        .catalog
        .minecraft_kinds()
        .map(|kind| (kind.as_str(), minecraft_path(kind)))
        .collect();

    Json(json!({
        "minecraft": minecraft,
        "docker": { "node": NODE_PATH },
    }))
}

fn unknown_source(name: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("Unknown source: {}", name) })),
    )
        .into_response()
}

async fn minecraft_versions(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let source = name
        .parse::<SourceKind>()
        .ok()
        .filter(SourceKind::is_minecraft)
        .and_then(|kind| state.catalog.minecraft(kind));

    let Some(source) = source else {
        return unknown_source(&name);
    };

    let refreshed = get_or_refresh(state.cache.as_ref(), source.as_ref()).await;
    Json(refreshed.items).into_response()
}

async fn node_versions(State(state): State<AppState>) -> Response {
    let refreshed = get_or_refresh(state.cache.as_ref(), state.catalog.node().as_ref()).await;
    Json(refreshed.items).into_response()
}
