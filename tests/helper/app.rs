//! Router test utilities

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use version_proxy::server::routes::router;
use version_proxy::server::state::AppState;
use version_proxy::version::cache::MemoryCache;
use version_proxy::version::catalog::SourceCatalog;
use version_proxy::version::source::{MinecraftSource, VersionSource};
use version_proxy::version::types::NodeVersion;

/// Create a router over the given sources and cache
pub fn create_test_app(
    minecraft: Vec<Arc<MinecraftSource>>,
    node: Arc<dyn VersionSource<Item = NodeVersion>>,
    cache: Arc<MemoryCache>,
    auth_token: Option<&str>,
) -> Router {
    let catalog = Arc::new(SourceCatalog::new(minecraft, node));
    router(AppState::new(
        cache,
        catalog,
        auth_token.map(str::to_string),
    ))
}

/// Send a GET request, returning the status and JSON body
pub async fn get_json(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();

    (status, body)
}
