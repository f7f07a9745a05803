//! HTTP API tests driven through the router

mod helper;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use mockito::{Matcher, Server};
use serde_json::json;

use helper::{FakeSource, create_test_app, get_json};
use version_proxy::version::cache::{CacheStore, MemoryCache};
use version_proxy::version::source::{MinecraftSource, SourceKind};
use version_proxy::version::sources::{DockerHubSource, RetryPolicy};
use version_proxy::version::types::NodeVersion;

fn empty_node() -> Arc<FakeSource<NodeVersion>> {
    Arc::new(FakeSource::node(&[]))
}

#[tokio::test]
async fn health_returns_ok() {
    let app = create_test_app(vec![], empty_node(), Arc::new(MemoryCache::new()), None);

    let (status, body) = get_json(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn minecraft_endpoint_returns_normalized_records() {
    let vanilla: Arc<MinecraftSource> =
        Arc::new(FakeSource::releases(SourceKind::Vanilla, &["1.21", "1.8.9"]));
    let app = create_test_app(
        vec![vanilla],
        empty_node(),
        Arc::new(MemoryCache::new()),
        None,
    );

    let (status, body) = get_json(&app, "/api/v1/minecraft/vanilla", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "1.21");
    assert_eq!(body[0]["type"], "release");
    assert_eq!(body[0]["baseVersion"], "1.21");
    assert_eq!(body[0]["isSnapshot"], false);
    assert_eq!(body[0]["javaVersions"]["recommended"], "21");
    assert_eq!(body[0]["supportsDatapacks"], true);
    assert!(body[0].get("buildNumbers").is_none());
    assert_eq!(body[1]["id"], "1.8.9");
    assert_eq!(body[1]["javaVersions"]["recommended"], "8");
    assert_eq!(body[1]["supportsDatapacks"], false);
}

#[tokio::test]
async fn minecraft_endpoint_serves_second_request_from_cache() {
    let paper = Arc::new(FakeSource::releases(SourceKind::Paper, &["1.20.4"]));
    let source: Arc<MinecraftSource> = paper.clone();
    let app = create_test_app(
        vec![source],
        empty_node(),
        Arc::new(MemoryCache::new()),
        None,
    );

    let (_, first) = get_json(&app, "/api/v1/minecraft/paper", None).await;
    let (_, second) = get_json(&app, "/api/v1/minecraft/paper", None).await;

    assert_eq!(first, second);
    assert_eq!(paper.calls(), 1);
}

#[tokio::test]
async fn minecraft_endpoint_returns_empty_list_when_upstream_fails_without_cache() {
    let forge: Arc<MinecraftSource> = Arc::new(FakeSource::failing(SourceKind::Forge));
    let app = create_test_app(
        vec![forge],
        empty_node(),
        Arc::new(MemoryCache::new()),
        None,
    );

    let (status, body) = get_json(&app, "/api/v1/minecraft/forge", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn minecraft_endpoint_serves_cached_list_while_upstream_is_down() {
    let cache = Arc::new(MemoryCache::new());
    cache
        .set_with_expiry(
            "minecraft:quilt",
            &serde_json::to_string(&json!([{
                "id": "1.20.1",
                "type": "release",
                "baseVersion": "1.20.1",
                "isStable": true,
                "javaVersions": { "minimum": "17", "maximum": "21", "recommended": "17" },
                "supportsDatapacks": true,
                "loaderVersions": { "min": "0.19.0", "max": "0.26.0" },
                "isSnapshot": false
            }]))
            .unwrap(),
            Duration::from_secs(3600),
        )
        .unwrap();
    let quilt = Arc::new(FakeSource::failing(SourceKind::Quilt));
    let source: Arc<MinecraftSource> = quilt.clone();
    let app = create_test_app(vec![source], empty_node(), cache, None);

    let (status, body) = get_json(&app, "/api/v1/minecraft/quilt", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["loaderVersions"], json!({ "min": "0.19.0", "max": "0.26.0" }));
    assert_eq!(quilt.calls(), 0);
}

#[tokio::test]
async fn unknown_minecraft_source_returns_404() {
    let app = create_test_app(vec![], empty_node(), Arc::new(MemoryCache::new()), None);

    for name in ["bedrock", "node"] {
        let (status, body) = get_json(&app, &format!("/api/v1/minecraft/{}", name), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": format!("Unknown source: {}", name) }));
    }
}

#[tokio::test]
async fn node_endpoint_returns_versions_in_ascending_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/repositories/library/node/tags")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "next": null,
                "results": [
                    { "name": "22.1.0" },
                    { "name": "lts" },
                    { "name": "18.20.4-alpine" },
                    { "name": "20.9.0" },
                    { "name": "18.20.4" },
                    { "name": "10.24.1" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let node = DockerHubSource::new(&server.url(), "node").with_retry(RetryPolicy {
        max_attempts: 1,
        base_delay: Duration::ZERO,
    });
    let app = create_test_app(vec![], Arc::new(node), Arc::new(MemoryCache::new()), None);

    let (status, body) = get_json(&app, "/api/v1/docker/node", None).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "major": 18, "minor": 20, "patch": 4 },
            { "major": 20, "minor": 9, "patch": 0 },
            { "major": 22, "minor": 1, "patch": 0 }
        ])
    );
}

#[tokio::test]
async fn endpoints_lists_every_configured_route() {
    let vanilla: Arc<MinecraftSource> =
        Arc::new(FakeSource::releases(SourceKind::Vanilla, &[]));
    let neoforge: Arc<MinecraftSource> =
        Arc::new(FakeSource::releases(SourceKind::NeoForge, &[]));
    let app = create_test_app(
        vec![vanilla, neoforge],
        empty_node(),
        Arc::new(MemoryCache::new()),
        None,
    );

    let (status, body) = get_json(&app, "/api/v1/endpoints", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "minecraft": {
                "vanilla": "/api/v1/minecraft/vanilla",
                "neoforge": "/api/v1/minecraft/neoforge"
            },
            "docker": { "node": "/api/v1/docker/node" }
        })
    );
}

#[tokio::test]
async fn configured_token_is_required_on_every_route() {
    let app = create_test_app(
        vec![],
        empty_node(),
        Arc::new(MemoryCache::new()),
        Some("s3cret"),
    );

    let (missing, body) = get_json(&app, "/health", None).await;
    let (wrong, _) = get_json(&app, "/api/v1/docker/node", Some("guess")).await;
    let (valid, _) = get_json(&app, "/health", Some("s3cret")).await;

    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));
    assert_eq!(wrong, StatusCode::UNAUTHORIZED);
    assert_eq!(valid, StatusCode::OK);
}
