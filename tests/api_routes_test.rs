use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::time::Instant;
use tempfile::TempDir;
use tower::ServiceExt;

use crypto_icon_api::{
    config::Config,
    icons::IconStore,
    manifest::ManifestService,
    web::{AppState, WebServer},
};

// Build a router backed by a temp directory seeded with the given files.
fn test_app(files: &[(&str, &[u8])]) -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let icons_dir = dir.path().join("icons");
    std::fs::create_dir(&icons_dir).unwrap();
    for (name, data) in files {
        std::fs::write(icons_dir.join(name), data).unwrap();
    }

    let mut config = Config::default();
    config.storage.icons_dir = icons_dir.clone();
    config.storage.manifest_path = dir.path().join("manifest.json");

    let store = IconStore::new(icons_dir);
    let manifest = ManifestService::new(
        store.clone(),
        config.storage.manifest_path.clone(),
        config.web.base_url.clone(),
    );

    let app = WebServer::create_router(AppState {
        config,
        store,
        manifest,
        started_at: Instant::now(),
    });
    (dir, app)
}

// Router whose icons directory does not exist.
fn test_app_without_directory() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let icons_dir = dir.path().join("missing");

    let mut config = Config::default();
    config.storage.icons_dir = icons_dir.clone();
    config.storage.manifest_path = dir.path().join("manifest.json");

    let store = IconStore::new(icons_dir);
    let manifest = ManifestService::new(
        store.clone(),
        config.storage.manifest_path.clone(),
        config.web.base_url.clone(),
    );

    let app = WebServer::create_router(AppState {
        config,
        store,
        manifest,
        started_at: Instant::now(),
    });
    (dir, app)
}

// Helper function to send requests to the app
async fn send_request(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!({}))
    };

    (status, json)
}

// Variant for binary responses where headers and raw bytes matter.
async fn send_request_raw(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, headers, body.to_vec())
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = test_app(&[]);

    let (status, response) = send_request(&app, Method::GET, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "ok");
    assert!(response.get("timestamp").is_some());
    assert!(response["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_index_documents_endpoints() {
    let (_dir, app) = test_app(&[]);

    let (status, response) = send_request(&app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["name"], "Crypto Icon API");
    assert_eq!(response["endpoints"]["manifest"], "/manifest.json");
    assert_eq!(response["endpoints"]["icon"], "/icons/:symbol");
    assert_eq!(
        response["usage"]["formats"],
        json!(["png", "svg", "jpg", "jpeg"])
    );
}

#[tokio::test]
async fn test_list_icons_one_entry_per_file() {
    let (_dir, app) = test_app(&[
        ("BTC.png", b"png"),
        ("eth.svg", b"svg"),
        ("eth.png", b"png"),
        ("README.md", b"skip"),
    ]);

    let (status, response) = send_request(&app, Method::GET, "/icons").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total"], 3);
    assert_eq!(response["icons"].as_array().unwrap().len(), 3);

    // Listing keeps filename casing, unlike the manifest.
    let symbols: Vec<&str> = response["icons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["symbol"].as_str().unwrap())
        .collect();
    assert!(symbols.contains(&"eth"));
    assert!(symbols.contains(&"BTC"));
}

#[tokio::test]
async fn test_list_icons_missing_directory() {
    let (_dir, app) = test_app_without_directory();

    let (status, response) = send_request(&app, Method::GET, "/icons").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "Icons directory not found");
}

#[tokio::test]
async fn test_get_icon_png_wins_over_svg() {
    let (_dir, app) = test_app(&[("ETH.png", b"png-bytes"), ("ETH.svg", b"svg-bytes")]);

    let (status, headers, body) = send_request_raw(&app, "/icons/ETH").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "image/png");
    assert_eq!(
        headers["cache-control"],
        "public, max-age=31536000, immutable"
    );
    assert_eq!(body, b"png-bytes");
}

#[tokio::test]
async fn test_get_icon_is_case_insensitive() {
    let (_dir, app) = test_app(&[("BTC.png", b"btc-bytes")]);

    let (status, _headers, body) = send_request_raw(&app, "/icons/btc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"btc-bytes");
}

#[tokio::test]
async fn test_get_icon_svg_content_type() {
    let (_dir, app) = test_app(&[("ADA.svg", b"<svg/>")]);

    let (status, headers, _body) = send_request_raw(&app, "/icons/ADA").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "image/svg+xml");
}

#[tokio::test]
async fn test_get_icon_not_found_lists_searched_formats() {
    let (_dir, app) = test_app(&[("BTC.png", b"png")]);

    let (status, response) = send_request(&app, Method::GET, "/icons/NOPE").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "Icon not found");
    assert_eq!(response["symbol"], "NOPE");
    assert_eq!(
        response["searched_formats"],
        json!(["png", "svg", "jpg", "jpeg"])
    );
}

#[tokio::test]
async fn test_search_substring_case_insensitive() {
    let (_dir, app) = test_app(&[
        ("BTC.png", b"1"),
        ("WBTC.svg", b"2"),
        ("ETH.png", b"3"),
    ]);

    let (status, response) = send_request(&app, Method::GET, "/search?q=bt").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["query"], "bt");
    assert_eq!(response["total"], 2);

    let symbols: Vec<&str> = response["icons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["symbol"].as_str().unwrap())
        .collect();
    assert_eq!(symbols, vec!["BTC", "WBTC"]);
}

#[tokio::test]
async fn test_search_requires_query() {
    let (_dir, app) = test_app(&[("BTC.png", b"1")]);

    let (status, response) = send_request(&app, Method::GET, "/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Query parameter \"q\" is required");

    let (status, _response) = send_request(&app, Method::GET, "/search?q=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_missing_directory() {
    let (_dir, app) = test_app_without_directory();

    let (status, response) = send_request(&app, Method::GET, "/search?q=btc").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "Icons directory not found");
}

#[tokio::test]
async fn test_manifest_lazy_rebuild_and_dedupe() {
    let (dir, app) = test_app(&[("BTC.png", b"1"), ("eth.svg", b"2"), ("eth.png", b"3")]);
    assert!(!dir.path().join("manifest.json").exists());

    let (status, response) = send_request(&app, Method::GET, "/manifest.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["crypto"], json!(["BTC", "ETH"]));
    assert_eq!(response["totalIcons"], 2);
    assert_eq!(response["icons"].as_array().unwrap().len(), 3);
    assert!(dir.path().join("manifest.json").exists());
}

#[tokio::test]
async fn test_manifest_entries_are_uppercased_with_cdn_urls() {
    let (_dir, app) = test_app(&[("eth.svg", b"svg")]);

    let (status, response) = send_request(&app, Method::GET, "/manifest.json").await;

    assert_eq!(status, StatusCode::OK);
    let icon = &response["icons"][0];
    assert_eq!(icon["symbol"], "ETH");
    assert_eq!(icon["url"], "/icons/ETH");
    assert_eq!(icon["cdnUrl"], "http://localhost:3002/icons/ETH");
}

#[tokio::test]
async fn test_worked_example_eth_resolves_to_png() {
    let (_dir, app) = test_app(&[
        ("BTC.png", b"btc-png"),
        ("eth.svg", b"eth-svg"),
        ("eth.png", b"eth-png"),
    ]);

    // Listing has one entry per file.
    let (status, response) = send_request(&app, Method::GET, "/icons").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total"], 3);

    // Resolution: png beats svg. Note the files are lowercase on disk, so
    // only the uppercase-named BTC.png is reachable by symbol lookup.
    let (status, headers, body) = send_request_raw(&app, "/icons/BTC").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "image/png");
    assert_eq!(body, b"btc-png");
}

#[tokio::test]
async fn test_unmatched_route_returns_uniform_404() {
    let (_dir, app) = test_app(&[]);

    let (status, response) = send_request(&app, Method::GET, "/nope/deep/path").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "Endpoint not found");
}

#[tokio::test]
async fn test_cors_allows_any_origin_for_get() {
    let (_dir, app) = test_app(&[("BTC.png", b"1")]);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/icons")
        .header("origin", "https://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
