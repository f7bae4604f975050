use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use super::AppState;
use crate::icons::IconStore;
use crate::models::{HealthResponse, IconListResponse, SearchResponse};

type ApiError = (StatusCode, Json<Value>);

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

/// API documentation served at the root.
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    let base_url = &state.config.web.base_url;
    Json(json!({
        "name": "Crypto Icon API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "manifest": "/manifest.json",
            "icon": "/icons/:symbol",
            "list": "/icons",
            "search": "/search?q=btc",
            "health": "/health"
        },
        "usage": {
            "cdn": format!("{}/icons/BTC", base_url),
            "example": "/icons/BTC",
            "formats": IconStore::searched_formats()
        }
    }))
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

/// Serve the persisted manifest, rebuilding it first if absent.
pub async fn get_manifest(
    State(state): State<AppState>,
) -> Result<Json<crate::models::Manifest>, ApiError> {
    match state.manifest.read_or_rebuild().await {
        Ok(manifest) => Ok(Json(manifest)),
        Err(e) => {
            error!("Failed to read manifest: {}", e);
            Err(internal_error())
        }
    }
}

/// Live directory listing, one entry per file.
pub async fn list_icons(
    State(state): State<AppState>,
) -> Result<Json<IconListResponse>, ApiError> {
    match state.store.scan().await {
        Ok(icons) => Ok(Json(IconListResponse {
            total: icons.len(),
            icons,
        })),
        Err(e) if e.is_not_found() => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Icons directory not found" })),
        )),
        Err(e) => {
            error!("Failed to list icons: {}", e);
            Err(internal_error())
        }
    }
}

/// Serve a single icon, trying png, svg, jpg, jpeg in that order.
pub async fn get_icon(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let symbol = symbol.to_uppercase();
    match state.store.resolve(&symbol).await {
        Ok(Some((format, bytes))) => Response::builder()
            .header(header::CONTENT_TYPE, format.mime_type())
            .header(
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable",
            )
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .body(Body::from(bytes))
            .map_err(|e| {
                error!("Failed to build icon response for {}: {}", symbol, e);
                internal_error()
            }),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Icon not found",
                "symbol": symbol,
                "searched_formats": IconStore::searched_formats()
            })),
        )),
        Err(e) => {
            error!("Failed to serve icon {}: {}", symbol, e);
            Err(internal_error())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Case-insensitive substring search over symbols.
pub async fn search_icons(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.unwrap_or_default().to_lowercase();
    if query.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Query parameter \"q\" is required" })),
        ));
    }

    match state.store.scan().await {
        Ok(icons) => {
            let icons: Vec<_> = icons
                .into_iter()
                .filter(|icon| icon.symbol.to_lowercase().contains(&query))
                .collect();
            Ok(Json(SearchResponse {
                query,
                total: icons.len(),
                icons,
            }))
        }
        Err(e) if e.is_not_found() => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Icons directory not found" })),
        )),
        Err(e) => {
            error!("Failed to search icons: {}", e);
            Err(internal_error())
        }
    }
}

/// Uniform fallback for unmatched routes.
pub async fn endpoint_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}
