//! Web layer module
//!
//! HTTP interface for the crypto icon API. Handlers are thin: they delegate
//! to [`IconStore`] and [`ManifestService`] and map errors onto status codes
//! at the boundary.

use anyhow::Result;
use axum::http::{header, Method};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{config::Config, icons::IconStore, manifest::ManifestService};

pub mod api;

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config, store: IconStore, manifest: ManifestService) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;

        let app = Self::create_router(AppState {
            config,
            store,
            manifest,
            started_at: Instant::now(),
        });

        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        // All origins, GET only, Content-Type allowed on requests.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .route("/", get(api::index))
            .route("/health", get(api::health_check))
            .route("/manifest.json", get(api::get_manifest))
            .route("/icons", get(api::list_icons))
            .route("/icons/:symbol", get(api::get_icon))
            .route("/search", get(api::search_icons))
            .fallback(api::endpoint_not_found)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: IconStore,
    pub manifest: ManifestService,
    pub started_at: Instant,
}
