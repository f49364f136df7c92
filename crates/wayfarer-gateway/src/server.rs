//! HTTP gateway server.

use crate::error::GatewayError;
use crate::handlers::{chat, health, page};
use crate::state::AppState;
use crate::Result;
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use wayfarer_core::ServerConfig;

/// Origins allowed by the CORS layer, matched by prefix so any port works.
const LOCAL_ORIGINS: &[&str] = &["http://localhost", "http://127.0.0.1"];

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind host.
    pub host: String,

    /// Port number.
    pub port: u16,

    /// HTML page served at `/`.
    pub index_html: PathBuf,

    /// Enable CORS for local origins.
    pub cors: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for GatewayConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            index_html: server.index_html.clone(),
            cors: true,
        }
    }
}

impl GatewayConfig {
    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The HTTP gateway.
pub struct Gateway {
    config: GatewayConfig,
    state: AppState,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(config: GatewayConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/", get(page::index))
            .route("/chat", post(chat::chat))
            .route("/health", get(health::health))
            .with_state(self.state.clone());

        if self.config.cors {
            router = router.layer(cors_layer());
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Serve until ctrl-c.
    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_address();
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(GatewayError::Io)?;
        info!("Wayfarer listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        info!("Gateway stopped");
        Ok(())
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _: &Parts| {
            let origin = origin.as_bytes();
            LOCAL_ORIGINS.iter().any(|o| origin.starts_with(o.as_bytes()))
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
