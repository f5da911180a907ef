//! HTTP gateway for the CrowdWiz interview wizard.
//!
//! Serves the embedded front-end plus the stateless interview endpoints.
//! Built on Axum.

pub mod frontend;
pub mod wizard;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    http::HeaderValue,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crowdwiz_core::{ConversationStore, Provider};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub provider: Arc<dyn Provider>,
    pub store: Arc<dyn ConversationStore>,
    pub model: String,
    pub temperature: f32,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the full router: front-end, health and interview endpoints.
///
/// Layers applied:
/// - CORS (permissive unless origins are configured)
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/health", get(health_handler))
        .route("/generate", post(wizard::generate_handler))
        .route("/generate_narrative", post(wizard::narrative_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
pub async fn start(config: crowdwiz_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let router = crowdwiz_providers::router::build_from_config(&config);
    let provider = router.default()?;
    let store = crowdwiz_store::build_from_config(&config.store).await?;

    let state = Arc::new(GatewayState {
        provider,
        store,
        model: config.model_for(&config.default_provider),
        temperature: config.default_temperature,
        allowed_origins: config.gateway.allowed_origins.clone(),
    });

    info!(
        addr = %addr,
        provider = %config.default_provider,
        model = %state.model,
        store = state.store.name(),
        "Gateway starting"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
