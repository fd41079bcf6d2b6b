//! LearnPulse Serving API
//!
//! REST surface answering learner risk and difficulty-recommendation queries,
//! backed by the model registry with a rule-based fallback.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod routes;

pub use config::ServerConfig;

use feature_resolver::FeatureResolver;
use model_registry::ModelRegistry;
use predictor::{PredictError, PredictionOrchestrator};
use storage::Database;

/// Model types reported by the health endpoint.
const MODEL_TYPES: [&str; 4] = ["dropout", "burnout", "difficulty", "sentiment"];

/// Application state shared across handlers, assembled once at startup.
pub struct AppState {
    pub orchestrator: PredictionOrchestrator,
    pub registry: Arc<ModelRegistry>,
    pub feature_version: String,
    pub reload_token: Option<String>,
    pub metrics: Option<PrometheusHandle>,
}

/// API error envelope; every variant maps to one status code.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Forbidden(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Forbidden(detail) => (StatusCode::FORBIDDEN, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::FeatureNotFound => ApiError::NotFound(err.to_string()),
            PredictError::Store(_) => ApiError::Internal(err.to_string()),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Load time per cached model type.
    pub cache: BTreeMap<String, DateTime<Utc>>,
    /// Cached version per known model type, `null` when not loaded.
    pub deployed_models: BTreeMap<String, Option<String>>,
    pub feature_version: String,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/predict/risk", post(routes::predict::predict_risk))
        .route("/predict/difficulty", post(routes::predict::predict_difficulty))
        .route("/admin/reload", post(routes::admin::reload_models))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.registry.snapshot().await;

    let cache = snapshot
        .iter()
        .map(|(model_type, entry)| (model_type.clone(), entry.loaded_at))
        .collect();
    let deployed_models = MODEL_TYPES
        .iter()
        .map(|model_type| {
            (
                model_type.to_string(),
                snapshot.get(*model_type).map(|entry| entry.version.clone()),
            )
        })
        .collect();

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        cache,
        deployed_models,
        feature_version: state.feature_version.clone(),
    })
}

/// Prometheus metrics render handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Wire up the stores, registry and orchestrator, then serve.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let database = Database::connect(&config.database_url).await?;
    database.migrate().await?;

    let registry = Arc::new(ModelRegistry::new(
        Arc::new(database.metadata_store()),
        &config.model_registry_dir,
    ));
    let resolver = FeatureResolver::new(
        Arc::new(database.feature_store()),
        config.feature_version.clone(),
    );
    let orchestrator = PredictionOrchestrator::new(resolver, registry.clone());
    let metrics = PrometheusBuilder::new().install_recorder().ok();

    let state = Arc::new(AppState {
        orchestrator,
        registry,
        feature_version: config.feature_version.clone(),
        reload_token: config.reload_token.clone(),
        metrics,
    });
    let app = create_router(state);

    info!("Starting serving API on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
