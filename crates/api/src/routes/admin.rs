//! Admin Routes

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::{ApiError, AppState};

const RELOAD_TOKEN_HEADER: &str = "x-reload-token";

/// Query parameters for the reload endpoint.
#[derive(Debug, Deserialize)]
pub struct ReloadQuery {
    /// Alternative to the `x-reload-token` header.
    pub token: Option<String>,
}

/// Reload response
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub message: String,
}

/// Clear the model cache so the next request reloads deployed artifacts.
///
/// When a reload token is configured, the caller must supply it via header
/// or query parameter; without a configured token the gate is a no-op.
pub async fn reload_models(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReloadQuery>,
    headers: HeaderMap,
) -> Result<Json<ReloadResponse>, ApiError> {
    if let Some(expected) = &state.reload_token {
        let provided = headers
            .get(RELOAD_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .or(query.token.as_deref());
        if provided != Some(expected.as_str()) {
            return Err(ApiError::Forbidden("Invalid reload token".to_string()));
        }
    }

    state.registry.invalidate(None).await;
    info!("model cache cleared via admin reload");

    Ok(Json(ReloadResponse {
        success: true,
        message: "Model cache cleared".to_string(),
    }))
}
