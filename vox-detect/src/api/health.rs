//! Status and health endpoints (no authentication)

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name ("vox-detect")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
}

/// GET /
///
/// Minimal liveness probe.
pub async fn root_status() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "vox-detect".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
    })
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Build status and health routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_status))
        .route("/health", get(health_check))
}
