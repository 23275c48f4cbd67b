//! vox-detect library interface
//!
//! Classifies short voice recordings as AI generated or human from three
//! time-domain statistics. Exposes the router and pipeline for the binary and
//! for integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::error::{ApiError, ApiResult, DetectionError};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::DetectionService;

/// Application state shared across handlers
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Detection pipeline
    pub detector: Arc<DetectionService>,
    /// Key expected in the `x-api-key` header
    pub api_key: Arc<str>,
    /// Largest accepted request body, in bytes
    pub max_body_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(detector: DetectionService, api_key: impl Into<Arc<str>>, max_body_bytes: usize) -> Self {
        Self {
            detector: Arc::new(detector),
            api_key: api_key.into(),
            max_body_bytes,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// `/predict` requires the API key; `/` and `/health` are public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    // Protected routes (require authentication)
    let protected = api::predict_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        api::auth_middleware,
    ));

    // Public routes (no authentication)
    let public = api::health_routes();

    Router::new()
        .merge(protected)
        .merge(public)
        .fallback(api::not_found)
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
