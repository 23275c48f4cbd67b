//! Authentication middleware for vox-detect
//!
//! Protected routes require the `x-api-key` header to match the key loaded at
//! startup. Comparison is delegated to [`vox_common::api::auth`].
//!
//! **Note:** Applied to protected routes only. `/` and `/health` do NOT use
//! this middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use vox_common::api::auth::validate_api_key;

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject the request with 403 unless it carries the configured API key
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(e) = validate_api_key(provided, &state.api_key) {
        warn!(path = %request.uri().path(), "Authentication failed: {}", e);
        return Err(ApiError::Forbidden("Not authenticated".to_string()));
    }

    Ok(next.run(request).await)
}
