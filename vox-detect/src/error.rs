//! Error types for vox-detect
//!
//! [`DetectionError`] is raised by the pipeline (acquire, decode, classify);
//! [`ApiError`] is the HTTP surface. Every surfaced error is rendered as
//! `{"error": <message>, "status_code": <code>}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Pipeline error taxonomy
#[derive(Debug, Error)]
pub enum DetectionError {
    /// Neither `audio_url` nor `audioBase64` supplied
    #[error("audio_url or audioBase64 required")]
    MissingInput,

    /// Malformed URL / scheme, or unusable format hint
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote fetch failed, returned a non-success status, or timed out
    #[error("Acquisition failed: {0}")]
    AcquisitionFailed(String),

    /// Payload is not valid base64, or the bytes are not decodable audio
    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    /// Scratch file I/O
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Missing or wrong API key (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Well-formed request that cannot be processed (422)
    #[error("Unprocessable request: {0}")]
    Unprocessable(String),

    /// Request body rejected by the JSON extractor (status decided by axum)
    #[error("Rejected request: {1}")]
    Rejected(StatusCode, String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Rejected(status, msg) => (status, msg),
            ApiError::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = Json(json!({
            "error": message,
            "status_code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<DetectionError> for ApiError {
    fn from(err: DetectionError) -> Self {
        match err {
            DetectionError::MissingInput => ApiError::Unprocessable(err.to_string()),
            DetectionError::InvalidInput(msg) => {
                tracing::debug!("Rejecting invalid input: {}", msg);
                ApiError::BadRequest("Invalid audio URL".to_string())
            }
            DetectionError::AcquisitionFailed(msg) => {
                tracing::debug!("Rejecting failed acquisition: {}", msg);
                ApiError::BadRequest("Failed to download audio".to_string())
            }
            DetectionError::DecodeFailed(msg) => {
                tracing::debug!("Rejecting undecodable audio: {}", msg);
                ApiError::Unprocessable("Unable to decode audio".to_string())
            }
            DetectionError::Io(e) => ApiError::Io(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
