//! Router and local audio-server fixtures

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tower::ServiceExt;
use vox_detect::services::{AcquirerConfig, AudioAcquirer, DetectionService};
use vox_detect::{build_router, AppState};

pub const TEST_API_KEY: &str = "test-secret-key";

/// Router whose scratch files land in `scratch_dir`
pub fn test_app(scratch_dir: &Path) -> Router {
    test_app_with_limit(scratch_dir, 25 * 1024 * 1024)
}

pub fn test_app_with_limit(scratch_dir: &Path, max_body_bytes: usize) -> Router {
    let acquirer = AudioAcquirer::new(AcquirerConfig {
        fetch_timeout: Duration::from_secs(2),
        scratch_dir: scratch_dir.to_path_buf(),
        ..Default::default()
    })
    .unwrap();

    build_router(AppState::new(
        DetectionService::new(acquirer),
        TEST_API_KEY,
        max_body_bytes,
    ))
}

/// POST /predict and return (status, JSON body)
pub async fn post_predict(app: Router, body: &Value, api_key: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }

    let response = app
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Serve `routes` on an ephemeral localhost port; returns the base URL
pub async fn spawn_audio_server(routes: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, routes).await.unwrap();
    });
    format!("http://{}", addr)
}
