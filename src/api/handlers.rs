// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Endpoint handlers for the detect and hybrid flows

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::errors::{ApiError, ApiErrorResponse};
use super::http_server::AppState;
use crate::classify::{ClassifyError, DetectResponse, HybridAnalysis};
use crate::version;

/// Multipart field carrying the uploaded photo
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// POST /detect - Detect objects and map them to item categories
///
/// # Request
/// Multipart form with the photo in the `image` field.
///
/// # Response
/// - `detections`: `[{class, category, confidence, bbox}]`, bbox in whole pixels
/// - `status`: `SUCCESS` or `LOW_CONFIDENCE`
/// - `count`: Number of detections
/// - `source`: `detector`, or `fallback` when the model is not usable
///
/// # Errors
/// - 400 Bad Request: Missing, empty, oversized or undecodable image
/// - 500 Internal Server Error: Classification task failed
pub async fn detect_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DetectResponse>, ApiErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    debug!(request_id = %request_id, "Detect request received");

    let bytes = read_image_field(multipart)
        .await
        .map_err(|e| e.with_request_id(&request_id))?;

    let classifier = state.classifier.clone();
    let result = run_blocking(move || classifier.detect_bytes(&bytes))
        .await
        .map_err(|e| {
            warn!(request_id = %request_id, "Detect failed: {}", e);
            ApiError::from(e).with_request_id(&request_id)
        })?;

    info!(
        request_id = %request_id,
        "Detect complete: {} detections, status {:?}, source {:?}",
        result.count, result.status, result.source
    );
    Ok(Json(result))
}

/// POST /analyze-hybrid - Detection plus visual feature tags
///
/// # Request
/// Multipart form with the photo in the `image` field.
///
/// # Response
/// - `detections`: `[{class, category, confidence, bbox}]`
/// - `category`: Best-guess category
/// - `features`: Visual descriptor tags (`bright`, `red`, ...)
/// - `secondary_tags`: Fused tags (`valuable`, `colorful`, ...)
/// - `status`, `confidence`, `source`
///
/// # Errors
/// - 400 Bad Request: Missing, empty, oversized or undecodable image
/// - 500 Internal Server Error: Classification task failed
pub async fn analyze_hybrid_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<HybridAnalysis>, ApiErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    debug!(request_id = %request_id, "Hybrid analysis request received");

    let bytes = read_image_field(multipart)
        .await
        .map_err(|e| e.with_request_id(&request_id))?;

    let classifier = state.classifier.clone();
    let result = run_blocking(move || classifier.analyze_hybrid_bytes(&bytes))
        .await
        .map_err(|e| {
            warn!(request_id = %request_id, "Hybrid analysis failed: {}", e);
            ApiError::from(e).with_request_id(&request_id)
        })?;

    info!(
        request_id = %request_id,
        "Hybrid analysis complete: {} ({:.2}), {} detections, {} features, source {:?}",
        result.category,
        result.confidence,
        result.detections.len(),
        result.features.len(),
        result.source
    );
    Ok(Json(result))
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.classifier.model_loaded(),
        service: "lost-found-ai".to_string(),
    })
}

/// GET /
pub async fn root_handler() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: version::SERVICE_NAME.to_string(),
        version: version::VERSION_NUMBER.to_string(),
        endpoints: ["/detect", "/analyze-hybrid", "/health"]
            .iter()
            .map(|e| e.to_string())
            .collect(),
    })
}

/// Pull the `image` field out of a multipart upload, skipping other fields
async fn read_image_field(mut multipart: Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read image: {}", e)))?;
        debug!("Received image field: {} bytes", bytes.len());
        return Ok(bytes);
    }
    Err(ClassifyError::MissingImage.into())
}

/// Run CPU-bound classification off the async runtime
async fn run_blocking<T, F>(task: F) -> Result<T, ClassifyError>
where
    F: FnOnce() -> Result<T, ClassifyError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ClassifyError::Unexpected(format!("classification task failed: {}", e)))?
}
