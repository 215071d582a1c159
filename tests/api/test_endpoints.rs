// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP endpoint tests for /detect, /analyze-hybrid, /health and /
//!
//! These tests verify that:
//! - Multipart uploads reach the classifier through the `image` field
//! - Input problems come back as 400 with an `error` body
//! - Health reports whether the detector loaded

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lostfound_ai::{
    api::{create_router, AppState},
    classify::ItemClassifier,
    config::ClassifierConfig,
    vision::{DetectorState, ObjectDetector, RawDetection},
};
use mockall::mock;
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

const BOUNDARY: &str = "lostfound-test-boundary";

mock! {
    pub Detector {}

    impl ObjectDetector for Detector {
        fn detect(&self, image: &RgbImage) -> anyhow::Result<Vec<RawDetection>>;
        fn model_name(&self) -> String;
    }
}

/// Helper: Router backed by a detector that always sees a backpack and a laptop
fn app_with_detector() -> Router {
    let mut detector = MockDetector::new();
    detector.expect_detect().returning(|_| {
        Ok(vec![
            RawDetection {
                label: "backpack".to_string(),
                confidence: 0.75,
                bbox: [10.4, 12.8, 50.2, 60.9],
            },
            RawDetection {
                label: "laptop".to_string(),
                confidence: 0.60,
                bbox: [5.0, 5.0, 30.0, 20.0],
            },
        ])
    });
    detector
        .expect_model_name()
        .returning(|| "mock-yolo".to_string());

    let classifier = ItemClassifier::new(
        DetectorState::ready(Arc::new(detector)),
        ClassifierConfig::default(),
    );
    create_router(AppState::new(classifier))
}

/// Helper: Router running without a detector
fn app_without_detector(config: ClassifierConfig) -> Router {
    let classifier = ItemClassifier::new(DetectorState::unavailable("no model"), config);
    create_router(AppState::new(classifier))
}

fn png_bytes(image: RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn bmp_bytes(image: RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Bmp)
        .unwrap();
    bytes
}

fn multipart_body(field: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"item.png\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn gray_png() -> Vec<u8> {
    png_bytes(RgbImage::from_pixel(32, 32, Rgb([128, 128, 128])))
}

/// Test 1: /detect maps detector output
#[tokio::test]
async fn test_detect_endpoint() {
    let (status, json) = send(
        app_with_detector(),
        upload("/detect", multipart_body("image", &gray_png())),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["status"], "SUCCESS");
    assert_eq!(json["source"], "detector");
    assert_eq!(json["detections"][0]["class"], "backpack");
    assert_eq!(json["detections"][0]["category"], "bags");
    assert_eq!(json["detections"][0]["bbox"], serde_json::json!([10, 12, 50, 60]));
}

/// Test 2: /analyze-hybrid fuses detections and features
#[tokio::test]
async fn test_analyze_hybrid_endpoint() {
    let (status, json) = send(
        app_with_detector(),
        upload("/analyze-hybrid", multipart_body("image", &gray_png())),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["category"], "bags");
    assert_eq!(json["status"], "SUCCESS");
    assert_eq!(json["detections"].as_array().unwrap().len(), 2);
    assert_eq!(
        json["features"],
        serde_json::json!(["neutral", "neutral_color"])
    );
    assert_eq!(json["secondary_tags"], serde_json::json!([]));
}

/// Test 3: Degraded mode serves the fallback set
#[tokio::test]
async fn test_detect_fallback_without_model() {
    let (status, json) = send(
        app_without_detector(ClassifierConfig::default()),
        upload("/detect", multipart_body("image", &gray_png())),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["count"], 2);
    assert_eq!(json["detections"][1]["class"], "electronics");
    assert_eq!(json["detections"][1]["bbox"], serde_json::json!([100, 100, 180, 180]));
}

/// Test 4: Missing `image` field is a client error
#[tokio::test]
async fn test_missing_image_field() {
    let (status, json) = send(
        app_with_detector(),
        upload("/detect", multipart_body("photo", &gray_png())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No image provided");
    assert!(json["request_id"].is_string());
}

/// Test 5: Undecodable bytes are a client error
#[tokio::test]
async fn test_invalid_image_bytes() {
    let (status, json) = send(
        app_with_detector(),
        upload("/analyze-hybrid", multipart_body("image", b"definitely not an image")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid image"));
}

/// Test 6: Uploads over the configured size are rejected
#[tokio::test]
async fn test_oversized_image() {
    let config = ClassifierConfig {
        max_image_bytes: 1024,
        ..ClassifierConfig::default()
    };
    // 32x32 BMP is stored uncompressed, well over 1 KiB
    let bytes = bmp_bytes(RgbImage::from_pixel(32, 32, Rgb([10, 10, 10])));
    assert!(bytes.len() > 1024);

    let (status, json) = send(
        app_without_detector(config),
        upload("/detect", multipart_body("image", &bytes)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("too large"));
}

/// Test 7: Health reports detector state
#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app_without_detector(ClassifierConfig::default()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({
            "status": "healthy",
            "model_loaded": false,
            "service": "lost-found-ai"
        })
    );

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (_, json) = send(app_with_detector(), request).await;
    assert_eq!(json["model_loaded"], true);
}

/// Test 8: Root lists the endpoints
#[tokio::test]
async fn test_root_endpoint() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, json) = send(app_with_detector(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], "1.0.0");
    let endpoints: Vec<&str> = json["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e.as_str())
        .collect();
    assert_eq!(endpoints, ["/detect", "/analyze-hybrid", "/health"]);
}

/// Test 9: Detect route does not accept GET
#[tokio::test]
async fn test_detect_rejects_get() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/detect")
        .body(Body::empty())
        .unwrap();
    let response = app_with_detector().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
