// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Detection normalizer tests at the flow thresholds

use lostfound_ai::classify::{normalize, BboxFormat, BoundingBox, Category, DetectionStatus};
use lostfound_ai::config::ClassifierConfig;
use lostfound_ai::vision::RawDetection;

fn raw(label: &str, confidence: f32) -> RawDetection {
    RawDetection {
        label: label.to_string(),
        confidence,
        bbox: [12.6, 40.2, 300.9, 280.4],
    }
}

#[test]
fn test_detect_threshold_boundary() {
    let threshold = ClassifierConfig::default().detect.threshold;
    let at = normalize(&[raw("laptop", 0.30)], threshold, BboxFormat::Integer);
    assert!(at.detections.is_empty());
    assert_eq!(at.status(), DetectionStatus::LowConfidence);

    let above = normalize(&[raw("laptop", 0.31)], threshold, BboxFormat::Integer);
    assert_eq!(above.detections.len(), 1);
    assert_eq!(above.status(), DetectionStatus::Success);
}

#[test]
fn test_hybrid_threshold_boundary() {
    let threshold = ClassifierConfig::default().hybrid.threshold;
    assert!(normalize(&[raw("book", 0.25)], threshold, BboxFormat::Float)
        .detections
        .is_empty());
    assert_eq!(
        normalize(&[raw("book", 0.26)], threshold, BboxFormat::Float)
            .detections
            .len(),
        1
    );
}

#[test]
fn test_empty_input_defaults() {
    let result = normalize(&[], 0.3, BboxFormat::Integer);
    assert_eq!(result.best_category, Category::Other);
    assert_eq!(result.best_confidence, 0.0);
    assert_eq!(result.status(), DetectionStatus::LowConfidence);
}

#[test]
fn test_bbox_formats_per_flow() {
    let detect = normalize(&[raw("keys", 0.9)], 0.3, BboxFormat::Integer);
    assert_eq!(
        detect.detections[0].bbox,
        Some(BoundingBox::Pixels([12, 40, 300, 280]))
    );

    let hybrid = normalize(&[raw("keys", 0.9)], 0.25, BboxFormat::Float);
    assert_eq!(
        hybrid.detections[0].bbox,
        Some(BoundingBox::Exact([12.6, 40.2, 300.9, 280.4]))
    );
}

#[test]
fn test_confidence_rounded_but_best_is_not() {
    let result = normalize(&[raw("wallet", 0.876)], 0.3, BboxFormat::Integer);
    assert_eq!(result.detections[0].confidence, 0.88);
    assert!((result.best_confidence - 0.876).abs() < 1e-6);
    assert_eq!(result.best_category, Category::Accessories);
}

#[test]
fn test_tie_keeps_first_detection() {
    let result = normalize(
        &[raw("book", 0.8), raw("laptop", 0.8)],
        0.3,
        BboxFormat::Integer,
    );
    assert_eq!(result.best_category, Category::Books);
}

#[test]
fn test_detection_serializes_label_as_class() {
    let result = normalize(&[raw("backpack", 0.5)], 0.3, BboxFormat::Integer);
    let json = serde_json::to_value(&result.detections[0]).unwrap();
    assert_eq!(json["class"], "backpack");
    assert_eq!(json["category"], "bags");
    assert_eq!(json["bbox"], serde_json::json!([12, 40, 300, 280]));
}
