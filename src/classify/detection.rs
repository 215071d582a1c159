// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection filtering, category mapping and best-guess tracking

use serde::{Deserialize, Serialize};

use super::category::{map_to_category, Category};
use crate::vision::RawDetection;

/// Bounding box as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundingBox {
    /// Whole-pixel `[x1, y1, x2, y2]`, truncated toward zero
    Pixels([i32; 4]),
    /// Sub-pixel `[x1, y1, x2, y2]` as produced by the detector
    Exact([f32; 4]),
}

/// Which representation a flow reports bounding boxes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BboxFormat {
    Integer,
    Float,
}

impl BboxFormat {
    pub fn apply(&self, bbox: [f32; 4]) -> BoundingBox {
        match self {
            BboxFormat::Integer => BoundingBox::Pixels(bbox.map(|v| v as i32)),
            BboxFormat::Float => BoundingBox::Exact(bbox),
        }
    }
}

/// A detected object mapped into the lost & found taxonomy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label as reported by the detector
    #[serde(rename = "class")]
    pub label: String,
    pub category: Category,
    /// Confidence rounded to two decimals
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

/// Whether a flow produced usable detections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionStatus {
    Success,
    LowConfidence,
}

impl DetectionStatus {
    pub fn from_detections(detections: &[Detection]) -> Self {
        if detections.is_empty() {
            DetectionStatus::LowConfidence
        } else {
            DetectionStatus::Success
        }
    }
}

/// Where a result's detections came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    /// The loaded object detector
    Detector,
    /// The fixed synthetic set used while the detector is unavailable
    Fallback,
}

/// Filtered detections plus the highest-confidence category
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDetections {
    pub detections: Vec<Detection>,
    pub best_category: Category,
    /// Unrounded confidence of the best detection, 0.0 when none survive
    pub best_confidence: f32,
}

impl Default for NormalizedDetections {
    fn default() -> Self {
        Self {
            detections: Vec::new(),
            best_category: Category::Other,
            best_confidence: 0.0,
        }
    }
}

impl NormalizedDetections {
    pub fn status(&self) -> DetectionStatus {
        DetectionStatus::from_detections(&self.detections)
    }

    fn track(&mut self, detection: Detection, confidence: f32) {
        if confidence > self.best_confidence {
            self.best_confidence = confidence;
            self.best_category = detection.category;
        }
        self.detections.push(detection);
    }
}

/// Round to two decimal places for reporting
pub fn round_confidence(confidence: f32) -> f32 {
    (confidence * 100.0).round() / 100.0
}

/// Keep detections strictly above `threshold`, map their labels and track
/// the best one. Detector order is preserved.
pub fn normalize(raw: &[RawDetection], threshold: f32, format: BboxFormat) -> NormalizedDetections {
    let mut normalized = NormalizedDetections::default();
    for det in raw.iter().filter(|det| det.confidence > threshold) {
        let detection = Detection {
            label: det.label.clone(),
            category: map_to_category(&det.label),
            confidence: round_confidence(det.confidence),
            bbox: Some(format.apply(det.bbox)),
        };
        normalized.track(detection, det.confidence);
    }
    normalized
}

/// Synthetic result for the detect flow when no detector is available
pub fn detect_fallback() -> NormalizedDetections {
    let mut normalized = NormalizedDetections::default();
    normalized.track(
        Detection {
            label: "bag".to_string(),
            category: Category::Bags,
            confidence: 0.75,
            bbox: Some(BoundingBox::Pixels([50, 50, 200, 200])),
        },
        0.75,
    );
    normalized.track(
        Detection {
            label: "electronics".to_string(),
            category: Category::Electronics,
            confidence: 0.60,
            bbox: Some(BoundingBox::Pixels([100, 100, 180, 180])),
        },
        0.60,
    );
    normalized
}

/// Synthetic result for the hybrid flow when no detector is available.
///
/// The category is set but the best confidence stays at 0.0: the listed
/// detection is a placeholder, not a measurement.
pub fn hybrid_fallback() -> NormalizedDetections {
    NormalizedDetections {
        detections: vec![Detection {
            label: "bag".to_string(),
            category: Category::Bags,
            confidence: 0.70,
            bbox: None,
        }],
        best_category: Category::Bags,
        best_confidence: 0.0,
    }
}
