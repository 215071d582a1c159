// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Item classifier: the detect and hybrid flows over a shared detector

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::detection::{
    detect_fallback, hybrid_fallback, normalize, Detection, DetectionSource, DetectionStatus,
    NormalizedDetections,
};
use super::errors::ClassifyError;
use super::features::analyze_features;
use super::fusion::HybridAnalysis;
use crate::config::{ClassifierConfig, FlowConfig};
use crate::vision::{decode_rgb, DetectorState};

/// Result of the detect-only flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectResponse {
    pub detections: Vec<Detection>,
    pub status: DetectionStatus,
    pub count: usize,
    pub source: DetectionSource,
}

impl DetectResponse {
    fn from_normalized(normalized: NormalizedDetections, source: DetectionSource) -> Self {
        let status = normalized.status();
        let count = normalized.detections.len();
        Self {
            detections: normalized.detections,
            status,
            count,
            source,
        }
    }
}

/// Classifies item photos using the startup detector state.
///
/// Holds no per-request state; a single instance is shared across handlers.
#[derive(Debug, Clone)]
pub struct ItemClassifier {
    detector: DetectorState,
    config: ClassifierConfig,
}

impl ItemClassifier {
    pub fn new(detector: DetectorState, config: ClassifierConfig) -> Self {
        Self { detector, config }
    }

    pub fn model_loaded(&self) -> bool {
        self.detector.is_loaded()
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn detector_state(&self) -> &DetectorState {
        &self.detector
    }

    /// Detect objects and map them into categories
    pub fn detect(&self, image: &RgbImage) -> Result<DetectResponse, ClassifyError> {
        ensure_pixels(image)?;
        let (normalized, source) = self.run_detector(image, &self.config.detect, detect_fallback);
        Ok(DetectResponse::from_normalized(normalized, source))
    }

    /// Detect objects, extract visual features and fuse both into one result
    pub fn analyze_hybrid(&self, image: &RgbImage) -> Result<HybridAnalysis, ClassifyError> {
        ensure_pixels(image)?;
        let (normalized, source) = self.run_detector(image, &self.config.hybrid, hybrid_fallback);
        let features = analyze_features(image);
        debug!("Feature tags: {:?}", features);
        Ok(HybridAnalysis::assemble(normalized, features, source))
    }

    /// Decode an upload and run the detect flow
    pub fn detect_bytes(&self, bytes: &[u8]) -> Result<DetectResponse, ClassifyError> {
        let (image, _) = decode_rgb(bytes, self.config.max_image_bytes)?;
        self.detect(&image)
    }

    /// Decode an upload and run the hybrid flow
    pub fn analyze_hybrid_bytes(&self, bytes: &[u8]) -> Result<HybridAnalysis, ClassifyError> {
        let (image, info) = decode_rgb(bytes, self.config.max_image_bytes)?;
        debug!(
            "Decoded image: {}x{}, {} bytes",
            info.width, info.height, info.size_bytes
        );
        self.analyze_hybrid(&image)
    }

    fn run_detector(
        &self,
        image: &RgbImage,
        flow: &FlowConfig,
        fallback: fn() -> NormalizedDetections,
    ) -> (NormalizedDetections, DetectionSource) {
        let Some(detector) = self.detector.detector() else {
            return (fallback(), DetectionSource::Fallback);
        };

        match detector.detect(image) {
            Ok(raw) => {
                debug!("Detector returned {} raw detections", raw.len());
                (
                    normalize(&raw, flow.threshold, flow.bbox_format),
                    DetectionSource::Detector,
                )
            }
            Err(e) => {
                warn!("Detection failed, using fallback: {}", e);
                (fallback(), DetectionSource::Fallback)
            }
        }
    }
}

fn ensure_pixels(image: &RgbImage) -> Result<(), ClassifyError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ClassifyError::EmptyImage);
    }
    Ok(())
}
