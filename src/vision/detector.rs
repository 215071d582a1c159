// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detector collaborator and its startup state

use std::fmt;
use std::sync::Arc;

use image::RgbImage;

/// One candidate object as reported by a detector
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Class label (e.g. "backpack")
    pub label: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// `[x1, y1, x2, y2]` in original image pixels
    pub bbox: [f32; 4],
}

/// An object detector that can be shared across request handlers
pub trait ObjectDetector: Send + Sync {
    /// Run detection on a decoded RGB image
    fn detect(&self, image: &RgbImage) -> anyhow::Result<Vec<RawDetection>>;

    /// Model name for logs and health reporting
    fn model_name(&self) -> String;
}

/// Outcome of loading the detector at startup.
///
/// Built once and never re-attempted; an unavailable detector puts every
/// request on the fallback path.
#[derive(Clone)]
pub enum DetectorState {
    Ready(Arc<dyn ObjectDetector>),
    Unavailable { reason: String },
}

impl DetectorState {
    /// Consume a load result, logging the outcome
    pub fn from_init<D, E>(result: Result<D, E>) -> Self
    where
        D: ObjectDetector + 'static,
        E: fmt::Display,
    {
        match result {
            Ok(detector) => {
                tracing::info!("✅ Object detector loaded: {}", detector.model_name());
                DetectorState::Ready(Arc::new(detector))
            }
            Err(e) => {
                tracing::warn!("⚠️ Object detector not available: {}", e);
                tracing::warn!("⚠️ Running in fallback mode with synthetic detections");
                DetectorState::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn ready(detector: Arc<dyn ObjectDetector>) -> Self {
        DetectorState::Ready(detector)
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        DetectorState::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, DetectorState::Ready(_))
    }

    pub fn detector(&self) -> Option<&Arc<dyn ObjectDetector>> {
        match self {
            DetectorState::Ready(detector) => Some(detector),
            DetectorState::Unavailable { .. } => None,
        }
    }
}

impl fmt::Debug for DetectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorState::Ready(detector) => f
                .debug_tuple("Ready")
                .field(&detector.model_name())
                .finish(),
            DetectorState::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}
