// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 ONNX object detector
//!
//! Runs a COCO-trained YOLOv8 export on CPU through ONNX Runtime and
//! reports class labels the category mapper understands.

use anyhow::{Context, Result};
use image::RgbImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::postprocess::{decode_output, non_max_suppression, COCO_CLASSES};
use super::preprocessing::{preprocess_for_yolo, scale_factors, YOLO_INPUT_SIZE};
use crate::vision::detector::{ObjectDetector, RawDetection};

/// Candidates scoring below this never leave the detector
pub const DEFAULT_MIN_SCORE: f32 = 0.25;

/// IoU above which same-class boxes are merged
pub const DEFAULT_NMS_THRESHOLD: f32 = 0.45;

/// YOLOv8 object detector backed by ONNX Runtime
#[derive(Clone)]
pub struct YoloDetector {
    /// ONNX Runtime session (run needs exclusive access)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Model name derived from the file stem
    model_name: String,
    /// Minimum class score kept before NMS
    min_score: f32,
    /// NMS IoU threshold
    nms_threshold: f32,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("input_name", &self.input_name)
            .field("model_name", &self.model_name)
            .field("min_score", &self.min_score)
            .field("nms_threshold", &self.nms_threshold)
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Load a YOLOv8 ONNX export from disk
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("YOLO model not found: {}", model_path.display());
        }

        info!("Loading YOLO model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load YOLO model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        let model_name = model_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "yolov8".to_string());

        debug!("YOLO model loaded - input: {}", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            model_name,
            min_score: DEFAULT_MIN_SCORE,
            nms_threshold: DEFAULT_NMS_THRESHOLD,
        })
    }

    /// Set the pre-NMS score floor
    pub fn with_min_score(mut self, score: f32) -> Self {
        self.min_score = score.clamp(0.0, 1.0);
        self
    }

    /// Set the NMS IoU threshold
    pub fn with_nms_threshold(mut self, threshold: f32) -> Self {
        self.nms_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

impl ObjectDetector for YoloDetector {
    fn detect(&self, image: &RgbImage) -> Result<Vec<RawDetection>> {
        let input = preprocess_for_yolo(image, YOLO_INPUT_SIZE);
        let scale = scale_factors(image, YOLO_INPUT_SIZE);

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("YOLO session lock poisoned"))?;

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("YOLO inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let candidates = decode_output(
            output_tensor.view(),
            COCO_CLASSES.len(),
            self.min_score,
            scale,
            image.dimensions(),
        )?;
        let kept = non_max_suppression(candidates, self.nms_threshold);

        debug!("YOLO kept {} detections", kept.len());

        Ok(kept
            .into_iter()
            .map(|c| RawDetection {
                label: c.label().to_string(),
                confidence: c.score,
                bbox: c.bbox,
            })
            .collect())
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}
