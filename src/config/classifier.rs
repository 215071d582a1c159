// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classifier thresholds and limits

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::classify::detection::BboxFormat;
use crate::vision::yolo::{DEFAULT_MIN_SCORE, DEFAULT_NMS_THRESHOLD};
use crate::vision::MAX_IMAGE_SIZE;

/// Per-flow detection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Detections at or below this confidence are discarded
    pub threshold: f32,
    /// Bounding box representation in responses
    pub bbox_format: BboxFormat,
}

impl FlowConfig {
    /// `/detect` defaults: 0.30, whole-pixel boxes
    pub fn detect() -> Self {
        Self {
            threshold: 0.30,
            bbox_format: BboxFormat::Integer,
        }
    }

    /// `/analyze-hybrid` defaults: 0.25, sub-pixel boxes
    pub fn hybrid() -> Self {
        Self {
            threshold: 0.25,
            bbox_format: BboxFormat::Float,
        }
    }
}

/// Classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ClassifierConfigFile")]
pub struct ClassifierConfig {
    /// `/detect` flow
    pub detect: FlowConfig,
    /// `/analyze-hybrid` flow
    pub hybrid: FlowConfig,
    /// Score floor applied inside the detector before NMS
    pub detector_min_score: f32,
    /// NMS IoU threshold
    pub nms_threshold: f32,
    /// Maximum accepted upload size in bytes
    pub max_image_bytes: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            detect: FlowConfig::detect(),
            hybrid: FlowConfig::hybrid(),
            detector_min_score: DEFAULT_MIN_SCORE,
            nms_threshold: DEFAULT_NMS_THRESHOLD,
            max_image_bytes: MAX_IMAGE_SIZE,
        }
    }
}

/// Per-flow table as written in TOML; absent keys keep the flow's defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FlowOverrides {
    threshold: Option<f32>,
    bbox_format: Option<BboxFormat>,
}

impl FlowOverrides {
    fn over(self, base: FlowConfig) -> FlowConfig {
        FlowConfig {
            threshold: self.threshold.unwrap_or(base.threshold),
            bbox_format: self.bbox_format.unwrap_or(base.bbox_format),
        }
    }
}

/// On-disk shape of [`ClassifierConfig`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClassifierConfigFile {
    detect: FlowOverrides,
    hybrid: FlowOverrides,
    detector_min_score: Option<f32>,
    nms_threshold: Option<f32>,
    max_image_bytes: Option<usize>,
}

impl From<ClassifierConfigFile> for ClassifierConfig {
    fn from(file: ClassifierConfigFile) -> Self {
        let defaults = ClassifierConfig::default();
        Self {
            detect: file.detect.over(defaults.detect),
            hybrid: file.hybrid.over(defaults.hybrid),
            detector_min_score: file
                .detector_min_score
                .unwrap_or(defaults.detector_min_score),
            nms_threshold: file.nms_threshold.unwrap_or(defaults.nms_threshold),
            max_image_bytes: file.max_image_bytes.unwrap_or(defaults.max_image_bytes),
        }
    }
}

impl ClassifierConfig {
    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Override thresholds from environment variables
    pub fn apply_env(mut self) -> Result<Self> {
        if let Some(v) = env_f32("DETECT_THRESHOLD")? {
            self.detect.threshold = v;
        }
        if let Some(v) = env_f32("HYBRID_THRESHOLD")? {
            self.hybrid.threshold = v;
        }
        if let Some(v) = env_f32("NMS_THRESHOLD")? {
            self.nms_threshold = v;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("detect.threshold", self.detect.threshold),
            ("hybrid.threshold", self.hybrid.threshold),
            ("detector_min_score", self.detector_min_score),
            ("nms_threshold", self.nms_threshold),
        ];
        for (name, value) in checks {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{} must be within [0, 1], got {}", name, value);
            }
        }
        if self.max_image_bytes == 0 {
            anyhow::bail!("max_image_bytes must be positive");
        }
        Ok(())
    }
}

fn env_f32(key: &str) -> Result<Option<f32>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f32>()
            .map(Some)
            .with_context(|| format!("{} is not a number: {}", key, raw)),
        Err(_) => Ok(None),
    }
}
