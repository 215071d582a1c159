// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 object detection (ONNX Runtime, CPU)

pub mod model;
pub mod postprocess;
pub mod preprocessing;

pub use model::{YoloDetector, DEFAULT_MIN_SCORE, DEFAULT_NMS_THRESHOLD};
pub use postprocess::{non_max_suppression, Candidate, COCO_CLASSES};
pub use preprocessing::{preprocess_for_yolo, YOLO_INPUT_SIZE};
