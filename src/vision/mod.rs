// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision collaborators for item classification
//!
//! This module provides:
//! - Image decoding for uploaded photos
//! - The object detector interface and its startup state
//! - A YOLOv8 ONNX detector running on CPU

pub mod detector;
pub mod image_utils;
pub mod yolo;

pub use detector::{DetectorState, ObjectDetector, RawDetection};
pub use image_utils::{decode_image_bytes, decode_rgb, detect_format, ImageError, ImageInfo, MAX_IMAGE_SIZE};
pub use yolo::YoloDetector;
