// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classify;
pub mod config;
pub mod version;
pub mod vision;

pub use classify::{
    analyze_features, map_to_category, Category, ClassifyError, DetectResponse, FeatureTag,
    FeatureTagSet, HybridAnalysis, ItemClassifier, SecondaryTag,
};
pub use config::{ClassifierConfig, ServiceArgs};
pub use vision::{DetectorState, ObjectDetector, RawDetection, YoloDetector};
