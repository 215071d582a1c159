// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lost & found item classification
//!
//! Maps detector labels into the item taxonomy, derives visual feature tags
//! from pixel statistics and fuses both into a best-guess result.

pub mod category;
pub mod classifier;
pub mod detection;
pub mod errors;
pub mod features;
pub mod fusion;
pub mod rules;

pub use category::{map_to_category, Category, UnknownCategory};
pub use classifier::{DetectResponse, ItemClassifier};
pub use detection::{
    normalize, BboxFormat, BoundingBox, Detection, DetectionSource, DetectionStatus,
    NormalizedDetections,
};
pub use errors::ClassifyError;
pub use features::{analyze_features, FeatureTag, FeatureTagSet};
pub use fusion::{fuse, HybridAnalysis, SecondaryTag};
