// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fuses the best detected category with feature tags into secondary tags

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::detection::{Detection, DetectionSource, DetectionStatus, NormalizedDetections};
use super::features::{FeatureMask, FeatureTag, FeatureTagSet};
use super::rules::{evaluate, Rule, RuleGroup};

/// Derived label combining color features and category semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryTag {
    Red,
    Blue,
    Dark,
    Colorful,
    Valuable,
    Important,
}

impl SecondaryTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecondaryTag::Red => "red",
            SecondaryTag::Blue => "blue",
            SecondaryTag::Dark => "dark",
            SecondaryTag::Colorful => "colorful",
            SecondaryTag::Valuable => "valuable",
            SecondaryTag::Important => "important",
        }
    }
}

struct FusionInput {
    category: Category,
    features: FeatureMask,
}

impl FusionInput {
    fn has(&self, tag: FeatureTag) -> bool {
        self.features.contains(tag)
    }
}

const COLOR_RULES: &[Rule<FusionInput, SecondaryTag>] = &[
    Rule { tag: SecondaryTag::Red, applies: |i| i.has(FeatureTag::Red) },
    Rule { tag: SecondaryTag::Blue, applies: |i| i.has(FeatureTag::Blue) },
    Rule { tag: SecondaryTag::Dark, applies: |i| i.has(FeatureTag::DarkColor) },
    Rule { tag: SecondaryTag::Colorful, applies: |i| i.has(FeatureTag::Vibrant) },
];

const IMPORTANCE_RULES: &[Rule<FusionInput, SecondaryTag>] = &[
    Rule {
        tag: SecondaryTag::Valuable,
        applies: |i| {
            matches!(
                i.category,
                Category::Electronics | Category::Jewelry | Category::Keys
            )
        },
    },
    Rule {
        tag: SecondaryTag::Important,
        applies: |i| matches!(i.category, Category::Documents | Category::Books),
    },
];

const FUSION_RULES: &[RuleGroup<FusionInput, SecondaryTag>] = &[
    RuleGroup::Every(COLOR_RULES),
    RuleGroup::FirstMatch(IMPORTANCE_RULES),
];

/// Compute secondary tags for the best category and the image features
pub fn fuse(best_category: Category, features: &FeatureTagSet) -> Vec<SecondaryTag> {
    let input = FusionInput {
        category: best_category,
        features: features.mask(),
    };
    evaluate(FUSION_RULES, &input)
}

/// Result of the hybrid detection + feature analysis flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridAnalysis {
    pub detections: Vec<Detection>,
    /// Best-guess category
    pub category: Category,
    pub features: FeatureTagSet,
    pub secondary_tags: Vec<SecondaryTag>,
    pub status: DetectionStatus,
    /// Confidence of the best detection
    pub confidence: f32,
    pub source: DetectionSource,
}

impl HybridAnalysis {
    /// Assemble the final payload from normalized detections and features
    pub fn assemble(
        normalized: NormalizedDetections,
        features: FeatureTagSet,
        source: DetectionSource,
    ) -> Self {
        let secondary_tags = fuse(normalized.best_category, &features);
        let status = normalized.status();
        Self {
            detections: normalized.detections,
            category: normalized.best_category,
            features,
            secondary_tags,
            status,
            confidence: normalized.best_confidence,
            source,
        }
    }
}
