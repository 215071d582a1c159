// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Colorimetric feature tags derived from pixel statistics
//!
//! All statistics use the 8-bit OpenCV conventions: hue in [0, 180),
//! saturation and value in [0, 255], and BT.601 grayscale weights.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::rules::{evaluate, Rule, RuleGroup};

/// A hue mask passes once its summed 0/255 pixel values exceed this
const HUE_MASK_MIN_SUM: u64 = 10_000;

/// Value assigned to a pixel inside a hue mask
const MASK_ON: u64 = 255;

/// Descriptor tag derived from image color statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureTag {
    Bright,
    Dark,
    Neutral,
    Vibrant,
    Red,
    Blue,
    Green,
    NeutralColor,
    LightColor,
    DarkColor,
}

impl FeatureTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureTag::Bright => "bright",
            FeatureTag::Dark => "dark",
            FeatureTag::Neutral => "neutral",
            FeatureTag::Vibrant => "vibrant",
            FeatureTag::Red => "red",
            FeatureTag::Blue => "blue",
            FeatureTag::Green => "green",
            FeatureTag::NeutralColor => "neutral_color",
            FeatureTag::LightColor => "light_color",
            FeatureTag::DarkColor => "dark_color",
        }
    }

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Feature tags in the order their checks ran
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureTagSet(Vec<FeatureTag>);

impl FeatureTagSet {
    pub fn contains(&self, tag: FeatureTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[FeatureTag] {
        &self.0
    }

    pub fn mask(&self) -> FeatureMask {
        FeatureMask(self.0.iter().fold(0, |bits, tag| bits | tag.bit()))
    }
}

/// Order-free membership view of a [`FeatureTagSet`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureMask(u16);

impl FeatureMask {
    pub fn contains(&self, tag: FeatureTag) -> bool {
        self.0 & tag.bit() != 0
    }
}

impl From<Vec<FeatureTag>> for FeatureTagSet {
    fn from(tags: Vec<FeatureTag>) -> Self {
        Self(tags)
    }
}

/// Inclusive HSV bounds, matching `cv2.inRange` semantics
#[derive(Debug, Clone, Copy)]
struct HsvRange {
    lower: [u8; 3],
    upper: [u8; 3],
}

impl HsvRange {
    fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }
}

// Red does not wrap past 170..180; only the low end of the hue circle counts.
const RED_RANGE: HsvRange = HsvRange { lower: [0, 100, 100], upper: [10, 255, 255] };
const BLUE_RANGE: HsvRange = HsvRange { lower: [100, 100, 100], upper: [130, 255, 255] };
const GREEN_RANGE: HsvRange = HsvRange { lower: [40, 100, 100], upper: [80, 255, 255] };

/// Aggregate color statistics of an image
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStats {
    /// Mean HSV value channel (0-255)
    pub mean_value: f64,
    /// Mean HSV saturation channel (0-255)
    pub mean_saturation: f64,
    /// Sum of the red hue mask (255 per matching pixel)
    pub red_mask_sum: u64,
    pub blue_mask_sum: u64,
    pub green_mask_sum: u64,
    /// Mean grayscale intensity (0-255)
    pub gray_mean: f64,
    /// Population standard deviation of grayscale intensity
    pub gray_std: f64,
}

impl ColorStats {
    /// Compute statistics over every pixel.
    ///
    /// Returns `None` for an image with no pixels.
    pub fn from_image(image: &RgbImage) -> Option<Self> {
        let pixel_count = u64::from(image.width()) * u64::from(image.height());
        if pixel_count == 0 {
            return None;
        }

        let mut value_sum = 0u64;
        let mut saturation_sum = 0u64;
        let mut red = 0u64;
        let mut blue = 0u64;
        let mut green = 0u64;
        let mut gray_sum = 0u64;
        let mut gray_sq_sum = 0u64;

        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            let hsv = rgb_to_hsv(r, g, b);
            saturation_sum += u64::from(hsv[1]);
            value_sum += u64::from(hsv[2]);

            if RED_RANGE.contains(hsv) {
                red += MASK_ON;
            }
            if BLUE_RANGE.contains(hsv) {
                blue += MASK_ON;
            }
            if GREEN_RANGE.contains(hsv) {
                green += MASK_ON;
            }

            let gray = u64::from(rgb_to_gray(r, g, b));
            gray_sum += gray;
            gray_sq_sum += gray * gray;
        }

        let n = pixel_count as f64;
        let gray_mean = gray_sum as f64 / n;
        let gray_var = (gray_sq_sum as f64 / n - gray_mean * gray_mean).max(0.0);

        Some(Self {
            mean_value: value_sum as f64 / n,
            mean_saturation: saturation_sum as f64 / n,
            red_mask_sum: red,
            blue_mask_sum: blue,
            green_mask_sum: green,
            gray_mean,
            gray_std: gray_var.sqrt(),
        })
    }
}

const BRIGHTNESS_RULES: &[Rule<ColorStats, FeatureTag>] = &[
    Rule { tag: FeatureTag::Bright, applies: |s| s.mean_value > 150.0 },
    Rule { tag: FeatureTag::Dark, applies: |s| s.mean_value < 100.0 },
];

const SATURATION_RULES: &[Rule<ColorStats, FeatureTag>] = &[
    Rule { tag: FeatureTag::Neutral, applies: |s| s.mean_saturation < 50.0 },
    Rule { tag: FeatureTag::Vibrant, applies: |s| s.mean_saturation > 150.0 },
];

const HUE_RULES: &[Rule<ColorStats, FeatureTag>] = &[
    Rule { tag: FeatureTag::Red, applies: |s| s.red_mask_sum > HUE_MASK_MIN_SUM },
    Rule { tag: FeatureTag::Blue, applies: |s| s.blue_mask_sum > HUE_MASK_MIN_SUM },
    Rule { tag: FeatureTag::Green, applies: |s| s.green_mask_sum > HUE_MASK_MIN_SUM },
];

// Flat images are neutral regardless of how light or dark they are.
const TONAL_RULES: &[Rule<ColorStats, FeatureTag>] = &[
    Rule { tag: FeatureTag::NeutralColor, applies: |s| s.gray_std < 30.0 },
    Rule { tag: FeatureTag::LightColor, applies: |s| s.gray_mean > 200.0 },
    Rule { tag: FeatureTag::DarkColor, applies: |s| s.gray_mean < 50.0 },
];

const FEATURE_AXES: &[RuleGroup<ColorStats, FeatureTag>] = &[
    RuleGroup::FirstMatch(BRIGHTNESS_RULES),
    RuleGroup::FirstMatch(SATURATION_RULES),
    RuleGroup::Every(HUE_RULES),
    RuleGroup::FirstMatch(TONAL_RULES),
];

/// Derive feature tags from precomputed statistics
pub fn tags_from_stats(stats: &ColorStats) -> FeatureTagSet {
    FeatureTagSet(evaluate(FEATURE_AXES, stats))
}

/// Analyze an image for brightness, saturation, hue and tonal tags.
///
/// An image without pixels yields an empty tag set; callers that need to
/// reject such input do so before calling.
pub fn analyze_features(image: &RgbImage) -> FeatureTagSet {
    ColorStats::from_image(image)
        .map(|stats| tags_from_stats(&stats))
        .unwrap_or_default()
}

/// Convert an 8-bit RGB pixel to 8-bit HSV (H in [0, 180))
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v == 0 { 0 } else { (255 * diff + v / 2) / v };

    let h = if diff == 0 {
        0
    } else {
        let raw = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let h = (raw as f32 * 30.0 / diff as f32 + 0.5).floor() as i32;
        if h < 0 {
            h + 180
        } else {
            h
        }
    };

    [h as u8, s as u8, v as u8]
}

/// BT.601 luma with the fixed-point rounding OpenCV uses
pub fn rgb_to_gray(r: u8, g: u8, b: u8) -> u8 {
    let luma = u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868;
    ((luma + (1 << 13)) >> 14) as u8
}
