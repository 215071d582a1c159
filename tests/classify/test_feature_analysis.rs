// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Feature analysis tests over synthetic images

use image::{Rgb, RgbImage};
use lostfound_ai::classify::{analyze_features, FeatureTag};

fn solid(r: u8, g: u8, b: u8) -> RgbImage {
    RgbImage::from_pixel(64, 64, Rgb([r, g, b]))
}

/// Left half black, right half white
fn split_black_white() -> RgbImage {
    RgbImage::from_fn(64, 64, |x, _| if x < 32 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) })
}

fn count_of(tags: &[FeatureTag], group: &[FeatureTag]) -> usize {
    tags.iter().filter(|t| group.contains(t)).count()
}

#[test]
fn test_analysis_is_deterministic() {
    let image = RgbImage::from_fn(48, 32, |x, y| Rgb([(x * 5) as u8, (y * 7) as u8, 90]));
    let first = analyze_features(&image);
    for _ in 0..5 {
        assert_eq!(analyze_features(&image), first);
    }
}

#[test]
fn test_uniform_red_image() {
    let tags = analyze_features(&solid(255, 0, 0));
    assert_eq!(
        tags.as_slice(),
        [
            FeatureTag::Bright,
            FeatureTag::Vibrant,
            FeatureTag::Red,
            FeatureTag::NeutralColor
        ]
    );
}

#[test]
fn test_black_image_is_neutral_not_dark_color() {
    let tags = analyze_features(&solid(0, 0, 0));
    assert!(tags.contains(FeatureTag::Dark));
    assert!(tags.contains(FeatureTag::NeutralColor));
    assert!(!tags.contains(FeatureTag::DarkColor));
    assert_eq!(
        tags.as_slice(),
        [FeatureTag::Dark, FeatureTag::Neutral, FeatureTag::NeutralColor]
    );
}

#[test]
fn test_blue_and_green_hues() {
    let blue = analyze_features(&solid(0, 0, 255));
    assert!(blue.contains(FeatureTag::Blue));
    assert!(!blue.contains(FeatureTag::Red));

    let green = analyze_features(&solid(0, 200, 0));
    assert!(green.contains(FeatureTag::Green));
    assert!(!green.contains(FeatureTag::Blue));
}

#[test]
fn test_mid_gray_has_no_brightness_tag() {
    // V = 128 sits between the dark and bright cut-offs
    let tags = analyze_features(&solid(128, 128, 128));
    assert!(!tags.contains(FeatureTag::Bright));
    assert!(!tags.contains(FeatureTag::Dark));
    assert!(tags.contains(FeatureTag::Neutral));
}

#[test]
fn test_high_contrast_skips_neutral_color() {
    let tags = analyze_features(&split_black_white());
    // Mean gray 127.5, std 127.5: no tonal tag applies
    assert!(!tags.contains(FeatureTag::NeutralColor));
    assert!(!tags.contains(FeatureTag::LightColor));
    assert!(!tags.contains(FeatureTag::DarkColor));
}

#[test]
fn test_exclusive_axes() {
    let images = [
        solid(0, 0, 0),
        solid(255, 255, 255),
        solid(255, 0, 0),
        solid(30, 60, 200),
        split_black_white(),
        RgbImage::from_fn(40, 40, |x, y| Rgb([(x * 6) as u8, (y * 6) as u8, ((x + y) * 3) as u8])),
    ];
    for image in &images {
        let tags = analyze_features(image);
        let tags = tags.as_slice();
        assert!(count_of(tags, &[FeatureTag::Bright, FeatureTag::Dark]) <= 1);
        assert!(count_of(tags, &[FeatureTag::Neutral, FeatureTag::Vibrant]) <= 1);
        assert!(
            count_of(
                tags,
                &[FeatureTag::NeutralColor, FeatureTag::LightColor, FeatureTag::DarkColor]
            ) <= 1
        );
    }
}

#[test]
fn test_small_red_patch_below_mask_threshold() {
    // 39 red pixels sum to 9945, one short of the 10000 cut-off
    let mut image = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
    for i in 0..39u32 {
        image.put_pixel(i % 20, i / 20, Rgb([255, 0, 0]));
    }
    assert!(!analyze_features(&image).contains(FeatureTag::Red));

    image.put_pixel(19, 1, Rgb([255, 0, 0]));
    assert!(analyze_features(&image).contains(FeatureTag::Red));
}

#[test]
fn test_red_hue_does_not_wrap() {
    // H = 176 on the 0-180 scale: red to the eye, outside the [0, 10] mask
    let tags = analyze_features(&solid(255, 0, 30));
    assert!(!tags.contains(FeatureTag::Red));
    assert!(tags.contains(FeatureTag::Vibrant));
}

#[test]
fn test_light_color_on_mostly_white_image() {
    // Gray mean 216.25, std ~67
    let image = RgbImage::from_fn(64, 64, |x, _| {
        if x < 48 {
            Rgb([255, 255, 255])
        } else {
            Rgb([100, 100, 100])
        }
    });
    let tags = analyze_features(&image);
    assert!(tags.contains(FeatureTag::LightColor));
    assert!(!tags.contains(FeatureTag::NeutralColor));
}

#[test]
fn test_dark_color_on_mostly_black_image() {
    // Gray mean 37.5, std ~65
    let image = RgbImage::from_fn(64, 64, |x, _| {
        if x < 48 {
            Rgb([0, 0, 0])
        } else {
            Rgb([150, 150, 150])
        }
    });
    let tags = analyze_features(&image);
    assert!(tags.contains(FeatureTag::DarkColor));
    assert!(tags.contains(FeatureTag::Dark));
    assert!(!tags.contains(FeatureTag::NeutralColor));
}
