// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for YOLOv8

use image::{imageops::FilterType, RgbImage};
use ndarray::Array4;

/// Square input size of the YOLOv8 export
pub const YOLO_INPUT_SIZE: u32 = 640;

/// Preprocess an image for YOLOv8 inference
///
/// Steps:
/// 1. Stretch to `size` x `size` (aspect ratio is not preserved)
/// 2. Scale pixels to [0, 1]
/// 3. Convert to NCHW tensor format [1, 3, H, W]
pub fn preprocess_for_yolo(image: &RgbImage, size: u32) -> Array4<f32> {
    let resized = image::imageops::resize(image, size, size, FilterType::Triangle);

    let side = size as usize;
    let mut tensor = Array4::zeros((1, 3, side, side));

    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    tensor
}

/// Factors mapping model-space coordinates back to the original image
pub fn scale_factors(image: &RgbImage, size: u32) -> (f32, f32) {
    (
        image.width() as f32 / size as f32,
        image.height() as f32 / size as f32,
    )
}
