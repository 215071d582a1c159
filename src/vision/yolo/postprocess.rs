// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 output decoding and non-maximum suppression

use anyhow::Result;
use ndarray::{ArrayViewD, Ix3};

/// COCO class names, indexed by YOLO class id
pub const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich",
    "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote",
    "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator", "book",
    "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

/// Box coordinates plus class scores per candidate row
const BOX_FIELDS: usize = 4;

/// A scored box before suppression
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub class_id: usize,
    pub score: f32,
    /// `[x1, y1, x2, y2]` in original image pixels
    pub bbox: [f32; 4],
}

impl Candidate {
    pub fn label(&self) -> &'static str {
        COCO_CLASSES.get(self.class_id).copied().unwrap_or("unknown")
    }
}

/// Decode a YOLOv8 output tensor.
///
/// Accepts `[1, 4 + C, N]` (the default export) or the transposed
/// `[1, N, 4 + C]`. Rows are `cx, cy, w, h` followed by one score per class;
/// YOLOv8 has no separate objectness score.
pub fn decode_output(
    output: ArrayViewD<f32>,
    num_classes: usize,
    min_score: f32,
    scale: (f32, f32),
    image_size: (u32, u32),
) -> Result<Vec<Candidate>> {
    let output = output
        .into_dimensionality::<Ix3>()
        .map_err(|_| anyhow::anyhow!("Unexpected YOLO output rank, expected 3"))?;

    let fields = BOX_FIELDS + num_classes;
    let shape = output.shape().to_vec();
    let rows = if shape[1] == fields {
        output.index_axis_move(ndarray::Axis(0), 0).reversed_axes()
    } else if shape[2] == fields {
        output.index_axis_move(ndarray::Axis(0), 0)
    } else {
        anyhow::bail!("Unexpected YOLO output shape: {:?}", shape);
    };

    let (scale_x, scale_y) = scale;
    let max_x = image_size.0 as f32;
    let max_y = image_size.1 as f32;
    let mut candidates = Vec::new();

    for row in rows.outer_iter() {
        let (class_id, score) = row
            .iter()
            .skip(BOX_FIELDS)
            .copied()
            .enumerate()
            .fold((0usize, f32::MIN), |best, (id, s)| if s > best.1 { (id, s) } else { best });

        if score < min_score {
            continue;
        }

        let (cx, cy, w, h) = (row[0], row[1], row[2], row[3]);
        let x1 = ((cx - w / 2.0) * scale_x).clamp(0.0, max_x);
        let y1 = ((cy - h / 2.0) * scale_y).clamp(0.0, max_y);
        let x2 = ((cx + w / 2.0) * scale_x).clamp(0.0, max_x);
        let y2 = ((cy + h / 2.0) * scale_y).clamp(0.0, max_y);

        candidates.push(Candidate {
            class_id,
            score,
            bbox: [x1, y1, x2, y2],
        });
    }

    Ok(candidates)
}

/// Class-wise non-maximum suppression, highest score first
pub fn non_max_suppression(mut candidates: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id && iou(&k.bbox, &candidate.bbox) >= iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}

/// Intersection over union of two `[x1, y1, x2, y2]` boxes
pub fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    let union = area_a + area_b - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}
