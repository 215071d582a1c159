// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lost & found item categories and detector label mapping

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain bucket a lost item is filed under
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Electronics,
    Clothing,
    Accessories,
    Bags,
    Books,
    Keys,
    Jewelry,
    SportsEquipment,
    Documents,
    Toys,
    Tools,
    Furniture,
    #[default]
    Other,
}

impl Category {
    /// Every category, in taxonomy order
    pub const ALL: [Category; 13] = [
        Category::Electronics,
        Category::Clothing,
        Category::Accessories,
        Category::Bags,
        Category::Books,
        Category::Keys,
        Category::Jewelry,
        Category::SportsEquipment,
        Category::Documents,
        Category::Toys,
        Category::Tools,
        Category::Furniture,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Accessories => "accessories",
            Category::Bags => "bags",
            Category::Books => "books",
            Category::Keys => "keys",
            Category::Jewelry => "jewelry",
            Category::SportsEquipment => "sports_equipment",
            Category::Documents => "documents",
            Category::Toys => "toys",
            Category::Tools => "tools",
            Category::Furniture => "furniture",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Labels reported by the item detector
const CATEGORY_MAPPING: &[(&str, Category)] = &[
    ("person", Category::Other),
    ("backpack", Category::Bags),
    ("bag", Category::Bags),
    ("luggage", Category::Bags),
    ("purse", Category::Bags),
    ("wallet", Category::Accessories),
    ("phone", Category::Electronics),
    ("laptop", Category::Electronics),
    ("computer", Category::Electronics),
    ("tablet", Category::Electronics),
    ("headphones", Category::Electronics),
    ("camera", Category::Electronics),
    ("watch", Category::Jewelry),
    ("glasses", Category::Accessories),
    ("umbrella", Category::Accessories),
    ("book", Category::Books),
    ("bottle", Category::Other),
    ("cup", Category::Other),
    ("keys", Category::Keys),
    ("jacket", Category::Clothing),
    ("shirt", Category::Clothing),
    ("pants", Category::Clothing),
    ("dress", Category::Clothing),
    ("shoe", Category::Clothing),
    ("ball", Category::SportsEquipment),
    ("bat", Category::SportsEquipment),
    ("racket", Category::SportsEquipment),
    ("toy", Category::Toys),
    ("teddy bear", Category::Toys),
    ("document", Category::Documents),
    ("paper", Category::Documents),
    ("folder", Category::Documents),
];

/// COCO class names that the YOLO detector emits and the table above lacks.
/// Consulted only after `CATEGORY_MAPPING` misses.
const COCO_MAPPING: &[(&str, Category)] = &[
    ("cell phone", Category::Electronics),
    ("mouse", Category::Electronics),
    ("remote", Category::Electronics),
    ("keyboard", Category::Electronics),
    ("tv", Category::Electronics),
    ("hair drier", Category::Electronics),
    ("handbag", Category::Bags),
    ("suitcase", Category::Bags),
    ("tie", Category::Accessories),
    ("clock", Category::Accessories),
    ("toothbrush", Category::Accessories),
    ("scissors", Category::Tools),
    ("sports ball", Category::SportsEquipment),
    ("baseball bat", Category::SportsEquipment),
    ("baseball glove", Category::SportsEquipment),
    ("skateboard", Category::SportsEquipment),
    ("surfboard", Category::SportsEquipment),
    ("tennis racket", Category::SportsEquipment),
    ("chair", Category::Furniture),
    ("couch", Category::Furniture),
    ("bed", Category::Furniture),
    ("dining table", Category::Furniture),
    ("potted plant", Category::Furniture),
    ("vase", Category::Furniture),
];

fn lookup(table: &[(&str, Category)], label: &str) -> Option<Category> {
    table
        .iter()
        .find(|(key, _)| *key == label)
        .map(|(_, category)| *category)
}

/// Map a detector class label to a lost & found category.
///
/// Matching is case-insensitive. Labels missing from both tables map to
/// [`Category::Other`].
pub fn map_to_category(label: &str) -> Category {
    let label = label.to_lowercase();
    lookup(CATEGORY_MAPPING, &label)
        .or_else(|| lookup(COCO_MAPPING, &label))
        .unwrap_or_default()
}
