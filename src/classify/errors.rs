// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

use crate::vision::ImageError;

/// Errors surfaced by the classification flows
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("No image provided")]
    MissingImage,

    #[error("Invalid image: {0}")]
    InvalidImage(#[from] ImageError),

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Classification failed: {0}")]
    Unexpected(String),
}

impl ClassifyError {
    /// True when the caller sent something we cannot process
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ClassifyError::Unexpected(_))
    }
}
