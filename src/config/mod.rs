// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service and classifier configuration

pub mod classifier;
pub mod service;

pub use classifier::{ClassifierConfig, FlowConfig};
pub use service::ServiceArgs;
