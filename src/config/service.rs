// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use super::classifier::ClassifierConfig;

/// Lost & Found AI service
#[derive(Parser, Debug, Clone)]
#[command(name = "lostfound-ai")]
#[command(about = "Object detection and feature tagging for lost & found items", long_about = None)]
pub struct ServiceArgs {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// HTTP port
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Path to the YOLOv8 ONNX model
    #[arg(long, env = "MODEL_PATH", default_value = "./models/yolov8m.onnx")]
    pub model_path: PathBuf,

    /// Optional TOML file with classifier thresholds
    #[arg(long, env = "CLASSIFIER_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ServiceArgs {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// Classifier config from the TOML file (if any), then env overrides
    pub fn classifier_config(&self) -> Result<ClassifierConfig> {
        let base = match &self.config {
            Some(path) => ClassifierConfig::from_file(path)?,
            None => ClassifierConfig::default(),
        };
        base.apply_env()
    }
}
