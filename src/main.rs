// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use lostfound_ai::{
    api::{start_server, AppState},
    config::ServiceArgs,
    version,
    vision::{DetectorState, YoloDetector},
    ItemClassifier,
};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting {}...", version::get_version_string());
    println!("📦 BUILD VERSION: {}", version::VERSION);

    let args = ServiceArgs::parse();
    let config = args.classifier_config()?;
    let addr = args.listen_addr()?;

    println!("🧠 Loading object detector from {}", args.model_path.display());
    let detector = DetectorState::from_init(YoloDetector::new(&args.model_path).map(|d| {
        d.with_min_score(config.detector_min_score)
            .with_nms_threshold(config.nms_threshold)
    }));

    if detector.is_loaded() {
        println!("✅ Detector ready");
    } else {
        println!("⚠️  Detector unavailable, serving fallback detections");
    }

    let state = AppState::new(ItemClassifier::new(detector, config));

    println!("🌐 Listening on http://{}", addr);
    start_server(addr, state).await
}
