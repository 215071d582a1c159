// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{analyze_hybrid_handler, detect_handler, health_handler, root_handler};
use crate::classify::ItemClassifier;

/// Room for multipart boundaries and headers on top of the image itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<ItemClassifier>,
}

impl AppState {
    pub fn new(classifier: ItemClassifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.classifier.config().max_image_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/detect", post(detect_handler))
        .route("/analyze-hybrid", post(analyze_hybrid_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("AI service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
