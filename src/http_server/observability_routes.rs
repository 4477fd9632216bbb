//! Observability Routes
//!
//! Health and metrics endpoints for monitoring a running server.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::observability::{MetricsSnapshot, StoreMetrics};

// ==================
// Response Types
// ==================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ==================
// Observability Routes
// ==================

/// Create observability routes
pub fn observability_routes(metrics: Arc<StoreMetrics>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

// ==================
// Handlers
// ==================

async fn health_handler() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

async fn metrics_handler(
    State(metrics): State<Arc<StoreMetrics>>,
) -> (StatusCode, Json<MetricsSnapshot>) {
    (StatusCode::OK, Json(metrics.snapshot()))
}
