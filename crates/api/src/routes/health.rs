use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use vitruvian_core::detector::ModelState;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "Vitruvian Man Analyzer";

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process is serving.
    pub status: &'static str,
    pub service: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Pose model lifecycle state.
    pub model: ModelState,
}

/// GET /api/health -- returns service and model status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        model: state.model.state().await,
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
