pub mod analyze;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                 service and model status (GET)
/// /analyze                image upload, detect + analyze (POST, multipart)
/// /analyze/keypoints      analyze client-detected keypoints (POST, JSON)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(analyze::router())
}
