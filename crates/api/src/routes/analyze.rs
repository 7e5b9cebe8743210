use axum::routing::post;
use axum::Router;

use crate::handlers::analyze;
use crate::state::AppState;

/// Mount analysis routes (under `/api`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze::analyze_upload))
        .route("/analyze/keypoints", post(analyze::analyze_keypoints))
}
