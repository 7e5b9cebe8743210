use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vitruvian_core::detector::{DetectorError, ModelUnavailable};
use vitruvian_core::error::CoreError;

/// Shown to clients while the pose model is not usable.
pub const MODEL_LOADING_MESSAGE: &str =
    "AI model is still loading. Please wait a moment and try again.";

/// Shown when the detector found nobody in the image.
pub const NO_POSE_MESSAGE: &str = "No human pose detected in image";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vitruvian_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The pose model has not finished loading (or failed to).
    #[error(transparent)]
    ModelUnavailable(#[from] ModelUnavailable),

    /// The detector could not be reached or answered badly.
    #[error(transparent)]
    Detector(#[from] DetectorError),

    /// The detector ran but found no person.
    #[error("No pose detected")]
    NoPoseDetected,

    /// The multipart body could not be read.
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::ImageLoad(msg) => {
                    tracing::debug!(error = %msg, "Unreadable image header");
                    (
                        StatusCode::BAD_REQUEST,
                        "INVALID_IMAGE",
                        "Could not load the selected image".to_string(),
                    )
                }
                CoreError::IncompleteDetection { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INCOMPLETE_DETECTION",
                    core.to_string(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Model / detector ---
            AppError::ModelUnavailable(err) => {
                tracing::debug!(state = err.0.as_str(), "Rejecting request, model not ready");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MODEL_UNAVAILABLE",
                    MODEL_LOADING_MESSAGE.to_string(),
                )
            }
            AppError::Detector(err) => {
                tracing::warn!(error = %err, "Pose detector failed");
                (StatusCode::BAD_GATEWAY, "DETECTOR_ERROR", err.to_string())
            }
            AppError::NoPoseDetected => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_POSE_DETECTED",
                NO_POSE_MESSAGE.to_string(),
            ),

            // --- HTTP-specific errors ---
            AppError::Multipart(err) => {
                let status = err.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "BAD_REQUEST"
                };
                (status, code, err.body_text())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
