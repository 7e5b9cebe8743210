//! Handlers for pose analysis.
//!
//! Two entry points feed the same analyzer: an image upload that goes through
//! the pose detector, and a keypoint list produced by client-side inference.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;
use vitruvian_core::image_meta::{read_dimensions, validate_upload};
use vitruvian_core::{AnalysisResult, ImageSize, Keypoint};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Body of `POST /api/analyze/keypoints`.
#[derive(Debug, Deserialize)]
pub struct KeypointsRequest {
    pub keypoints: Vec<Keypoint>,
    pub image_width: u32,
    pub image_height: u32,
}

struct Upload {
    filename: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

/// POST /api/analyze
///
/// Accepts a multipart form with an `image` file field. The model must be
/// ready; the upload is validated before detection runs.
pub async fn analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<AnalysisResult>> {
    let detector = state.model.ready().await?;

    let mut upload: Option<Upload> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        upload = Some(Upload {
            filename,
            content_type,
            data: data.to_vec(),
        });
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("No image file provided".into()))?;
    if upload.filename.is_empty() {
        return Err(AppError::BadRequest("No file selected".into()));
    }
    if let Err(e) = validate_upload(&upload.filename, upload.content_type.as_deref()) {
        tracing::debug!(error = %e, "Rejected upload");
        return Err(AppError::BadRequest(
            "Invalid file type. Please upload an image.".into(),
        ));
    }

    let size = read_dimensions(&upload.data)?;
    tracing::debug!(
        filename = %upload.filename,
        bytes = upload.data.len(),
        width = size.width,
        height = size.height,
        "Running pose detection"
    );

    let keypoints = detector
        .estimate_single_pose(&upload.data, &state.inference)
        .await?
        .filter(|kps| !kps.is_empty())
        .ok_or(AppError::NoPoseDetected)?;

    let result = state.upload_analyzer.analyze(&keypoints, size)?;
    tracing::info!(
        score = result.vitruvian_score,
        keypoints = keypoints.len(),
        "Analyzed uploaded image"
    );

    Ok(Json(result))
}

/// POST /api/analyze/keypoints
///
/// Analyzes keypoints detected elsewhere (e.g. in the browser). Does not
/// need the pose model.
pub async fn analyze_keypoints(
    State(state): State<AppState>,
    Json(input): Json<KeypointsRequest>,
) -> AppResult<Json<AnalysisResult>> {
    let size = ImageSize::new(input.image_width, input.image_height);
    let result = state.keypoint_analyzer.analyze(&input.keypoints, size)?;

    tracing::debug!(
        score = result.vitruvian_score,
        keypoints = input.keypoints.len(),
        "Analyzed supplied keypoints"
    );

    Ok(Json(result))
}
