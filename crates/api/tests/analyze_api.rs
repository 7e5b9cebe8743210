//! Integration tests for the analysis endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, multipart_body, multipart_text, png_bytes,
    post_json, post_multipart, ready_model, standing_figure, test_config, StaticDetector,
};
use serde_json::json;
use vitruvian_core::detector::ModelHandle;
use vitruvian_core::{BodyPart, Keypoint};

fn png_upload() -> Vec<u8> {
    multipart_body("image", "pose.png", "image/png", &png_bytes(64, 48))
}

// ---------------------------------------------------------------------------
// POST /api/analyze
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_returns_analysis_with_report() {
    let app = build_test_app(ready_model(StaticDetector::Found(standing_figure())));
    let response = post_multipart(app, "/api/analyze", png_upload()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let score = json["vitruvian_score"].as_f64().unwrap();
    assert!((score - 97.75).abs() < 1e-6, "score was {score}");

    let analysis = json["analysis"].as_str().unwrap();
    assert!(analysis.starts_with("Vitruvian Man Analysis: Excellent ("));
    assert!(analysis.contains("- Square fit ratio: 1.000"));

    assert_eq!(json["keypoints"].as_array().unwrap().len(), 17);
    assert_eq!(json["geometry"]["bounding_box"]["width"], 800.0);
    assert_eq!(json["proportions"]["measurements"]["total_height"], 800.0);
}

#[tokio::test]
async fn upload_accepts_uppercase_extension() {
    let app = build_test_app(ready_model(StaticDetector::Found(standing_figure())));
    let body = multipart_body("image", "POSE.PNG", "image/png", &png_bytes(8, 8));
    let response = post_multipart(app, "/api/analyze", body).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn upload_rejected_while_model_uninitialized() {
    let app = build_test_app(ModelHandle::new());
    let response = post_multipart(app, "/api/analyze", png_upload()).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "MODEL_UNAVAILABLE");
    assert_eq!(
        json["error"],
        "AI model is still loading. Please wait a moment and try again."
    );
}

#[tokio::test]
async fn upload_without_image_field_is_rejected() {
    let app = build_test_app(ready_model(StaticDetector::Found(standing_figure())));
    let response = post_multipart(app, "/api/analyze", multipart_text("notes", "hello")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No image file provided");
}

#[tokio::test]
async fn upload_with_empty_filename_is_rejected() {
    let app = build_test_app(ready_model(StaticDetector::Found(standing_figure())));
    let body = multipart_body("image", "", "image/png", &png_bytes(8, 8));
    let response = post_multipart(app, "/api/analyze", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No file selected");
}

#[tokio::test]
async fn upload_of_plain_text_field_counts_as_no_selection() {
    let app = build_test_app(ready_model(StaticDetector::Found(standing_figure())));
    let response = post_multipart(app, "/api/analyze", multipart_text("image", "abc")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No file selected");
}

#[tokio::test]
async fn upload_with_wrong_extension_is_rejected() {
    let app = build_test_app(ready_model(StaticDetector::Found(standing_figure())));
    let body = multipart_body("image", "notes.txt", "text/plain", b"just text");
    let response = post_multipart(app, "/api/analyze", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid file type. Please upload an image.");
}

#[tokio::test]
async fn upload_with_non_image_content_type_is_rejected() {
    let app = build_test_app(ready_model(StaticDetector::Found(standing_figure())));
    let body = multipart_body("image", "pose.png", "application/pdf", &png_bytes(8, 8));
    let response = post_multipart(app, "/api/analyze", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid file type. Please upload an image.");
}

#[tokio::test]
async fn upload_with_unreadable_image_is_rejected() {
    let app = build_test_app(ready_model(StaticDetector::Found(standing_figure())));
    let body = multipart_body("image", "pose.png", "image/png", b"definitely not a png");
    let response = post_multipart(app, "/api/analyze", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_IMAGE");
    assert_eq!(json["error"], "Could not load the selected image");
}

#[tokio::test]
async fn upload_with_nobody_in_frame_returns_422() {
    let app = build_test_app(ready_model(StaticDetector::Nobody));
    let response = post_multipart(app, "/api/analyze", png_upload()).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NO_POSE_DETECTED");
    assert_eq!(json["error"], "No human pose detected in image");
}

#[tokio::test]
async fn upload_with_empty_keypoint_list_returns_422() {
    let app = build_test_app(ready_model(StaticDetector::Found(vec![])));
    let response = post_multipart(app, "/api/analyze", png_upload()).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn upload_with_detector_down_returns_502() {
    let app = build_test_app(ready_model(StaticDetector::Down));
    let response = post_multipart(app, "/api/analyze", png_upload()).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DETECTOR_ERROR");
}

#[tokio::test]
async fn upload_over_body_limit_returns_413() {
    let mut config = test_config();
    config.max_upload_bytes = 1024;
    let app = build_test_app_with(config, ready_model(StaticDetector::Nobody));
    let body = multipart_body("image", "big.png", "image/png", &vec![0u8; 8 * 1024]);
    let response = post_multipart(app, "/api/analyze", body).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
}

// ---------------------------------------------------------------------------
// POST /api/analyze/keypoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn keypoints_endpoint_works_without_model() {
    let app = build_test_app(ModelHandle::new());
    let body = json!({
        "keypoints": standing_figure(),
        "image_width": 1000,
        "image_height": 1000,
    });
    let response = post_json(app, "/api/analyze/keypoints", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["analysis"], "🎨 Extraordinary Renaissance perfection!");
    assert_eq!(json["geometry"]["symmetry_score"], 1.0);
    assert_eq!(json["geometry"]["square_ratio"], 1.0);
}

#[tokio::test]
async fn keypoints_with_missing_shoulders_report_null_score() {
    let mut keypoints = standing_figure();
    keypoints[BodyPart::LeftShoulder.index()] = Keypoint::new(420.0, 200.0, 0.1);
    keypoints[BodyPart::RightShoulder.index()] = Keypoint::new(580.0, 200.0, 0.1);

    let app = build_test_app(ModelHandle::new());
    let body = json!({
        "keypoints": keypoints,
        "image_width": 1000,
        "image_height": 1000,
    });
    let response = post_json(app, "/api/analyze/keypoints", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["vitruvian_score"].is_null());
    assert!(json["proportions"]["torso_to_total_ratio"].is_null());
    assert_eq!(json["analysis"], "🌱 Unique proportional character.");
}

#[tokio::test]
async fn keypoints_with_zero_image_size_are_rejected() {
    let app = build_test_app(ModelHandle::new());
    let body = json!({
        "keypoints": standing_figure(),
        "image_width": 0,
        "image_height": 480,
    });
    let response = post_json(app, "/api/analyze/keypoints", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
