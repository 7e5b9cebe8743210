#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vitruvian_api::config::ServerConfig;
use vitruvian_api::router::build_app_router;
use vitruvian_api::state::AppState;
use vitruvian_core::detector::{DetectorError, InferenceOptions, ModelHandle, PoseDetector};
use vitruvian_core::{BodyPart, Keypoint};

pub const BOUNDARY: &str = "vitruvian-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 16 * 1024 * 1024,
        pose_service_url: None,
    }
}

/// Build the full application router around the given model handle, using
/// the same middleware stack as production.
pub fn build_test_app(model: ModelHandle) -> Router {
    build_test_app_with(test_config(), model)
}

pub fn build_test_app_with(config: ServerConfig, model: ModelHandle) -> Router {
    let state = AppState::new(config.clone(), Arc::new(model));
    build_app_router(state, &config)
}

/// A model handle that is ready and answers with `detector`.
pub fn ready_model(detector: StaticDetector) -> ModelHandle {
    ModelHandle::ready_with(Arc::new(detector))
}

// ---------------------------------------------------------------------------
// Detector double
// ---------------------------------------------------------------------------

/// Answers every request with the same outcome.
pub enum StaticDetector {
    Found(Vec<Keypoint>),
    Nobody,
    Down,
}

#[async_trait]
impl PoseDetector for StaticDetector {
    async fn estimate_single_pose(
        &self,
        _image: &[u8],
        _options: &InferenceOptions,
    ) -> Result<Option<Vec<Keypoint>>, DetectorError> {
        match self {
            Self::Found(kps) => Ok(Some(kps.clone())),
            Self::Nobody => Ok(None),
            Self::Down => Err(DetectorError::Unavailable("connection refused".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Upright, mirrored figure in a 1000x1000 frame, arms out horizontally.
pub fn standing_figure() -> Vec<Keypoint> {
    let mut kps = vec![Keypoint::new(0.0, 0.0, 0.05); 17];
    let mut set = |part: BodyPart, x: f64, y: f64| {
        kps[part.index()] = Keypoint::new(x, y, 0.9);
    };
    set(BodyPart::Nose, 500.0, 100.0);
    set(BodyPart::LeftShoulder, 420.0, 200.0);
    set(BodyPart::RightShoulder, 580.0, 200.0);
    set(BodyPart::LeftElbow, 260.0, 200.0);
    set(BodyPart::RightElbow, 740.0, 200.0);
    set(BodyPart::LeftWrist, 100.0, 200.0);
    set(BodyPart::RightWrist, 900.0, 200.0);
    set(BodyPart::LeftHip, 440.0, 440.0);
    set(BodyPart::RightHip, 560.0, 440.0);
    set(BodyPart::LeftKnee, 450.0, 670.0);
    set(BodyPart::RightKnee, 550.0, 670.0);
    set(BodyPart::LeftAnkle, 460.0, 900.0);
    set(BodyPart::RightAnkle, 540.0, 900.0);
    kps
}

/// A small encoded PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image::RgbImage::new(width, height)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Encode one multipart file part.
pub fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Encode one multipart text part.
pub fn multipart_text(field: &str, value: &str) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n--{BOUNDARY}--\r\n"
    )
    .into_bytes()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
