//! REST client for the pose estimation service.
//!
//! Two endpoints are used:
//!
//! ```text
//! GET  {base}/health     liveness probe, used as the model "load" step
//! POST {base}/estimate   multipart: `image` file part + `options` JSON part
//!                        -> { "keypoints": [...] | null }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use vitruvian_core::detector::{DetectorError, InferenceOptions, PoseDetector};
use vitruvian_core::Keypoint;

/// HTTP client for a single pose estimation service.
#[derive(Debug, Clone)]
pub struct PoseNetApi {
    client: reqwest::Client,
    api_url: String,
}

/// Response of the `/estimate` endpoint.
#[derive(Debug, Deserialize)]
pub struct EstimateResponse {
    /// `None` when no person was found.
    #[serde(default)]
    pub keypoints: Option<Vec<Keypoint>>,
}

/// Errors from the pose service REST layer.
#[derive(Debug, thiserror::Error)]
pub enum PoseNetError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Pose service error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Inference options could not be encoded.
    #[error("Failed to encode inference options: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<PoseNetError> for DetectorError {
    fn from(err: PoseNetError) -> Self {
        match err {
            PoseNetError::Request(e) if e.is_decode() => Self::InvalidResponse(e.to_string()),
            PoseNetError::Encode(e) => Self::InvalidResponse(e.to_string()),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

impl PoseNetApi {
    /// Create a new client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8500`. A trailing
    ///   slash is ignored.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Check that the service is up.
    pub async fn probe(&self) -> Result<(), PoseNetError> {
        let response = self
            .client
            .get(format!("{}/health", self.api_url))
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Probe the service and hand it out as a detector. Used as the model
    /// loader at startup.
    pub async fn connect(self) -> Result<Arc<dyn PoseDetector>, PoseNetError> {
        self.probe().await?;
        tracing::info!(api_url = %self.api_url, "Pose service reachable");
        Ok(Arc::new(self))
    }

    /// Send an image for single-pose estimation.
    pub async fn estimate(
        &self,
        image: &[u8],
        options: &InferenceOptions,
    ) -> Result<EstimateResponse, PoseNetError> {
        let options_json = serde_json::to_string(options)?;
        let form = reqwest::multipart::Form::new()
            .part(
                "image",
                reqwest::multipart::Part::bytes(image.to_vec()).file_name("upload"),
            )
            .text("options", options_json);

        let response = self
            .client
            .post(format!("{}/estimate", self.api_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or an
    /// [`PoseNetError::ApiError`] with status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, PoseNetError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PoseNetError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PoseNetError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), PoseNetError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl PoseDetector for PoseNetApi {
    async fn estimate_single_pose(
        &self,
        image: &[u8],
        options: &InferenceOptions,
    ) -> Result<Option<Vec<Keypoint>>, DetectorError> {
        let response = self.estimate(image, options).await?;
        Ok(response.keypoints)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
