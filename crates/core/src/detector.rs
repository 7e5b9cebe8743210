//! Pose estimator seam and the model lifecycle around it.
//!
//! The estimator itself is an external collaborator; this module only
//! defines what the rest of the system needs from it and tracks whether it
//! is usable yet.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::keypoint::Keypoint;

// ---------------------------------------------------------------------------
// Inference options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputResolution {
    pub width: u32,
    pub height: u32,
}

/// Options handed to the estimator untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceOptions {
    pub architecture: String,
    pub output_stride: u32,
    pub input_resolution: InputResolution,
    pub multiplier: f64,
    pub flip_horizontal: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            architecture: "MobileNetV1".to_string(),
            output_stride: 16,
            input_resolution: InputResolution {
                width: 640,
                height: 480,
            },
            multiplier: 0.75,
            flip_horizontal: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Detector trait
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// Could not reach or talk to the estimator.
    #[error("Pose estimator unavailable: {0}")]
    Unavailable(String),

    /// The estimator answered with something unusable.
    #[error("Pose estimator returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Single-person pose estimation.
#[async_trait]
pub trait PoseDetector: Send + Sync {
    /// Estimate one pose in `image` (encoded bytes).
    ///
    /// `Ok(None)` means the estimator ran but found nobody.
    async fn estimate_single_pose(
        &self,
        image: &[u8],
        options: &InferenceOptions,
    ) -> Result<Option<Vec<Keypoint>>, DetectorError>;
}

// ---------------------------------------------------------------------------
// Model lifecycle
// ---------------------------------------------------------------------------

/// Public view of the model's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ModelState {
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

impl ModelState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

/// Returned by [`ModelHandle::ready`] when the detector cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Pose model is not ready (state: {})", .0.as_str())]
pub struct ModelUnavailable(pub ModelState);

enum Slot {
    Uninitialized,
    Loading,
    Ready(Arc<dyn PoseDetector>),
    Failed(String),
}

/// Shared handle to the pose model.
///
/// Transitions: `Uninitialized → Loading → Ready | Failed`. A failed model
/// stays failed until [`ModelHandle::load`] is called again.
pub struct ModelHandle {
    slot: RwLock<Slot>,
}

impl Default for ModelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelHandle {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::Uninitialized),
        }
    }

    /// A handle that is already [`ModelState::Ready`].
    pub fn ready_with(detector: Arc<dyn PoseDetector>) -> Self {
        Self {
            slot: RwLock::new(Slot::Ready(detector)),
        }
    }

    pub async fn state(&self) -> ModelState {
        match &*self.slot.read().await {
            Slot::Uninitialized => ModelState::Uninitialized,
            Slot::Loading => ModelState::Loading,
            Slot::Ready(_) => ModelState::Ready,
            Slot::Failed(reason) => ModelState::Failed(reason.clone()),
        }
    }

    /// Run `loader` and record the outcome. Returns the resulting state.
    ///
    /// Requests arriving while the loader runs see [`ModelState::Loading`].
    pub async fn load<F, Fut, E>(&self, loader: F) -> ModelState
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn PoseDetector>, E>>,
        E: std::fmt::Display,
    {
        *self.slot.write().await = Slot::Loading;

        let next = match loader().await {
            Ok(detector) => Slot::Ready(detector),
            Err(e) => Slot::Failed(e.to_string()),
        };
        *self.slot.write().await = next;

        self.state().await
    }

    /// The detector, if the model is ready.
    pub async fn ready(&self) -> Result<Arc<dyn PoseDetector>, ModelUnavailable> {
        match &*self.slot.read().await {
            Slot::Ready(detector) => Ok(Arc::clone(detector)),
            Slot::Uninitialized => Err(ModelUnavailable(ModelState::Uninitialized)),
            Slot::Loading => Err(ModelUnavailable(ModelState::Loading)),
            Slot::Failed(reason) => Err(ModelUnavailable(ModelState::Failed(reason.clone()))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
