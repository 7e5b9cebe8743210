//! HTTP client for a remote PoseNet-style pose estimation service.
//!
//! Implements [`vitruvian_core::detector::PoseDetector`] so the API server and
//! the CLI can treat the remote model like any other detector.

pub mod api;

pub use api::{PoseNetApi, PoseNetError};
