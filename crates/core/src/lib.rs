//! Vitruvian pose analysis: body-proportion ratios, symmetry and
//! squareness scoring from 17 pose keypoints.
//!
//! Everything here is pure and synchronous except the [`detector`] seam,
//! which describes the external pose estimator and its load lifecycle.

pub mod analyzer;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod image_meta;
pub mod keypoint;
pub mod labels;
mod nan;
pub mod overlay;
pub mod proportions;
pub mod reply;
pub mod scoring;

pub use analyzer::{analyze_pose, AnalysisResult, AnalyzerOptions, ImageSize, ProportionAnalyzer};
pub use error::CoreError;
pub use keypoint::{BodyPart, BodyPoints, Keypoint, Point};
