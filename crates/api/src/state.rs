use std::sync::Arc;

use vitruvian_core::analyzer::{AnalyzerOptions, LabelStyle};
use vitruvian_core::detector::{InferenceOptions, ModelHandle};
use vitruvian_core::ProportionAnalyzer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Pose model lifecycle. Loaded in the background at startup.
    pub model: Arc<ModelHandle>,
    /// Analyzer for uploaded images (multi-line report label).
    pub upload_analyzer: Arc<ProportionAnalyzer>,
    /// Analyzer for client-supplied keypoints (one-line summary label).
    pub keypoint_analyzer: Arc<ProportionAnalyzer>,
    /// Passed to the detector unchanged on every request.
    pub inference: Arc<InferenceOptions>,
}

impl AppState {
    pub fn new(config: ServerConfig, model: Arc<ModelHandle>) -> Self {
        let report = AnalyzerOptions {
            label_style: LabelStyle::Report,
            ..AnalyzerOptions::default()
        };

        Self {
            config: Arc::new(config),
            model,
            upload_analyzer: Arc::new(ProportionAnalyzer::new(report)),
            keypoint_analyzer: Arc::new(ProportionAnalyzer::default()),
            inference: Arc::new(InferenceOptions::default()),
        }
    }
}
