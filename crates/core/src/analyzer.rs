//! The proportion analysis pipeline:
//! keypoints → body points → {proportions, geometry} → score → label.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::{analyze_geometry, Geometry};
use crate::keypoint::{BodyPart, BodyPoints, Keypoint, ANALYSIS_MIN_CONFIDENCE};
use crate::labels::{analysis_report, summary_label, ReportLevel, ScoreTier};
use crate::overlay::OverlayPlan;
use crate::proportions::{calculate_proportions, Proportions};
use crate::scoring::{vitruvian_score, IDEAL_ARM_SPAN_RATIO, IDEAL_HEAD_RATIO};

/// Landmarks every proportion depends on.
pub const REQUIRED_LANDMARKS: [BodyPart; 7] = [
    BodyPart::Nose,
    BodyPart::LeftShoulder,
    BodyPart::RightShoulder,
    BodyPart::LeftHip,
    BodyPart::RightHip,
    BodyPart::LeftAnkle,
    BodyPart::RightAnkle,
];

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::Validation(format!(
                "image dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Which text goes into [`AnalysisResult::analysis`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// One-line label, as the in-browser analyzer produces.
    #[default]
    Summary,
    /// Multi-line report, as the upload endpoint produces.
    Report,
}

/// What to do when a required landmark was not detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLandmarks {
    /// Let NaN flow through the ratios into the score.
    #[default]
    Propagate,
    /// Fail with [`CoreError::IncompleteDetection`].
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerOptions {
    pub label_style: LabelStyle,
    pub missing_landmarks: MissingLandmarks,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Terminal output of one analysis. Field names match the JSON the renderer
/// reads, whichever path produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub vitruvian_score: f64,
    pub proportions: Proportions,
    pub geometry: Geometry,
    pub analysis: String,
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
    /// Source image size; known locally, not part of the wire format.
    #[serde(skip)]
    pub image_size: Option<ImageSize>,
}

impl AnalysisResult {
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.vitruvian_score)
    }

    /// Level shown beside the rounded score.
    pub fn displayed_level(&self) -> ReportLevel {
        ReportLevel::from_displayed_score(self.vitruvian_score)
    }

    /// Headline metrics as `(name, value, ideal)`.
    pub fn metrics(&self) -> [(&'static str, f64, f64); 4] {
        [
            ("Head ratio", self.proportions.head_to_total_ratio, IDEAL_HEAD_RATIO),
            (
                "Arm span",
                self.proportions.arm_span_to_height_ratio,
                IDEAL_ARM_SPAN_RATIO,
            ),
            ("Symmetry", self.geometry.symmetry_score, 1.0),
            ("Square fit", self.geometry.square_ratio, 1.0),
        ]
    }

    /// Drawing instructions for the image as currently laid out.
    pub fn overlay(&self, displayed: ImageSize) -> Result<OverlayPlan, CoreError> {
        let original = self.image_size.ok_or_else(|| {
            CoreError::Validation("source image size is unknown for this result".into())
        })?;
        let body_points = BodyPoints::from_keypoints(&self.keypoints, ANALYSIS_MIN_CONFIDENCE);
        OverlayPlan::build(&self.keypoints, &body_points, original, displayed)
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ProportionAnalyzer {
    options: AnalyzerOptions,
}

impl ProportionAnalyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> AnalyzerOptions {
        self.options
    }

    pub fn analyze(
        &self,
        keypoints: &[Keypoint],
        image: ImageSize,
    ) -> Result<AnalysisResult, CoreError> {
        image.validate()?;

        let body_points = BodyPoints::from_keypoints(keypoints, ANALYSIS_MIN_CONFIDENCE);
        if self.options.missing_landmarks == MissingLandmarks::Reject {
            let missing: Vec<BodyPart> = REQUIRED_LANDMARKS
                .into_iter()
                .filter(|part| {
                    !body_points
                        .point(*part)
                        .is_some_and(|p| p.x.is_finite() && p.y.is_finite())
                })
                .collect();
            if !missing.is_empty() {
                return Err(CoreError::IncompleteDetection { missing });
            }
        }

        let proportions = calculate_proportions(&body_points);
        let geometry = analyze_geometry(&body_points);
        let score = vitruvian_score(&proportions, &geometry);

        let analysis = match self.options.label_style {
            LabelStyle::Summary => summary_label(score).to_string(),
            LabelStyle::Report => analysis_report(score, &proportions, &geometry),
        };

        Ok(AnalysisResult {
            vitruvian_score: score,
            proportions,
            geometry,
            analysis,
            keypoints: keypoints.to_vec(),
            image_size: Some(image),
        })
    }
}

/// Analyze with default options (summary label, NaN propagation).
pub fn analyze_pose(keypoints: &[Keypoint], image: ImageSize) -> Result<AnalysisResult, CoreError> {
    ProportionAnalyzer::default().analyze(keypoints, image)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
