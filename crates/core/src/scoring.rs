//! Vitruvian similarity score: a weighted blend of proportion and geometry
//! sub-scores on a 0-100 scale.

use serde::Serialize;

use crate::geometry::Geometry;
use crate::proportions::Proportions;

// ---------------------------------------------------------------------------
// Ideal proportions
// ---------------------------------------------------------------------------

/// Head length as a fraction of height.
pub const IDEAL_HEAD_RATIO: f64 = 1.0 / 8.0;
/// Arm span equals height.
pub const IDEAL_ARM_SPAN_RATIO: f64 = 1.0;
pub const IDEAL_TORSO_RATIO: f64 = 0.3;
pub const IDEAL_LEG_RATIO: f64 = 0.5;

// ---------------------------------------------------------------------------
// Penalties and weights
// ---------------------------------------------------------------------------

pub const HEAD_PENALTY: f64 = 800.0;
pub const ARM_SPAN_PENALTY: f64 = 100.0;
pub const TORSO_PENALTY: f64 = 300.0;
pub const LEG_PENALTY: f64 = 200.0;

pub const HEAD_WEIGHT: f64 = 0.15;
pub const ARM_SPAN_WEIGHT: f64 = 0.25;
pub const TORSO_WEIGHT: f64 = 0.15;
pub const LEG_WEIGHT: f64 = 0.15;
pub const SQUARE_WEIGHT: f64 = 0.15;
pub const SYMMETRY_WEIGHT: f64 = 0.15;

pub const MAX_SCORE: f64 = 100.0;

/// Per-metric sub-scores, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub head: f64,
    pub arm_span: f64,
    pub torso: f64,
    pub leg: f64,
    pub square: f64,
    pub symmetry: f64,
}

impl ScoreBreakdown {
    pub fn compute(proportions: &Proportions, geometry: &Geometry) -> Self {
        Self {
            head: proportion_score(proportions.head_to_total_ratio, IDEAL_HEAD_RATIO, HEAD_PENALTY),
            arm_span: proportion_score(
                proportions.arm_span_to_height_ratio,
                IDEAL_ARM_SPAN_RATIO,
                ARM_SPAN_PENALTY,
            ),
            torso: proportion_score(
                proportions.torso_to_total_ratio,
                IDEAL_TORSO_RATIO,
                TORSO_PENALTY,
            ),
            leg: proportion_score(proportions.leg_to_total_ratio, IDEAL_LEG_RATIO, LEG_PENALTY),
            square: geometry.square_ratio * MAX_SCORE,
            symmetry: geometry.symmetry_score * MAX_SCORE,
        }
    }

    /// Weighted sum, clamped to `[0, 100]`. NaN is not clamped away.
    pub fn total(&self) -> f64 {
        let total = self.head * HEAD_WEIGHT
            + self.arm_span * ARM_SPAN_WEIGHT
            + self.torso * TORSO_WEIGHT
            + self.leg * LEG_WEIGHT
            + self.square * SQUARE_WEIGHT
            + self.symmetry * SYMMETRY_WEIGHT;
        total.clamp(0.0, MAX_SCORE)
    }
}

/// `100 - |measured - ideal| * penalty`, floored at zero. NaN passes through.
pub fn proportion_score(measured: f64, ideal: f64, penalty: f64) -> f64 {
    let score = MAX_SCORE - (measured - ideal).abs() * penalty;
    if score < 0.0 {
        0.0
    } else {
        score
    }
}

pub fn vitruvian_score(proportions: &Proportions, geometry: &Geometry) -> f64 {
    ScoreBreakdown::compute(proportions, geometry).total()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
