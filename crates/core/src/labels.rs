//! Text presentations of a score.
//!
//! There are several of these with different cut-offs: the
//! short summary label stored in results, the level/description pair shown
//! next to the rounded score, the server-side report, and the per-metric
//! status badge. A NaN score or metric always falls into the lowest bucket.

use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;
use crate::proportions::Proportions;
use crate::scoring::{IDEAL_ARM_SPAN_RATIO, IDEAL_HEAD_RATIO};

// ---------------------------------------------------------------------------
// Summary label
// ---------------------------------------------------------------------------

pub fn summary_label(score: f64) -> &'static str {
    if score >= 85.0 {
        "🎨 Extraordinary Renaissance perfection!"
    } else if score >= 70.0 {
        "✨ Excellent classical proportions!"
    } else if score >= 55.0 {
        "👍 Good proportional harmony!"
    } else if score >= 40.0 {
        "📏 Fair geometric alignment."
    } else {
        "🌱 Unique proportional character."
    }
}

// ---------------------------------------------------------------------------
// Score tier (level + description)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    RenaissanceMaster,
    ClassicalBeauty,
    HarmoniousForm,
    DevelopingGrace,
    ArtisticBeginning,
}

impl ScoreTier {
    /// Tier for a raw score; the score is rounded first, as displayed.
    pub fn from_score(score: f64) -> Self {
        let shown = score.round();
        if shown >= 85.0 {
            Self::RenaissanceMaster
        } else if shown >= 70.0 {
            Self::ClassicalBeauty
        } else if shown >= 55.0 {
            Self::HarmoniousForm
        } else if shown >= 40.0 {
            Self::DevelopingGrace
        } else {
            Self::ArtisticBeginning
        }
    }

    pub fn level(self) -> &'static str {
        match self {
            Self::RenaissanceMaster => "Renaissance Master",
            Self::ClassicalBeauty => "Classical Beauty",
            Self::HarmoniousForm => "Harmonious Form",
            Self::DevelopingGrace => "Developing Grace",
            Self::ArtisticBeginning => "Artistic Beginning",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::RenaissanceMaster => "Extraordinary proportional harmony",
            Self::ClassicalBeauty => "Excellent geometric balance",
            Self::HarmoniousForm => "Good proportional alignment",
            Self::DevelopingGrace => "Promising proportional foundation",
            Self::ArtisticBeginning => "Starting your proportional journey",
        }
    }
}

// ---------------------------------------------------------------------------
// Server level + report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ReportLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Level shown next to the rounded score.
    pub fn from_displayed_score(score: f64) -> Self {
        Self::from_score(score.round())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Multi-line human-readable report.
pub fn analysis_report(score: f64, proportions: &Proportions, geometry: &Geometry) -> String {
    let level = ReportLevel::from_score(score).label();
    format!(
        "Vitruvian Man Analysis: {level} ({score:.1}/100)\n\n\
         Proportions:\n\
         - Head to height ratio: {:.3} (ideal: {IDEAL_HEAD_RATIO:.3})\n\
         - Arm span to height: {:.3} (ideal: {IDEAL_ARM_SPAN_RATIO:.3})\n\
         - Symmetry score: {:.3}\n\
         - Square fit ratio: {:.3}\n",
        proportions.head_to_total_ratio,
        proportions.arm_span_to_height_ratio,
        geometry.symmetry_score,
        geometry.square_ratio,
    )
}

// ---------------------------------------------------------------------------
// Metric status
// ---------------------------------------------------------------------------

/// Closeness of a single displayed metric to its ideal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Excellent,
    Good,
    Fair,
    Unique,
}

impl MetricStatus {
    /// Classify by relative deviation `|value - ideal| / ideal`.
    pub fn evaluate(value: f64, ideal: f64) -> Self {
        let deviation = (value - ideal).abs() / ideal;
        if deviation < 0.1 {
            Self::Excellent
        } else if deviation < 0.2 {
            Self::Good
        } else if deviation < 0.4 {
            Self::Fair
        } else {
            Self::Unique
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Unique => "Unique",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Unique => "needs-work",
        }
    }
}

// ---------------------------------------------------------------------------
// Metric colour band
// ---------------------------------------------------------------------------

/// Traffic-light colour for a metric bar, by absolute deviation from ideal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricBand {
    Green,
    Yellow,
    Red,
}

impl MetricBand {
    pub fn evaluate(value: f64, ideal: f64) -> Self {
        let deviation = (value - ideal).abs();
        if deviation.is_nan() || deviation > ideal * 0.4 {
            Self::Red
        } else if deviation > ideal * 0.2 {
            Self::Yellow
        } else {
            Self::Green
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Green => "#28a745",
            Self::Yellow => "#ffc107",
            Self::Red => "#dc3545",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
