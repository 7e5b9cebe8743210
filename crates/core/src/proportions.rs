//! Body proportion ratios derived from [`BodyPoints`].
//!
//! Missing landmarks are not errors here. An absent operand makes a
//! [`distance`] exactly `0`, while a midpoint of an incomplete pair is NaN and
//! keeps propagating through every measurement that uses it. Only the
//! zero-height division is guarded.

use serde::{Deserialize, Serialize};

use crate::keypoint::{BodyPart, BodyPoints, Point};

/// Raw linear measurements in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub head_length: f64,
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub total_height: f64,
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub arm_span: f64,
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub torso_length: f64,
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub leg_length: f64,
}

/// Dimensionless ratios against total height, plus the measurements behind them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Proportions {
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub head_to_total_ratio: f64,
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub arm_span_to_height_ratio: f64,
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub torso_to_total_ratio: f64,
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub leg_to_total_ratio: f64,
    pub measurements: Measurements,
}

/// Euclidean distance, or `0` when either point is absent.
pub fn distance(a: Option<Point>, b: Option<Point>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => (a.x - b.x).hypot(a.y - b.y),
        _ => 0.0,
    }
}

/// Mean of two positions; NaN in both coordinates if either side is absent.
pub fn midpoint(a: Option<Point>, b: Option<Point>) -> Point {
    match (a, b) {
        (Some(a), Some(b)) => Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
        _ => Point::NAN,
    }
}

fn ratio(measurement: f64, total_height: f64) -> f64 {
    // NaN height fails the comparison too.
    if total_height > 0.0 {
        measurement / total_height
    } else {
        0.0
    }
}

pub fn calculate_proportions(points: &BodyPoints) -> Proportions {
    let shoulder_center = midpoint(
        points.point(BodyPart::LeftShoulder),
        points.point(BodyPart::RightShoulder),
    );
    let hip_center = midpoint(
        points.point(BodyPart::LeftHip),
        points.point(BodyPart::RightHip),
    );
    let ankle_center = midpoint(
        points.point(BodyPart::LeftAnkle),
        points.point(BodyPart::RightAnkle),
    );
    let nose = points.point(BodyPart::Nose);

    let head_length = distance(nose, Some(shoulder_center));
    let total_height = (nose.map_or(f64::NAN, |p| p.y) - ankle_center.y).abs();
    let arm_span = distance(
        points.point(BodyPart::LeftWrist),
        points.point(BodyPart::RightWrist),
    );
    let torso_length = distance(Some(shoulder_center), Some(hip_center));
    let leg_length = distance(Some(hip_center), Some(ankle_center));

    Proportions {
        head_to_total_ratio: ratio(head_length, total_height),
        arm_span_to_height_ratio: ratio(arm_span, total_height),
        torso_to_total_ratio: ratio(torso_length, total_height),
        leg_to_total_ratio: ratio(leg_length, total_height),
        measurements: Measurements {
            head_length,
            total_height,
            arm_span,
            torso_length,
            leg_length,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
