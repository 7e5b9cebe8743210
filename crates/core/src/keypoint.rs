//! Keypoints as produced by the pose estimator, and the filtered
//! [`BodyPoints`] view the analysis works from.
//!
//! The estimator emits 17 keypoints in a fixed anatomical order. Identity is
//! positional: index 5 is always the left shoulder, whatever the `part` field
//! says (if present at all).

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Confidence thresholds
// ---------------------------------------------------------------------------

/// Minimum confidence (exclusive) for a keypoint to take part in analysis.
pub const ANALYSIS_MIN_CONFIDENCE: f64 = 0.3;
/// Minimum confidence (exclusive) for a keypoint to be drawn on the overlay.
pub const DRAW_MIN_CONFIDENCE: f64 = 0.2;

/// Number of keypoints in a full detection.
pub const KEYPOINT_COUNT: usize = 17;

// ---------------------------------------------------------------------------
// Point / Keypoint
// ---------------------------------------------------------------------------

/// A 2-D pixel position. Either coordinate may be NaN when derived from
/// missing landmarks; NaN serializes as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub x: f64,
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub y: f64,
}

impl Point {
    pub const NAN: Point = Point {
        x: f64::NAN,
        y: f64::NAN,
    };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single detected landmark in the estimator's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub position: Point,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, score: f64) -> Self {
        Self {
            position: Point::new(x, y),
            score,
            part: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Body parts
// ---------------------------------------------------------------------------

/// Anatomical landmarks, in estimator output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    /// Every part, indexed by its position in the estimator output.
    pub const ALL: [BodyPart; KEYPOINT_COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Left/right joint pairs used for the symmetry score.
    pub const LIMB_PAIRS: [(BodyPart, BodyPart); 6] = [
        (Self::LeftShoulder, Self::RightShoulder),
        (Self::LeftElbow, Self::RightElbow),
        (Self::LeftWrist, Self::RightWrist),
        (Self::LeftHip, Self::RightHip),
        (Self::LeftKnee, Self::RightKnee),
        (Self::LeftAnkle, Self::RightAnkle),
    ];

    /// Position of this part in the estimator output.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name (camelCase, as the estimator labels parts).
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "leftEye",
            Self::RightEye => "rightEye",
            Self::LeftEar => "leftEar",
            Self::RightEar => "rightEar",
            Self::LeftShoulder => "leftShoulder",
            Self::RightShoulder => "rightShoulder",
            Self::LeftElbow => "leftElbow",
            Self::RightElbow => "rightElbow",
            Self::LeftWrist => "leftWrist",
            Self::RightWrist => "rightWrist",
            Self::LeftHip => "leftHip",
            Self::RightHip => "rightHip",
            Self::LeftKnee => "leftKnee",
            Self::RightKnee => "rightKnee",
            Self::LeftAnkle => "leftAnkle",
            Self::RightAnkle => "rightAnkle",
        }
    }
}

impl std::fmt::Display for BodyPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Body points
// ---------------------------------------------------------------------------

/// A keypoint that passed the confidence filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyPoint {
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

impl BodyPoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Confidence-filtered landmarks keyed by [`BodyPart`].
///
/// No part is guaranteed to be present. Serializes as a JSON object keyed by
/// part name, in anatomical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyPoints {
    slots: [Option<BodyPoint>; KEYPOINT_COUNT],
}

impl BodyPoints {
    /// Keep the keypoints whose score is strictly above `min_confidence`.
    ///
    /// Short input leaves the trailing parts absent; anything past the
    /// 17th keypoint is ignored.
    pub fn from_keypoints(keypoints: &[Keypoint], min_confidence: f64) -> Self {
        let mut slots = [None; KEYPOINT_COUNT];
        for (slot, kp) in slots.iter_mut().zip(keypoints) {
            if kp.score > min_confidence {
                *slot = Some(BodyPoint {
                    x: kp.position.x,
                    y: kp.position.y,
                    confidence: kp.score,
                });
            }
        }
        Self { slots }
    }

    pub fn get(&self, part: BodyPart) -> Option<&BodyPoint> {
        self.slots[part.index()].as_ref()
    }

    /// Position of `part`, if present.
    pub fn point(&self, part: BodyPart) -> Option<Point> {
        self.get(part).map(BodyPoint::point)
    }

    pub fn contains(&self, part: BodyPart) -> bool {
        self.slots[part.index()].is_some()
    }

    /// Present parts in anatomical order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, &BodyPoint)> {
        BodyPart::ALL
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(part, slot)| slot.as_ref().map(|p| (*part, p)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for BodyPoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (part, point) in self.iter() {
            map.serialize_entry(part.name(), point)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
