//! Overlay drawing plan: what to draw over the displayed image, already
//! scaled from source pixels to display pixels.
//!
//! The plan is built only once the displayed size is known, so renderers
//! build it from their "layout complete" hook instead of guessing a delay.

use serde::Serialize;

use crate::analyzer::ImageSize;
use crate::error::CoreError;
use crate::keypoint::{BodyPart, BodyPoints, Keypoint, Point, DRAW_MIN_CONFIDENCE};

/// Skeleton segments drawn between adjacent keypoints (by output index).
pub const SKELETON_EDGES: [(usize, usize); 12] = [
    // arms
    (5, 6),
    (5, 7),
    (7, 9),
    (6, 8),
    (8, 10),
    // torso
    (5, 11),
    (6, 12),
    (11, 12),
    // legs
    (11, 13),
    (13, 15),
    (12, 14),
    (14, 16),
];

pub const ARM_SPAN_LABEL: &str = "ARM SPAN";
/// Vertical offset of the measurement label above the line, in display pixels.
pub const LABEL_OFFSET_PX: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    /// Index into the keypoint list.
    pub index: usize,
    pub at: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementLine {
    pub line: Segment,
    pub label: &'static str,
    pub label_at: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPlan {
    pub scale_x: f64,
    pub scale_y: f64,
    pub markers: Vec<Marker>,
    pub skeleton: Vec<Segment>,
    pub measurements: Vec<MeasurementLine>,
}

impl OverlayPlan {
    /// Build a plan for `keypoints` detected on an `original`-sized image shown
    /// at `displayed` size.
    ///
    /// Markers and skeleton use the lower drawing threshold; the arm-span
    /// line uses the analysis `body_points`.
    pub fn build(
        keypoints: &[Keypoint],
        body_points: &BodyPoints,
        original: ImageSize,
        displayed: ImageSize,
    ) -> Result<Self, CoreError> {
        original.validate()?;

        let scale_x = f64::from(displayed.width) / f64::from(original.width);
        let scale_y = f64::from(displayed.height) / f64::from(original.height);
        let scale = |p: Point| Point::new(p.x * scale_x, p.y * scale_y);

        let drawable = |kp: &Keypoint| kp.score > DRAW_MIN_CONFIDENCE;

        let markers = keypoints
            .iter()
            .enumerate()
            .filter(|(_, kp)| drawable(*kp))
            .map(|(index, kp)| Marker {
                index,
                at: scale(kp.position),
            })
            .collect();

        let skeleton = SKELETON_EDGES
            .iter()
            .filter_map(|&(a, b)| {
                let (a, b) = (keypoints.get(a)?, keypoints.get(b)?);
                (drawable(a) && drawable(b)).then(|| Segment {
                    from: scale(a.position),
                    to: scale(b.position),
                })
            })
            .collect();

        let mut measurements = Vec::new();
        if let (Some(l), Some(r)) = (
            body_points.point(BodyPart::LeftWrist),
            body_points.point(BodyPart::RightWrist),
        ) {
            let mid = scale(Point::new((l.x + r.x) / 2.0, (l.y + r.y) / 2.0));
            measurements.push(MeasurementLine {
                line: Segment {
                    from: scale(l),
                    to: scale(r),
                },
                label: ARM_SPAN_LABEL,
                label_at: Point::new(mid.x, mid.y - LABEL_OFFSET_PX),
            });
        }

        Ok(Self {
            scale_x,
            scale_y,
            markers,
            skeleton,
            measurements,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
