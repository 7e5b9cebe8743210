//! Whole-figure geometry: bounding-box squareness, centroid and
//! left/right symmetry.

use serde::{Deserialize, Serialize};

use crate::keypoint::{BodyPart, BodyPoints, Point};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub width: f64,
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// `min(w, h) / max(w, h)`; NaN for a degenerate box.
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub square_ratio: f64,
    /// Mean per-pair symmetry in `[0, 1]`; `0` when no pair could be evaluated.
    #[serde(deserialize_with = "crate::nan::deserialize")]
    pub symmetry_score: f64,
    pub bounding_box: BoundingBox,
    pub center_point: Point,
}

// A coordinate of exactly zero (or NaN) drops the whole point.
fn is_usable(v: f64) -> bool {
    v != 0.0 && !v.is_nan()
}

pub fn analyze_geometry(points: &BodyPoints) -> Geometry {
    let usable: Vec<Point> = points
        .iter()
        .map(|(_, p)| p.point())
        .filter(|p| is_usable(p.x) && is_usable(p.y))
        .collect();

    let n = usable.len() as f64;
    let center = Point::new(
        usable.iter().map(|p| p.x).sum::<f64>() / n,
        usable.iter().map(|p| p.y).sum::<f64>() / n,
    );

    let bounding_box = bounds(&usable);
    let longest = bounding_box.width.max(bounding_box.height);
    let square_ratio = bounding_box.width.min(bounding_box.height) / longest;

    Geometry {
        square_ratio,
        symmetry_score: symmetry_score(points, center.x),
        bounding_box,
        center_point: center,
    }
}

fn bounds(points: &[Point]) -> BoundingBox {
    if points.is_empty() {
        return BoundingBox {
            width: 0.0,
            height: 0.0,
        };
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    BoundingBox {
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

/// Average bilateral symmetry of the limb pairs about `center_x`.
///
/// Pairs with a missing side, or with both sides on the center line, are
/// skipped.
pub fn symmetry_score(points: &BodyPoints, center_x: f64) -> f64 {
    let mut sum = 0.0;
    let mut evaluated = 0usize;

    for (left, right) in BodyPart::LIMB_PAIRS {
        let (Some(l), Some(r)) = (points.get(left), points.get(right)) else {
            continue;
        };

        let left_dist = (l.x - center_x).abs();
        let right_dist = (r.x - center_x).abs();
        let total = left_dist + right_dist;
        if total > 0.0 {
            sum += 1.0 - (left_dist - right_dist).abs() / total;
            evaluated += 1;
        }
    }

    let score = if evaluated > 0 {
        sum / evaluated as f64
    } else {
        0.0
    };
    score.max(0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
