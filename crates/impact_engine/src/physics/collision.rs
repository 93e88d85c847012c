//! Collision record produced by the SAT query
//!
//! A [`Collision`] is a plain value consumed synchronously by whichever
//! physical body (or bodies) owns the colliding shapes. It carries no
//! identity and no lifecycle beyond the call that produced it.

use crate::foundation::math::Vec3;

/// Result of a pairwise collision test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// World position of the first shape minus the second. Not unit length.
    pub direction: Vec3,
    /// Axis of minimum overlap, absolute-valued per component.
    pub normal: Vec3,
    /// Minimum penetration depth along `normal`.
    pub overlap: f32,
}

impl Collision {
    /// Bundle a pairwise test result.
    pub fn new(direction: Vec3, normal: Vec3, overlap: f32) -> Self {
        Self {
            direction,
            normal,
            overlap,
        }
    }
}

/// 1-D overlap between two projection intervals.
///
/// Neither interval is guaranteed ordered; endpoints are min/maxed here.
/// Touching intervals count as separated, which realizes the strict
/// `d < r1 + r2` contact rule for round shapes.
pub fn interval_overlap(left: (f32, f32), right: (f32, f32)) -> Option<f32> {
    let (left_start, left_end) = (left.0.min(left.1), left.0.max(left.1));
    let (right_start, right_end) = (right.0.min(right.1), right.0.max(right.1));

    if left_end <= right_start || right_end <= left_start {
        return None;
    }

    Some(left_end.min(right_end) - left_start.max(right_start))
}
