//! Geometric perception classifier.
//!
//! Decides, from angles and distances alone, whether a guard sees the
//! target outright, needs a line-of-sight ray, or cannot see it at
//! all. The occlusion ray itself lives in the sim crate; this module
//! stays pure.

use glam::DVec3;

use curfew_core::components::VisionCone;

/// Outcome of the angular/distance classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCheck {
    /// Close and in front: perceived without an occlusion check.
    DirectView,
    /// Inside the vision cone: a ray decides, and concealment can
    /// still suppress a hit.
    RequiresRay,
    /// Outside the cone entirely.
    OutOfView,
}

/// Classify the target against a guard's vision cone.
///
/// The direct-view shortcut uses the *full* field-of-view angle
/// together with the close range; the ray-gated cone uses *half* the
/// field of view. The asymmetry is deliberate: a close target slightly
/// off-axis is spotted immediately, a distant one must be well inside
/// the cone.
pub fn classify_view(
    vision: &VisionCone,
    position: DVec3,
    facing: DVec3,
    target: DVec3,
) -> ViewCheck {
    let to_target = target - position;
    let distance_sq = to_target.length_squared();

    // Coincident positions: treat as seen point-blank.
    if distance_sq < f64::EPSILON {
        return ViewCheck::DirectView;
    }

    let angle_deg = facing.angle_between(to_target).to_degrees();

    if angle_deg < vision.field_of_view_deg
        && distance_sq <= vision.close_range * vision.close_range
    {
        return ViewCheck::DirectView;
    }

    if angle_deg < vision.field_of_view_deg / 2.0 {
        return ViewCheck::RequiresRay;
    }

    ViewCheck::OutOfView
}
