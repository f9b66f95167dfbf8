//! Line-of-sight ray test against level occluders.
//!
//! The ray from a guard toward the target hits the target only if no
//! occluder intersection lies closer along the ray, and the target is
//! inside the ray's range. First-hit semantics: an occluder beyond the
//! target does not block.

use glam::DVec3;

use curfew_core::config::SphereSpec;
use curfew_core::constants::TARGET_BODY_RADIUS;

/// Distance along the unit ray `dir` at which it first enters
/// `sphere`, or `None` if it misses or the sphere lies behind the
/// origin. An origin already inside the sphere reports entry at 0.
fn ray_sphere_entry(origin: DVec3, dir: DVec3, sphere: &SphereSpec) -> Option<f64> {
    let oc = origin - sphere.center;
    let c = oc.length_squared() - sphere.radius * sphere.radius;
    if c < 0.0 {
        return Some(0.0);
    }
    let b = oc.dot(dir);
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Whether a ray cast from `from` toward `target` strikes the target
/// body first, within `max_range`.
pub fn ray_hits_target(
    from: DVec3,
    target: DVec3,
    max_range: f64,
    occluders: &[SphereSpec],
) -> bool {
    let to_target = target - from;
    let distance = to_target.length();
    if distance < f64::EPSILON {
        return true;
    }

    // Entry distance into the target body along the ray.
    let t_target = (distance - TARGET_BODY_RADIUS).max(0.0);
    if t_target > max_range {
        return false;
    }

    let dir = to_target / distance;
    for occluder in occluders {
        if let Some(t) = ray_sphere_entry(from, dir, occluder) {
            if t < t_target {
                return false;
            }
        }
    }

    true
}
