//! Waypoint selection policies.
//!
//! Both policies keep the route index inside `0..len` at all times.

use rand::Rng;

/// Sequential policy: advance by one, wrapping to 0 past the last
/// valid index.
pub fn advance_sequential(index: usize, len: usize) -> usize {
    debug_assert!(len > 0, "routes are validated non-empty");
    (index + 1) % len
}

/// Random policy: draw uniformly from `0..len`, rejecting the index
/// selected immediately before.
///
/// Single-point routes are a fixed point: no draw is made, so the
/// rejection loop cannot spin forever.
pub fn pick_random(rng: &mut impl Rng, len: usize, previous: usize) -> usize {
    debug_assert!(len > 0, "routes are validated non-empty");
    if len == 1 {
        return 0;
    }
    loop {
        let candidate = rng.gen_range(0..len);
        if candidate != previous {
            return candidate;
        }
    }
}
