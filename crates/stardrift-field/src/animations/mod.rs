//! Particle animations.

pub mod dots;
pub mod stars;

/// Wrap a coordinate into `[0, extent)`, re-entering from the opposite edge.
///
/// A zero or negative extent collapses everything onto the origin.
pub(crate) fn wrap(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}
