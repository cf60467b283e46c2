//! One-dimensional lattice helpers shared by the spacing search and the
//! center refinement.

use crate::fitter::{GridFitError, InvalidInput};

/// Closest value of the form `anchor + k * interval` (integer `k`) to `target`.
///
/// Ties go to the lower value. Fails if `interval` is not finite and
/// positive, or if `anchor` / `target` are not finite.
pub fn nearest_lattice_value(anchor: f32, target: f32, interval: f32) -> Result<f32, GridFitError> {
    if !(interval.is_finite() && interval > 0.0) {
        return Err(InvalidInput::NonPositiveInterval { interval }.into());
    }
    if !anchor.is_finite() || !target.is_finite() {
        return Err(InvalidInput::NonFiniteCoordinate.into());
    }
    Ok(nearest_lattice_value_unchecked(anchor, target, interval))
}

/// [`nearest_lattice_value`] without argument checks; `interval` must be > 0.
#[inline]
pub(crate) fn nearest_lattice_value_unchecked(anchor: f32, target: f32, interval: f32) -> f32 {
    let anchor = anchor as f64;
    let target = target as f64;
    let interval = interval as f64;

    let k0 = ((target - anchor) / interval).round();
    // The rounded index can be off by one when the quotient is not exact.
    let mut best = anchor + (k0 - 1.0) * interval;
    let mut best_dist = (best - target).abs();
    for k in [k0, k0 + 1.0] {
        let value = anchor + k * interval;
        let dist = (value - target).abs();
        if dist < best_dist {
            best = value;
            best_dist = dist;
        }
    }
    best as f32
}

/// Fold a coordinate into the fundamental cell `(.., interval]` by removing
/// whole intervals while it still exceeds one. Values `<= interval` are kept.
#[inline]
pub(crate) fn fold_into_cell(value: f32, interval: f32) -> f32 {
    if value <= interval {
        return value;
    }
    let value = value as f64;
    let interval = interval as f64;
    let mut steps = ((value - interval) / interval).ceil();
    let mut folded = value - steps * interval;
    // Guard against rounding at exact multiples.
    while folded > interval {
        steps += 1.0;
        folded = value - steps * interval;
    }
    while folded <= 0.0 && steps > 0.0 {
        steps -= 1.0;
        folded = value - steps * interval;
    }
    folded as f32
}
