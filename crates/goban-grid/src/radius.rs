use std::collections::BTreeMap;

use goban_core::DetectedCircle;
use log::debug;

use crate::fitter::{DegenerateGeometry, GridFitError, InvalidInput};

/// Half-width of the band around the modal radius that contributes to the
/// radius estimate, in pixels.
pub const DEFAULT_RADIUS_TOLERANCE_PX: f32 = 2.0;

/// Estimate the stone radius from raw circle detections.
///
/// Uses [`DEFAULT_RADIUS_TOLERANCE_PX`]. See [`estimate_radius_with_tolerance`].
pub fn estimate_radius(circles: &[DetectedCircle]) -> Result<f32, GridFitError> {
    estimate_radius_with_tolerance(circles, DEFAULT_RADIUS_TOLERANCE_PX)
}

/// Estimate the stone radius from raw circle detections.
///
/// Radii are rounded to whole pixels (half to even) and the most frequent
/// value wins; ties go to the smaller radius. The estimate is the mean of the
/// unrounded radii within `tolerance` (inclusive) of that mode, which keeps
/// double hits and spurious small/large blobs out of the average.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(circles), fields(n = circles.len()))
)]
pub fn estimate_radius_with_tolerance(
    circles: &[DetectedCircle],
    tolerance: f32,
) -> Result<f32, GridFitError> {
    if circles.is_empty() {
        return Err(InvalidInput::EmptyCircles.into());
    }
    if let Some(index) = circles
        .iter()
        .position(|c| !c.radius.is_finite() || c.radius < 0.0)
    {
        return Err(InvalidInput::InvalidRadius {
            index,
            radius: circles[index].radius,
        }
        .into());
    }

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for c in circles {
        *counts.entry(c.radius.round_ties_even() as i64).or_default() += 1;
    }
    // BTreeMap iterates in ascending radius; keep the first maximum.
    let (mode, votes) = counts
        .iter()
        .fold((0i64, 0usize), |best, (&r, &n)| if n > best.1 { (r, n) } else { best });
    let mode = mode as f32;

    let (sum, n) = circles
        .iter()
        .filter(|c| (c.radius - mode).abs() <= tolerance)
        .fold((0.0f64, 0usize), |(s, n), c| (s + c.radius as f64, n + 1));
    if n == 0 {
        return Err(DegenerateGeometry::NoCirclesNearModalRadius {
            mode,
            tolerance,
        }
        .into());
    }

    let radius = (sum / n as f64) as f32;
    debug!(
        "radius estimate {radius:.2}px (mode {mode}px with {votes} votes, {n}/{} circles in band)",
        circles.len()
    );
    Ok(radius)
}
