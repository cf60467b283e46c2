use goban_core::{DetectedCircle, Lattice, PixelBounds};
use nalgebra::Point2;

use super::{DegenerateGeometry, GridFitError, InvalidInput};
use crate::lattice::{fold_into_cell, nearest_lattice_value_unchecked};

/// Centers of circles whose radius is strictly within `tolerance` of `radius`.
pub(crate) fn trusted_points(
    circles: &[DetectedCircle],
    radius: f32,
    tolerance: f32,
) -> Vec<Point2<f32>> {
    circles
        .iter()
        .filter(|c| (c.radius - radius).abs() < tolerance)
        .map(DetectedCircle::center)
        .collect()
}

/// Lattice origin as the mean phase of the trusted points.
///
/// Each point is folded into the first lattice cell per axis before
/// averaging.
pub(crate) fn estimate_lattice(
    trusted: &[Point2<f32>],
    spacing: f32,
    radius: f32,
    tolerance: f32,
) -> Result<Lattice, GridFitError> {
    if trusted.is_empty() {
        return Err(DegenerateGeometry::NoTrustedPoints { radius, tolerance }.into());
    }
    let (sx, sy) = trusted.iter().fold((0.0f64, 0.0f64), |(sx, sy), p| {
        (
            sx + fold_into_cell(p.x, spacing) as f64,
            sy + fold_into_cell(p.y, spacing) as f64,
        )
    });
    let n = trusted.len() as f64;
    let origin = Point2::new((sx / n) as f32, (sy / n) as f32);
    Lattice::new(origin, spacing)
        .ok_or(InvalidInput::NonPositiveInterval { interval: spacing }.into())
}

/// Nudge a nominal intersection toward the lattice lines through the trusted
/// points, weighting each point by inverse Manhattan distance.
///
/// `refined = momentum * nominal + (1 - momentum) * weighted_pull`, truncated
/// toward zero. A trusted point exactly on the nominal center returns the
/// nominal center.
pub(crate) fn refine_center(
    nominal: Point2<f32>,
    trusted: &[Point2<f32>],
    spacing: f32,
    momentum: f32,
) -> Point2<i32> {
    let truncate = |p: Point2<f64>| Point2::new(p.x as i32, p.y as i32);
    let nominal64 = Point2::new(nominal.x as f64, nominal.y as f64);

    if trusted.is_empty() || trusted.iter().any(|p| *p == nominal) {
        return truncate(nominal64);
    }

    let (wx, wy, wsum) = trusted.iter().fold((0.0f64, 0.0f64, 0.0f64), |acc, p| {
        let dist = (p.x - nominal.x).abs() as f64 + (p.y - nominal.y).abs() as f64;
        let w = 1.0 / dist;
        let pull_x = nearest_lattice_value_unchecked(p.x, nominal.x, spacing) as f64;
        let pull_y = nearest_lattice_value_unchecked(p.y, nominal.y, spacing) as f64;
        (acc.0 + w * pull_x, acc.1 + w * pull_y, acc.2 + w)
    });

    if !(wsum.is_finite() && wsum > 0.0) {
        return truncate(nominal64);
    }

    // Same blend as `m * nominal + (1 - m) * pull`, exact when pull == nominal.
    let step = 1.0 - momentum as f64;
    truncate(Point2::new(
        nominal64.x + step * (wx / wsum - nominal64.x),
        nominal64.y + step * (wy / wsum - nominal64.y),
    ))
}

/// Square crop of half-width `half` around `center`, clipped to the image.
///
/// `None` when nothing of the square lies inside the image.
pub(crate) fn crop_bounds(
    center: Point2<i32>,
    half: usize,
    width: usize,
    height: usize,
) -> Option<PixelBounds> {
    let half = half as i64;
    let clip = |c: i32, size: usize| {
        let lo = (c as i64 - half).clamp(0, size as i64) as usize;
        let hi = (c as i64 + half).clamp(0, size as i64) as usize;
        (lo, hi)
    };
    let (x_min, x_max) = clip(center.x, width);
    let (y_min, y_max) = clip(center.y, height);
    let bounds = PixelBounds {
        x_min,
        x_max,
        y_min,
        y_max,
    };
    (!bounds.is_empty()).then_some(bounds)
}
