use goban_core::DetectedCircle;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::fitter::{GridFitError, InvalidInput};
use crate::lattice::nearest_lattice_value_unchecked;

/// How per-circle lattice offsets are aggregated into a spacing score.
///
/// The offset of one coordinate is `nearest_lattice_value - coordinate`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingObjective {
    /// Plain sum of signed offsets. This is the reference behaviour and the
    /// compatibility baseline for earlier signed-sum fits. Positive and
    /// negative offsets cancel, so the minimum is biased toward spacings
    /// whose lattice sits below the detections; not the default.
    SignedOffset,
    /// Sum of absolute offsets.
    AbsoluteOffset,
    /// Sum of squared offsets.
    #[default]
    SquaredOffset,
}

impl SpacingObjective {
    #[inline]
    fn cost(self, offset: f64) -> f64 {
        match self {
            SpacingObjective::SignedOffset => offset,
            SpacingObjective::AbsoluteOffset => offset.abs(),
            SpacingObjective::SquaredOffset => offset * offset,
        }
    }
}

/// Candidate window and sampling for the spacing search.
///
/// Candidates cover `[2r - below_diameter_px, 2r + above_diameter_px)` in
/// `samples` uniform steps, where `r` is the estimated stone radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingSearchParams {
    pub below_diameter_px: f32,
    pub above_diameter_px: f32,
    pub samples: usize,
    pub objective: SpacingObjective,
}

impl Default for SpacingSearchParams {
    fn default() -> Self {
        Self {
            below_diameter_px: 5.0,
            above_diameter_px: 5.0,
            samples: 1000,
            objective: SpacingObjective::default(),
        }
    }
}

impl SpacingSearchParams {
    /// `(min, step)` of the candidate window for a given stone radius.
    fn window(&self, est_radius: f32) -> Result<(f64, f64), GridFitError> {
        let diameter = 2.0 * est_radius as f64;
        let min = diameter - self.below_diameter_px as f64;
        let max = diameter + self.above_diameter_px as f64;
        if self.samples == 0 || !(max > min) || max <= 0.0 {
            return Err(InvalidInput::EmptySpacingWindow {
                min: min as f32,
                max: max as f32,
            }
            .into());
        }
        Ok((min, (max - min) / self.samples as f64))
    }
}

/// Score of one candidate spacing: aggregated offsets of every circle center
/// to the lattice through `anchor` along both axes. Lower is better.
pub fn spacing_score(
    circles: &[DetectedCircle],
    anchor: (f32, f32),
    spacing: f32,
    objective: SpacingObjective,
) -> f64 {
    circles.iter().fold(0.0f64, |acc, c| {
        let dx = nearest_lattice_value_unchecked(anchor.0, c.x, spacing) as f64 - c.x as f64;
        let dy = nearest_lattice_value_unchecked(anchor.1, c.y, spacing) as f64 - c.y as f64;
        acc + objective.cost(dx) + objective.cost(dy)
    })
}

/// Search the intersection spacing with default [`SpacingSearchParams`].
pub fn search_best_spacing(
    circles: &[DetectedCircle],
    est_radius: f32,
) -> Result<f32, GridFitError> {
    search_best_spacing_with(circles, est_radius, &SpacingSearchParams::default())
}

/// Search the intersection spacing that best explains the circle centers.
///
/// The lattice anchor per axis is the smallest observed coordinate. Every
/// candidate in the window is scored with [`spacing_score`]; the first
/// candidate with the lowest score wins.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(circles, params), fields(n = circles.len()))
)]
pub fn search_best_spacing_with(
    circles: &[DetectedCircle],
    est_radius: f32,
    params: &SpacingSearchParams,
) -> Result<f32, GridFitError> {
    if circles.is_empty() {
        return Err(InvalidInput::EmptyCircles.into());
    }
    if !(est_radius.is_finite() && est_radius > 0.0) {
        return Err(InvalidInput::NonPositiveRadiusEstimate { radius: est_radius }.into());
    }
    if circles.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(InvalidInput::NonFiniteCoordinate.into());
    }

    let (min, step) = params.window(est_radius)?;
    let anchor = circles.iter().fold((f32::INFINITY, f32::INFINITY), |a, c| {
        (a.0.min(c.x), a.1.min(c.y))
    });

    let best = (0..params.samples)
        .map(|k| (min + k as f64 * step) as f32)
        .filter(|&bw| bw > 0.0)
        .map(|bw| (bw, spacing_score(circles, anchor, bw, params.objective)))
        .fold(None::<(f32, f64)>, |best, cand| match best {
            Some(b) if b.1 <= cand.1 => Some(b),
            _ => Some(cand),
        });

    let (spacing, score) = best.ok_or(InvalidInput::EmptySpacingWindow {
        min: min as f32,
        max: (min + step * params.samples as f64) as f32,
    })?;
    debug!(
        "best spacing {spacing:.3}px (score {score:.3}, objective {:?}, window {:.2}..{:.2})",
        params.objective,
        min,
        min + step * params.samples as f64
    );
    Ok(spacing)
}
