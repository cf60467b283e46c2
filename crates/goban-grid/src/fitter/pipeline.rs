use goban_core::{DetectedCircle, ImageView, IntersectionEstimate, Patch, BOARD_SIZE};
use log::{debug, warn};

use super::refine::{crop_bounds, estimate_lattice, refine_center, trusted_points};
use super::{
    CellEstimate, CellStatus, GridFitDiagnostics, GridFitError, GridFitParams, GridFitResult,
    InvalidInput,
};
use crate::overlay::{render_overlay, OverlayStyle};
use crate::radius::estimate_radius_with_tolerance;
use crate::spacing::search_best_spacing_with;

/// Lattice fitter for a single 19×19 board image.
#[derive(Clone, Debug, Default)]
pub struct GridFitter {
    params: GridFitParams,
}

impl GridFitter {
    /// Create a fitter with the given parameters.
    pub fn new(params: GridFitParams) -> Self {
        Self { params }
    }

    /// Fitter parameters.
    #[inline]
    pub fn params(&self) -> &GridFitParams {
        &self.params
    }

    /// Fit the board lattice to `circles` and cut one patch per intersection.
    ///
    /// Patches come out row-major (row outer, column inner). Intersections
    /// whose refined center overshoots the image, or whose clipped crop is
    /// empty, are skipped and only reported in the diagnostics.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "info",
            skip(self, image, circles),
            fields(width = image.width, height = image.height, circles = circles.len())
        )
    )]
    pub fn fit(
        &self,
        image: &ImageView<'_>,
        circles: &[DetectedCircle],
    ) -> Result<GridFitResult, GridFitError> {
        self.params.validate()?;
        image.validate()?;
        if circles.is_empty() {
            return Err(InvalidInput::EmptyCircles.into());
        }

        let tolerance = self.params.radius_tolerance_px;
        let radius = estimate_radius_with_tolerance(circles, tolerance)?;
        let spacing = search_best_spacing_with(circles, radius, &self.params.spacing)?;

        let trusted = trusted_points(circles, radius, tolerance);
        let lattice = estimate_lattice(&trusted, spacing, radius, tolerance)?;
        debug!(
            "lattice origin ({:.2}, {:.2}), spacing {:.3}px, {}/{} trusted circles",
            lattice.origin().x,
            lattice.origin().y,
            spacing,
            trusted.len(),
            circles.len()
        );

        let half = (spacing / 2.0) as usize;
        let x_limit = image.width as i64 + self.params.border_overshoot_px as i64;
        let y_limit = image.height as i64 + self.params.border_overshoot_px as i64;

        let mut cells = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        let mut patches = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let nominal = lattice.point(row, col);
                let refined = refine_center(nominal, &trusted, spacing, self.params.momentum);
                let estimate = IntersectionEstimate {
                    row,
                    col,
                    nominal,
                    refined,
                };

                let status = if refined.x as i64 >= x_limit || refined.y as i64 >= y_limit {
                    debug!("cell ({row}, {col}) at {refined:?} is beyond the image border");
                    CellStatus::BeyondBorder
                } else {
                    match crop_bounds(refined, half, image.width, image.height)
                        .and_then(|b| Some((b, image.crop(b.x_min, b.x_max, b.y_min, b.y_max)?)))
                    {
                        Some((bounds, data)) => {
                            patches.push(Patch {
                                row,
                                col,
                                bounds,
                                image: data,
                            });
                            CellStatus::Retained
                        }
                        None => {
                            warn!("cell ({row}, {col}) at {refined:?} has an empty crop");
                            CellStatus::EmptyCrop
                        }
                    }
                };
                cells.push(CellEstimate { estimate, status });
            }
        }

        if patches.len() < BOARD_SIZE * BOARD_SIZE {
            debug!(
                "{} of {} intersections dropped at the image border",
                BOARD_SIZE * BOARD_SIZE - patches.len(),
                BOARD_SIZE * BOARD_SIZE
            );
        }

        let diagnostics = GridFitDiagnostics {
            num_circles: circles.len(),
            estimated_radius: radius,
            lattice,
            num_trusted: trusted.len(),
            patch_half_width: half,
            cells,
        };

        let overlay = self
            .params
            .render_overlay
            .then(|| render_overlay(image, circles, &diagnostics, &OverlayStyle::default()));

        Ok(GridFitResult {
            patches,
            diagnostics,
            overlay,
        })
    }
}
