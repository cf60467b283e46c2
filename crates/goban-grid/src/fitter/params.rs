use serde::{Deserialize, Serialize};

use super::InvalidInput;
use crate::radius::DEFAULT_RADIUS_TOLERANCE_PX;
use crate::spacing::SpacingSearchParams;

/// Configuration for the grid fitter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridFitParams {
    /// Radius band (pixels) used both for the radius estimate and for
    /// selecting trusted circles.
    pub radius_tolerance_px: f32,
    /// Spacing candidate window and objective.
    pub spacing: SpacingSearchParams,
    /// Weight of the nominal lattice position when refining an intersection.
    ///
    /// `1.0` disables refinement, `0.0` snaps fully to the detections.
    pub momentum: f32,
    /// Refined centers at or beyond `image_size + border_overshoot_px` are
    /// dropped.
    pub border_overshoot_px: i32,
    /// Render the diagnostic overlay into the result.
    pub render_overlay: bool,
}

impl Default for GridFitParams {
    fn default() -> Self {
        Self {
            radius_tolerance_px: DEFAULT_RADIUS_TOLERANCE_PX,
            spacing: SpacingSearchParams::default(),
            momentum: 0.99,
            border_overshoot_px: 3,
            render_overlay: false,
        }
    }
}

impl GridFitParams {
    pub(crate) fn validate(&self) -> Result<(), InvalidInput> {
        if !(self.radius_tolerance_px.is_finite() && self.radius_tolerance_px >= 0.0) {
            return Err(InvalidInput::Parameter {
                name: "radius_tolerance_px",
                value: self.radius_tolerance_px,
            });
        }
        if !(0.0..=1.0).contains(&self.momentum) {
            return Err(InvalidInput::Parameter {
                name: "momentum",
                value: self.momentum,
            });
        }
        Ok(())
    }
}
