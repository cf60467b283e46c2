use goban_core::ImageError;

/// Errors returned by the grid fitter.
///
/// Both variants abort the whole fit; per-cell out-of-bounds skips are not
/// errors and show up in [`crate::GridFitDiagnostics`] instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridFitError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(#[from] DegenerateGeometry),
}

/// Inputs the fitter cannot work with.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("no circles supplied")]
    EmptyCircles,
    #[error("circle {index} has an invalid radius ({radius})")]
    InvalidRadius { index: usize, radius: f32 },
    #[error("circle coordinates must be finite")]
    NonFiniteCoordinate,
    #[error("lattice interval must be finite and positive (got {interval})")]
    NonPositiveInterval { interval: f32 },
    #[error("radius estimate must be finite and positive (got {radius})")]
    NonPositiveRadiusEstimate { radius: f32 },
    #[error("spacing search window [{min}, {max}) has no positive candidate")]
    EmptySpacingWindow { min: f32, max: f32 },
    #[error("parameter `{name}` out of range ({value})")]
    Parameter { name: &'static str, value: f32 },
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Inputs that are well-formed but do not pin down a lattice.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DegenerateGeometry {
    #[error("no circle radius within {tolerance}px of the modal radius {mode}px")]
    NoCirclesNearModalRadius { mode: f32, tolerance: f32 },
    #[error("no trusted circles within {tolerance}px of the estimated radius {radius:.2}px")]
    NoTrustedPoints { radius: f32, tolerance: f32 },
}

impl From<ImageError> for GridFitError {
    fn from(err: ImageError) -> Self {
        GridFitError::InvalidInput(InvalidInput::Image(err))
    }
}
