use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::image::ImageBuffer;

/// Number of lines per axis on a full-size Go board.
pub const BOARD_SIZE: usize = 19;

/// One circle candidate produced by an external blob/circle detector.
///
/// `x` grows along image columns, `y` along image rows, both in source-image
/// pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedCircle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl DetectedCircle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    #[inline]
    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }
}

/// Infinite square lattice `origin + (col, row) * spacing`.
///
/// The spacing is always finite and strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLattice")]
pub struct Lattice {
    origin: Point2<f32>,
    spacing: f32,
}

#[derive(Deserialize)]
struct RawLattice {
    origin: Point2<f32>,
    spacing: f32,
}

impl TryFrom<RawLattice> for Lattice {
    type Error = String;

    fn try_from(raw: RawLattice) -> Result<Self, Self::Error> {
        Lattice::new(raw.origin, raw.spacing)
            .ok_or_else(|| format!("lattice spacing must be positive, got {}", raw.spacing))
    }
}

impl Lattice {
    /// Build a lattice; `None` if the spacing is not finite and positive.
    pub fn new(origin: Point2<f32>, spacing: f32) -> Option<Self> {
        (spacing.is_finite() && spacing > 0.0).then_some(Self { origin, spacing })
    }

    #[inline]
    pub fn origin(&self) -> Point2<f32> {
        self.origin
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Nominal pixel position of the intersection at `(row, col)`.
    ///
    /// Rows advance along `y`, columns along `x`.
    #[inline]
    pub fn point(&self, row: usize, col: usize) -> Point2<f32> {
        Point2::new(
            self.origin.x + col as f32 * self.spacing,
            self.origin.y + row as f32 * self.spacing,
        )
    }
}

/// Fitted position of one board intersection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEstimate {
    pub row: usize,
    pub col: usize,
    /// Position predicted by the lattice alone.
    pub nominal: Point2<f32>,
    /// Nominal position nudged toward trusted detections, truncated to pixels.
    pub refined: Point2<i32>,
}

/// Half-open pixel rectangle `x_min..x_max`, `y_min..y_max`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PixelBounds {
    pub x_min: usize,
    pub x_max: usize,
    pub y_min: usize,
    pub y_max: usize,
}

impl PixelBounds {
    #[inline]
    pub fn width(&self) -> usize {
        self.x_max.saturating_sub(self.x_min)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y_max.saturating_sub(self.y_min)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Geometric center of the rectangle.
    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            0.5 * (self.x_min + self.x_max) as f32,
            0.5 * (self.y_min + self.y_max) as f32,
        )
    }
}

/// Image region around one board intersection.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    pub row: usize,
    pub col: usize,
    pub bounds: PixelBounds,
    pub image: ImageBuffer,
}
