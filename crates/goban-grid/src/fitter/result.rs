use goban_core::{ImageBuffer, IntersectionEstimate, Lattice, Patch};
use serde::{Deserialize, Serialize};

/// What happened to one intersection after refinement.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// A patch was emitted.
    Retained,
    /// Refined center overshoots the image by more than the border margin.
    BeyondBorder,
    /// The clipped crop around the refined center is empty.
    EmptyCrop,
}

/// Fitted intersection plus its outcome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellEstimate {
    pub estimate: IntersectionEstimate,
    pub status: CellStatus,
}

/// Intermediate numbers of one fit, for reports and debugging.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridFitDiagnostics {
    pub num_circles: usize,
    pub estimated_radius: f32,
    pub lattice: Lattice,
    pub num_trusted: usize,
    /// Half-width of every patch crop, in pixels.
    pub patch_half_width: usize,
    /// All 361 intersections in row-major order, including dropped ones.
    pub cells: Vec<CellEstimate>,
}

impl GridFitDiagnostics {
    /// Intersections that produced a patch.
    pub fn retained(&self) -> impl Iterator<Item = &IntersectionEstimate> {
        self.cells
            .iter()
            .filter(|c| c.status == CellStatus::Retained)
            .map(|c| &c.estimate)
    }
}

/// Output of one fit.
#[derive(Clone, Debug)]
pub struct GridFitResult {
    /// Patches in row-major order (row outer, column inner). Dropped cells
    /// leave gaps; indices are not contiguous in general.
    pub patches: Vec<Patch>,
    pub diagnostics: GridFitDiagnostics,
    /// Present when [`crate::GridFitParams::render_overlay`] is set.
    pub overlay: Option<ImageBuffer>,
}

impl GridFitResult {
    /// Patch at `(row, col)`, if it was emitted.
    pub fn patch(&self, row: usize, col: usize) -> Option<&Patch> {
        self.patches.iter().find(|p| p.row == row && p.col == col)
    }
}
