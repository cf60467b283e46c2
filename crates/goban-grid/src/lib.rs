//! Lattice fitting for 19×19 Go boards.
//!
//! Input is an unordered, noisy set of circle detections (candidate stones)
//! plus the cropped board image. The pipeline:
//! - estimates a robust stone radius from the detections ([`estimate_radius`]),
//! - searches the intersection spacing that best explains the detections
//!   along both axes ([`search_best_spacing`]),
//! - derives the lattice origin from the phase of the trusted detections,
//! - nudges every nominal intersection toward nearby detections and cuts one
//!   patch per intersection ([`GridFitter`]).
//!
//! Everything here is a pure function of its inputs: running the fitter twice
//! on the same image and circles gives identical results.

mod fitter;
mod io;
mod lattice;
mod overlay;
mod radius;
mod spacing;

pub use fitter::{
    CellEstimate, CellStatus, DegenerateGeometry, GridFitDiagnostics, GridFitError, GridFitParams,
    GridFitResult, GridFitter, InvalidInput,
};
pub use io::{load_circles_json, GridFitConfig, GridFitReport, GridIoError, PatchRecord};
pub use lattice::nearest_lattice_value;
pub use overlay::{draw_circle, render_overlay, OverlayStyle};
pub use radius::{estimate_radius, estimate_radius_with_tolerance, DEFAULT_RADIUS_TOLERANCE_PX};
pub use spacing::{
    search_best_spacing, search_best_spacing_with, spacing_score, SpacingObjective,
    SpacingSearchParams,
};

pub use goban_core::{DetectedCircle, ImageBuffer, ImageView, IntersectionEstimate, Lattice, Patch};
