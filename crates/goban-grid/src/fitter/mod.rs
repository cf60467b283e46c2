//! Grid fitting pipeline.
//!
//! This module wires together radius estimation, spacing search, origin
//! estimation, per-intersection refinement and patch extraction.

mod error;
mod params;
mod pipeline;
mod refine;
mod result;

pub use error::{DegenerateGeometry, GridFitError, InvalidInput};
pub use params::GridFitParams;
pub use pipeline::GridFitter;
pub use result::{CellEstimate, CellStatus, GridFitDiagnostics, GridFitResult};
