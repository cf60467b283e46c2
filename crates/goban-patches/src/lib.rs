//! High-level facade crate for the `goban-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core types and the grid fitter,
//! - white-margin cropping of a board photo ([`crop_white_margin`]),
//! - (feature-gated) helpers that load a board image with the `image` crate,
//!   run the fitter and write patches, overlay and a JSON report.
//!
//! ## Quickstart
//!
//! ```no_run
//! use goban_patches::detect;
//! use goban_patches::grid::{load_circles_json, GridFitParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let board = detect::load_board_image("board.png", Some(2))?;
//! let circles = board.shift_circles(&load_circles_json("circles.json")?);
//! let result = detect::fit_board_image(&board.image, &circles, GridFitParams::default())?;
//! println!("patches: {}", result.patches.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `goban_patches::core`: data types (circles, lattice, patches, image buffers).
//! - `goban_patches::grid`: radius estimate, spacing search, grid fitter, overlay, JSON io.
//! - `goban_patches::detect` (feature `image`): end-to-end helpers on image files.

mod preprocess;

pub use goban_core as core;
pub use goban_grid as grid;

pub use goban_core::{DetectedCircle, ImageBuffer, ImageView, Lattice, Patch, PixelBounds};
pub use goban_grid::{GridFitError, GridFitParams, GridFitResult, GridFitter};
pub use preprocess::{crop_white_margin, white_margin_bounds, DEFAULT_WHITE_THRESHOLD};

#[cfg(feature = "image")]
pub mod detect;
