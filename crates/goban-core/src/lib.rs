//! Core types and utilities for Go board grid fitting.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete circle detector or image crate: images are plain
//! interleaved 8-bit buffers described by [`ImageView`] / [`ImageBuffer`].

mod image;
mod logger;
mod types;

pub use image::{ImageBuffer, ImageError, ImageView, Rgb};
pub use types::{DetectedCircle, IntersectionEstimate, Lattice, Patch, PixelBounds, BOARD_SIZE};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
