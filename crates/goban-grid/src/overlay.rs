//! Diagnostic overlay: detections and fitted intersections drawn on a copy of
//! the board image.

use goban_core::{DetectedCircle, ImageBuffer, ImageView, Rgb};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::fitter::GridFitDiagnostics;

/// Colors and stroke width of the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub circle_color: Rgb,
    pub intersection_color: Rgb,
    pub thickness: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            circle_color: Rgb::GREEN,
            intersection_color: Rgb::RED,
            thickness: 3.0,
        }
    }
}

/// Stroke a circle outline of the given thickness into `img`.
///
/// Pixels whose center lies within `thickness / 2` of the ideal circle are
/// painted; anything outside the image is ignored.
pub fn draw_circle(
    img: &mut ImageBuffer,
    center: Point2<f32>,
    radius: f32,
    color: Rgb,
    thickness: f32,
) {
    if !(radius.is_finite() && center.x.is_finite() && center.y.is_finite()) {
        return;
    }
    let half = (thickness.max(1.0)) * 0.5;
    let outer = radius + half;
    let x0 = (center.x - outer).floor().max(0.0) as i64;
    let y0 = (center.y - outer).floor().max(0.0) as i64;
    let x1 = ((center.x + outer).ceil() as i64).min(img.width as i64 - 1);
    let y1 = ((center.y + outer).ceil() as i64).min(img.height as i64 - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = ((x as f32 - center.x).powi(2) + (y as f32 - center.y).powi(2)).sqrt();
            if (d - radius).abs() <= half {
                img.put_rgb(x, y, color);
            }
        }
    }
}

/// Render the overlay for one fit: every retained intersection as a circle
/// of the patch half-width, then every detected circle on top.
pub fn render_overlay(
    image: &ImageView<'_>,
    circles: &[DetectedCircle],
    diagnostics: &GridFitDiagnostics,
    style: &OverlayStyle,
) -> ImageBuffer {
    let mut out = image.to_rgb();
    let r = diagnostics.patch_half_width as f32;
    for est in diagnostics.retained() {
        let c = Point2::new(est.refined.x as f32, est.refined.y as f32);
        draw_circle(&mut out, c, r, style.intersection_color, style.thickness);
    }
    for circle in circles {
        draw_circle(
            &mut out,
            circle.center(),
            circle.radius,
            style.circle_color,
            style.thickness,
        );
    }
    out
}
