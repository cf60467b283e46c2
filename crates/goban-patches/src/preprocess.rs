//! White-margin cropping of board photos.

use goban_core::{ImageBuffer, ImageView, PixelBounds};

/// Luma at or below this value counts as board content.
pub const DEFAULT_WHITE_THRESHOLD: u8 = 127;

#[inline]
fn luma(px: &[u8]) -> u8 {
    match px.len() {
        0 => 0,
        1 | 2 => px[0],
        _ => (0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32).round() as u8,
    }
}

/// Bounds of the board inside a white margin.
///
/// Pixels with luma `<= threshold` are content. The box starts `margin`
/// pixels before the first content row/column and spans the content plus
/// `2 * margin`, clipped to the image. `None` if the view is malformed or
/// has no content.
pub fn white_margin_bounds(
    image: &ImageView<'_>,
    threshold: u8,
    margin: usize,
) -> Option<PixelBounds> {
    image.validate().ok()?;

    let mut min_x = usize::MAX;
    let mut min_y = usize::MAX;
    let mut max_x = 0usize;
    let mut max_y = 0usize;
    let mut found = false;

    for y in 0..image.height {
        for x in 0..image.width {
            match image.pixel(x, y) {
                Some(px) if luma(px) <= threshold => {}
                _ => continue,
            }
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            found = true;
        }
    }
    if !found {
        return None;
    }

    let x_min = min_x.saturating_sub(margin);
    let y_min = min_y.saturating_sub(margin);
    let x_max = (x_min + (max_x - x_min) + 2 * margin).min(image.width);
    let y_max = (y_min + (max_y - y_min) + 2 * margin).min(image.height);
    Some(PixelBounds {
        x_min,
        x_max,
        y_min,
        y_max,
    })
}

/// Crop the white margin around a board photo.
///
/// Returns the cropped copy and its bounds in the source image, or `None`
/// when the image has no dark content at all.
pub fn crop_white_margin(
    image: &ImageView<'_>,
    threshold: u8,
    margin: usize,
) -> Option<(ImageBuffer, PixelBounds)> {
    let b = white_margin_bounds(image, threshold, margin)?;
    let cropped = image.crop(b.x_min, b.x_max, b.y_min, b.y_max)?;
    Some((cropped, b))
}
