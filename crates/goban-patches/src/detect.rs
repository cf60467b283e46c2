use std::{fs, path::Path};

use crate::core::{DetectedCircle, ImageBuffer, ImageView, PixelBounds};
use crate::grid::{
    GridFitConfig, GridFitError, GridFitParams, GridFitReport, GridFitResult, GridFitter,
    GridIoError, PatchRecord,
};
use crate::{crop_white_margin, DEFAULT_WHITE_THRESHOLD};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Fit(#[from] GridFitError),

    #[error(transparent)]
    Io(#[from] GridIoError),

    #[error(transparent)]
    File(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] ::image::ImageError),

    #[error(transparent)]
    Buffer(#[from] crate::core::ImageError),

    #[error("cannot convert {width}x{height} buffer into an RGB image")]
    RgbConversion { width: usize, height: usize },
}

/// A loaded board photo, possibly cropped to its white margin.
#[derive(Clone, Debug)]
pub struct BoardImage {
    /// RGB pixels handed to the fitter.
    pub image: ImageBuffer,
    pub source_width: usize,
    pub source_height: usize,
    /// Region of the source photo kept by cropping.
    pub crop: Option<PixelBounds>,
}

impl BoardImage {
    /// Move detections from source-photo coordinates into `image` coordinates.
    pub fn shift_circles(&self, circles: &[DetectedCircle]) -> Vec<DetectedCircle> {
        let Some(b) = self.crop else {
            return circles.to_vec();
        };
        circles
            .iter()
            .map(|c| DetectedCircle::new(c.x - b.x_min as f32, c.y - b.y_min as f32, c.radius))
            .collect()
    }
}

/// Convert an `image::RgbImage` into the lightweight `goban-core` view type.
pub fn rgb_view(img: &::image::RgbImage) -> ImageView<'_> {
    ImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 3,
        data: img.as_raw(),
    }
}

/// Convert a `goban-core` buffer into an `image::RgbImage`.
pub fn to_rgb_image(buf: &ImageBuffer) -> Result<::image::RgbImage, DetectError> {
    buf.view().validate()?;
    let rgb = buf.view().to_rgb();
    ::image::RgbImage::from_raw(rgb.width as u32, rgb.height as u32, rgb.data).ok_or(
        DetectError::RgbConversion {
            width: buf.width,
            height: buf.height,
        },
    )
}

/// Load a board photo as RGB, cropping the white margin when `crop_margin`
/// is set.
///
/// A photo without dark content is kept whole.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))
)]
pub fn load_board_image(
    path: impl AsRef<Path>,
    crop_margin: Option<usize>,
) -> Result<BoardImage, DetectError> {
    let rgb = ::image::open(path.as_ref())?.to_rgb8();
    let view = rgb_view(&rgb);
    view.validate()?;
    let (width, height) = (view.width, view.height);

    let cropped = match crop_margin {
        Some(margin) => {
            let c = crop_white_margin(&view, DEFAULT_WHITE_THRESHOLD, margin);
            if c.is_none() {
                log::warn!(
                    "no board content in {}, using the full image",
                    path.as_ref().display()
                );
            }
            c
        }
        None => None,
    };

    let (image, crop) = match cropped {
        Some((image, bounds)) => {
            log::debug!(
                "cropped to x {}..{}, y {}..{}",
                bounds.x_min,
                bounds.x_max,
                bounds.y_min,
                bounds.y_max
            );
            (image, Some(bounds))
        }
        None => (
            ImageBuffer::from_raw(width, height, 3, rgb.into_raw())?,
            None,
        ),
    };

    Ok(BoardImage {
        source_width: width,
        source_height: height,
        image,
        crop,
    })
}

/// Run the grid fitter on a loaded board image.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(image, circles, params),
        fields(width = image.width, height = image.height, circles = circles.len())
    )
)]
pub fn fit_board_image(
    image: &ImageBuffer,
    circles: &[DetectedCircle],
    params: GridFitParams,
) -> Result<GridFitResult, DetectError> {
    Ok(GridFitter::new(params).fit(&image.view(), circles)?)
}

/// File name of the patch at `(row, col)`.
pub fn patch_file_name(row: usize, col: usize) -> String {
    format!("patch_{row:02}_{col:02}.png")
}

/// Write every patch of `result` into `dir` as PNG.
pub fn save_patches(
    result: &GridFitResult,
    dir: impl AsRef<Path>,
) -> Result<Vec<PatchRecord>, DetectError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    result
        .patches
        .iter()
        .map(|p| -> Result<PatchRecord, DetectError> {
            let name = patch_file_name(p.row, p.col);
            to_rgb_image(&p.image)?.save(dir.join(&name))?;
            Ok(PatchRecord {
                row: p.row,
                col: p.col,
                bounds: p.bounds,
                file: Some(name),
            })
        })
        .collect()
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Run a full configuration: load, crop, fit, then write patches, the
/// optional overlay and the JSON report.
///
/// A failed fit still writes a report carrying the error message.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(cfg), fields(image = %cfg.image_path))
)]
pub fn run_config(cfg: &GridFitConfig) -> Result<GridFitReport, DetectError> {
    let board = load_board_image(&cfg.image_path, cfg.crop_margin)?;
    let circles = board.shift_circles(&cfg.load_circles()?);

    let mut report = GridFitReport::new(cfg, board.source_width, board.source_height, circles.len());
    report.crop = board.crop;

    let mut params = cfg.params.clone();
    params.render_overlay |= cfg.overlay_path.is_some();

    let report_path = cfg.report_path();
    ensure_parent(&report_path)?;

    let result = match fit_board_image(&board.image, &circles, params) {
        Ok(result) => result,
        Err(DetectError::Fit(err)) => {
            log::warn!("grid fit failed: {err}");
            report.set_error(&err);
            report.write_json(&report_path)?;
            return Err(err.into());
        }
        Err(err) => return Err(err),
    };

    report.set_result(&result);
    report.patches = save_patches(&result, cfg.output_dir())?;

    if let (Some(path), Some(overlay)) = (&cfg.overlay_path, &result.overlay) {
        let path = Path::new(path);
        ensure_parent(path)?;
        to_rgb_image(overlay)?.save(path)?;
        report.overlay_path = Some(path.display().to_string());
    }

    report.write_json(&report_path)?;
    log::info!(
        "wrote {} patches to {}",
        report.patches.len(),
        cfg.output_dir().display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn shift_moves_circles_by_crop_origin() {
        let board = BoardImage {
            image: ImageBuffer::filled(10, 10, 3, 0).expect("alloc"),
            source_width: 30,
            source_height: 30,
            crop: Some(PixelBounds {
                x_min: 5,
                x_max: 15,
                y_min: 8,
                y_max: 18,
            }),
        };
        let shifted = board.shift_circles(&[DetectedCircle::new(10.0, 10.0, 4.0)]);
        assert_relative_eq!(shifted[0].x, 5.0);
        assert_relative_eq!(shifted[0].y, 2.0);
        assert_relative_eq!(shifted[0].radius, 4.0);
    }

    #[test]
    fn gray_buffers_convert_to_rgb_images() {
        let buf = ImageBuffer::from_raw(2, 1, 1, vec![10, 200]).expect("buffer");
        let rgb = to_rgb_image(&buf).expect("convert");
        assert_eq!(rgb.dimensions(), (2, 1));
        assert_eq!(rgb.get_pixel(1, 0).0, [200, 200, 200]);
    }

    #[test]
    fn patch_names_are_zero_padded() {
        assert_eq!(patch_file_name(3, 17), "patch_03_17.png");
    }

    #[test]
    fn load_crops_white_margin_unless_disabled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.png");
        let mut img = ::image::RgbImage::from_pixel(60, 50, ::image::Rgb([255, 255, 255]));
        for y in 10..40 {
            for x in 20..45 {
                img.put_pixel(x, y, ::image::Rgb([60, 40, 20]));
            }
        }
        img.save(&path).expect("save png");

        let board = load_board_image(&path, Some(2)).expect("load");
        let crop = board.crop.expect("cropped");
        assert_eq!((crop.x_min, crop.y_min), (18, 8));
        assert_eq!((board.image.width, board.image.height), (crop.width(), crop.height()));
        assert_eq!((board.source_width, board.source_height), (60, 50));

        let whole = load_board_image(&path, None).expect("load whole");
        assert!(whole.crop.is_none());
        assert_eq!((whole.image.width, whole.image.height), (60, 50));
    }

    #[test]
    fn save_patches_writes_one_png_per_patch() {
        let img = ImageBuffer::filled(100, 100, 1, 90).expect("alloc");
        let circles = [DetectedCircle::new(20.0, 20.0, 15.0)];
        let result = fit_board_image(&img, &circles, GridFitParams::default()).expect("fit");
        assert!(!result.patches.is_empty());

        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("nested").join("patches");
        let records = save_patches(&result, &out).expect("save");

        assert_eq!(records.len(), result.patches.len());
        for (record, patch) in records.iter().zip(&result.patches) {
            assert_eq!((record.row, record.col), (patch.row, patch.col));
            assert_eq!(record.bounds, patch.bounds);
            let name = record.file.as_deref().expect("file name");
            assert_eq!(name, patch_file_name(patch.row, patch.col));
            let saved = ::image::open(out.join(name)).expect("readable png").to_rgb8();
            assert_eq!(
                saved.dimensions(),
                (patch.bounds.width() as u32, patch.bounds.height() as u32)
            );
            assert_eq!(saved.get_pixel(0, 0).0, [90, 90, 90]);
        }
    }
}
