//! JSON configuration and report helpers for grid fitting.

use std::{
    fs,
    path::{Path, PathBuf},
};

use goban_core::{DetectedCircle, Lattice, PixelBounds};
use serde::{Deserialize, Serialize};

use crate::{CellEstimate, GridFitError, GridFitParams, GridFitResult};

#[derive(thiserror::Error, Debug)]
pub enum GridIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_crop_margin() -> Option<usize> {
    Some(2)
}

/// Configuration of one grid-fitting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridFitConfig {
    pub image_path: String,
    /// JSON array of `{"x", "y", "radius"}` produced by a circle detector.
    pub circles_path: String,
    /// Directory that receives `patch_RR_CC.png` files.
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub overlay_path: Option<String>,
    /// White margin (pixels) kept when cropping the photo; `None` disables
    /// cropping.
    #[serde(default = "default_crop_margin")]
    pub crop_margin: Option<usize>,
    #[serde(default)]
    pub params: GridFitParams,
}

impl GridFitConfig {
    /// Minimal config for an image and its circle detections.
    pub fn new(image_path: impl Into<String>, circles_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            circles_path: circles_path.into(),
            output_dir: None,
            report_path: None,
            overlay_path: None,
            crop_margin: default_crop_margin(),
            params: GridFitParams::default(),
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, GridIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), GridIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read the circle detections referenced by this config.
    pub fn load_circles(&self) -> Result<Vec<DetectedCircle>, GridIoError> {
        load_circles_json(&self.circles_path)
    }

    /// Resolve the output report path.
    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("grid_fit_report.json"))
    }

    /// Resolve the patch output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("patches"))
    }
}

/// Read a JSON array of circle detections.
pub fn load_circles_json(path: impl AsRef<Path>) -> Result<Vec<DetectedCircle>, GridIoError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// One emitted patch as it appears in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub row: usize,
    pub col: usize,
    pub bounds: PixelBounds,
    #[serde(default)]
    pub file: Option<String>,
}

/// Summary of one run, written next to the patches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridFitReport {
    pub image_path: String,
    pub circles_path: String,
    pub image_width: usize,
    pub image_height: usize,
    pub num_circles: usize,
    /// Region of the source photo that was fitted, when it was cropped.
    #[serde(default)]
    pub crop: Option<PixelBounds>,
    #[serde(default)]
    pub estimated_radius: Option<f32>,
    #[serde(default)]
    pub lattice: Option<Lattice>,
    #[serde(default)]
    pub num_trusted: Option<usize>,
    #[serde(default)]
    pub cells: Vec<CellEstimate>,
    #[serde(default)]
    pub patches: Vec<PatchRecord>,
    #[serde(default)]
    pub overlay_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GridFitReport {
    /// Base report for an input image and its detections.
    pub fn new(
        cfg: &GridFitConfig,
        image_width: usize,
        image_height: usize,
        num_circles: usize,
    ) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            circles_path: cfg.circles_path.clone(),
            image_width,
            image_height,
            num_circles,
            crop: None,
            estimated_radius: None,
            lattice: None,
            num_trusted: None,
            cells: Vec::new(),
            patches: Vec::new(),
            overlay_path: None,
            error: None,
        }
    }

    /// Populate report fields from a successful fit.
    pub fn set_result(&mut self, res: &GridFitResult) {
        let diag = &res.diagnostics;
        self.estimated_radius = Some(diag.estimated_radius);
        self.lattice = Some(diag.lattice);
        self.num_trusted = Some(diag.num_trusted);
        self.cells = diag.cells.clone();
        self.patches = res
            .patches
            .iter()
            .map(|p| PatchRecord {
                row: p.row,
                col: p.col,
                bounds: p.bounds,
                file: None,
            })
            .collect();
        self.error = None;
    }

    /// Record a fitting error.
    pub fn set_error(&mut self, err: &GridFitError) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, GridIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), GridIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridFitter, InvalidInput};
    use goban_core::ImageBuffer;

    #[test]
    fn config_defaults_are_filled_in() {
        let cfg: GridFitConfig =
            serde_json::from_str(r#"{"image_path":"board.png","circles_path":"circles.json"}"#)
                .expect("minimal config");
        assert_eq!(cfg.crop_margin, Some(2));
        assert_eq!(cfg.params, GridFitParams::default());
        assert_eq!(cfg.report_path(), PathBuf::from("grid_fit_report.json"));
        assert_eq!(cfg.output_dir(), PathBuf::from("patches"));
    }

    #[test]
    fn config_and_circles_round_trip_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let circles_path = dir.path().join("circles.json");
        fs::write(
            &circles_path,
            r#"[{"x":10.0,"y":12.5,"radius":7.0},{"x":30.0,"y":12.0,"radius":7.5}]"#,
        )
        .expect("write circles");

        let cfg = GridFitConfig::new("board.png", circles_path.to_string_lossy());
        let cfg_path = dir.path().join("config.json");
        cfg.write_json(&cfg_path).expect("write config");
        let loaded = GridFitConfig::load_json(&cfg_path).expect("read config");
        let circles = loaded.load_circles().expect("read circles");
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[1], DetectedCircle::new(30.0, 12.0, 7.5));
    }

    #[test]
    fn report_captures_result_and_errors() {
        let img = ImageBuffer::filled(120, 120, 1, 255).expect("alloc");
        let circles = [DetectedCircle::new(20.0, 20.0, 15.0)];
        let res = GridFitter::default()
            .fit(&img.view(), &circles)
            .expect("fit");

        let cfg = GridFitConfig::new("board.png", "circles.json");
        let mut report = GridFitReport::new(&cfg, 120, 120, circles.len());
        report.set_result(&res);
        assert_eq!(report.patches.len(), res.patches.len());
        assert_eq!(report.cells.len(), 361);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        report.write_json(&path).expect("write report");
        let loaded = GridFitReport::load_json(&path).expect("read report");
        assert_eq!(loaded.patches, report.patches);
        assert_eq!(loaded.lattice, report.lattice);

        report.set_error(&GridFitError::from(InvalidInput::EmptyCircles));
        assert_eq!(report.error.as_deref(), Some("invalid input: no circles supplied"));
    }
}
