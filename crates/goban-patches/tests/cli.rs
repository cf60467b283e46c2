#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use goban_patches::grid::GridFitReport;
use predicates::prelude::*;

const SPACING: u32 = 20;
const ORIGIN: u32 = 20;
const RADIUS: f32 = 9.0;

/// Brown board with black lines on a white sheet, and one circle per
/// intersection in photo coordinates.
fn write_board(dir: &Path) -> (PathBuf, PathBuf) {
    let size = 2 * ORIGIN + 18 * SPACING;
    let mut img = image::RgbImage::from_pixel(size + 40, size + 40, image::Rgb([255, 255, 255]));
    for y in 5..size - 5 {
        for x in 5..size - 5 {
            let on_line = (x >= ORIGIN && (x - ORIGIN) % SPACING == 0)
                || (y >= ORIGIN && (y - ORIGIN) % SPACING == 0);
            let px = if on_line { [10, 10, 10] } else { [120, 90, 40] };
            img.put_pixel(x, y, image::Rgb(px));
        }
    }
    let image_path = dir.join("board.png");
    img.save(&image_path).expect("save board");

    let circles: Vec<_> = (0..19u32)
        .flat_map(|row| (0..19u32).map(move |col| (row, col)))
        .map(|(row, col)| {
            serde_json::json!({
                "x": (ORIGIN + col * SPACING) as f32,
                "y": (ORIGIN + row * SPACING) as f32,
                "radius": RADIUS,
            })
        })
        .collect();
    let circles_path = dir.join("circles.json");
    std::fs::write(&circles_path, serde_json::to_string(&circles).expect("json"))
        .expect("write circles");
    (image_path, circles_path)
}

fn bin() -> Command {
    Command::cargo_bin("goban-patches").expect("binary built")
}

#[test]
fn writes_patches_overlay_and_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (image_path, circles_path) = write_board(dir.path());
    let out_dir = dir.path().join("out");
    let report_path = dir.path().join("report.json");
    let overlay_path = dir.path().join("overlay.png");

    bin()
        .arg("--image")
        .arg(&image_path)
        .arg("--circles")
        .arg(&circles_path)
        .arg("--out-dir")
        .arg(&out_dir)
        .arg("--report")
        .arg(&report_path)
        .arg("--overlay")
        .arg(&overlay_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("361 patches"));

    assert!(out_dir.join("patch_00_00.png").is_file());
    assert!(out_dir.join("patch_18_18.png").is_file());
    assert!(overlay_path.is_file());

    let report = GridFitReport::load_json(&report_path).expect("report");
    assert!(report.error.is_none());
    assert_eq!(report.patches.len(), 361);
    assert_eq!(report.patches[20].file.as_deref(), Some("patch_01_01.png"));
    let crop = report.crop.expect("white margin cropped");
    assert_eq!((crop.x_min, crop.y_min), (3, 3));
    let spacing = report.lattice.expect("lattice").spacing();
    assert!((spacing - SPACING as f32).abs() < 0.1, "spacing {spacing}");
}

#[test]
fn accepts_a_json_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (image_path, circles_path) = write_board(dir.path());
    let out_dir = dir.path().join("patches");
    let report_path = dir.path().join("grid.json");
    let cfg = serde_json::json!({
        "image_path": image_path,
        "circles_path": circles_path,
        "output_dir": out_dir,
        "report_path": report_path,
        "crop_margin": null,
        "params": { "momentum": 0.9 },
    });
    let cfg_path = dir.path().join("config.json");
    std::fs::write(&cfg_path, cfg.to_string()).expect("write config");

    bin().arg("--config").arg(&cfg_path).assert().success();

    let report = GridFitReport::load_json(&report_path).expect("report");
    assert!(report.crop.is_none());
    assert_eq!(report.patches.len(), 361);
    assert!(out_dir.join("patch_09_09.png").is_file());
}

#[test]
fn empty_detections_fail_with_a_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (image_path, _) = write_board(dir.path());
    let circles_path = dir.path().join("none.json");
    std::fs::write(&circles_path, "[]").expect("write circles");
    let report_path = dir.path().join("report.json");

    bin()
        .arg("--image")
        .arg(&image_path)
        .arg("--circles")
        .arg(&circles_path)
        .arg("--report")
        .arg(&report_path)
        .arg("--out-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no circles supplied"));

    let report = GridFitReport::load_json(&report_path).expect("report");
    assert_eq!(report.num_circles, 0);
    assert!(report.error.is_some());
    assert!(report.patches.is_empty());
}

#[test]
fn requires_image_and_circles_without_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (image_path, _) = write_board(dir.path());
    bin().arg("--image").arg(&image_path).assert().failure();
}
