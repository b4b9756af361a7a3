mod common;

use assert_cmd::Command;
use common::{crater_scene, write_scene};
use craterfit::io::RunConfig;
use craterfit::report::DetectionReport;
use predicates::prelude::*;

fn craterfit() -> Command {
    Command::cargo_bin("craterfit").expect("binary built")
}

#[test]
fn prints_summary_and_writes_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let masks = dir.path().join("masks.json");
    let csv = dir.path().join("out.csv");
    write_scene(&masks, &crater_scene());

    craterfit()
        .arg(&masks)
        .arg("--csv")
        .arg(&csv)
        .args(["--log-level", "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1: center=(100.0,100.0) radius=50.0px"))
        .stdout(predicate::str::contains("2: center=(300.0,300.0) radius=60.0px"))
        .stdout(predicate::str::contains("final circles: 2"));

    let text = std::fs::read_to_string(&csv).expect("csv written");
    assert!(text.starts_with("id,x_px,y_px,radius_px,score\n"));
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn flags_override_filter_parameters() {
    let dir = tempfile::tempdir().expect("tempdir");
    let masks = dir.path().join("masks.json");
    write_scene(&masks, &crater_scene());

    craterfit()
        .current_dir(dir.path())
        .arg(&masks)
        .args(["--iou-dedup", "1.0", "--log-level", "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("final circles: 3"));

    // Default CSV location is relative to the working directory.
    assert!(dir.path().join("craters.csv").exists());
}

#[test]
fn run_config_supplies_paths_and_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let masks = dir.path().join("masks.json");
    let report = dir.path().join("report.json");
    write_scene(&masks, &crater_scene());

    let mut run = RunConfig {
        masks_path: Some(masks.display().to_string()),
        csv_path: Some(dir.path().join("c.csv").display().to_string()),
        report_path: Some(report.display().to_string()),
        ..RunConfig::default()
    };
    run.filter.min_radius = 55.0;
    let config = dir.path().join("run.json");
    run.write_json(&config).expect("write config");

    craterfit()
        .arg("--config")
        .arg(&config)
        .args(["--log-level", "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("final circles: 1"));

    let rep = DetectionReport::load_json(&report).expect("report written");
    assert_eq!(rep.circles.len(), 1);
    assert_eq!(rep.circles[0].mask_index, 2);
    assert_eq!(rep.config.min_radius, 55.0);
    assert_eq!(rep.stats.masks, 8);
}

#[test]
fn debug_level_shows_rejection_reasons() {
    let dir = tempfile::tempdir().expect("tempdir");
    let masks = dir.path().join("masks.json");
    write_scene(&masks, &crater_scene());

    craterfit()
        .current_dir(dir.path())
        .arg(&masks)
        .args(["--log-level", "debug"])
        .assert()
        .success()
        .stderr(predicate::str::contains("out of range"))
        .stderr(predicate::str::contains("below"));

    craterfit()
        .current_dir(dir.path())
        .arg(&masks)
        .args(["--log-level", "info"])
        .assert()
        .success()
        .stderr(predicate::str::contains("out of range").not());
}

#[test]
fn missing_masks_file_fails_as_input_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    craterfit()
        .current_dir(dir.path())
        .arg(dir.path().join("nope.json"))
        .args(["--log-level", "off"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input acquisition failed"));
}

#[test]
fn inverted_radius_range_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let masks = dir.path().join("masks.json");
    write_scene(&masks, &crater_scene());

    craterfit()
        .current_dir(dir.path())
        .arg(&masks)
        .args(["--min-radius", "200", "--max-radius", "100", "--log-level", "off"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("radius"));
}

#[test]
fn no_masks_argument_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    craterfit()
        .current_dir(dir.path())
        .args(["--log-level", "off"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no masks file given"));
}

#[cfg(feature = "image")]
#[test]
fn overlay_is_drawn_on_the_source_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let masks = dir.path().join("masks.json");
    let image = dir.path().join("scene.png");
    let overlay = dir.path().join("overlay.png");
    write_scene(&masks, &crater_scene());
    image::RgbImage::new(640, 480).save(&image).expect("write image");

    craterfit()
        .current_dir(dir.path())
        .arg(&masks)
        .arg("--image")
        .arg(&image)
        .arg("--overlay")
        .arg(&overlay)
        .args(["--log-level", "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("final circles: 2"));

    let drawn = image::open(&overlay).expect("overlay written").to_rgb8();
    assert_eq!(drawn.dimensions(), (640, 480));
    assert_eq!(*drawn.get_pixel(150, 100), image::Rgb([255, 0, 0]));
    assert_eq!(*drawn.get_pixel(300, 300), image::Rgb([255, 0, 0]));
    assert_eq!(*drawn.get_pixel(320, 300), image::Rgb([0, 0, 0]));
}
