#![allow(dead_code)]

use craterfit::core::Contour;
use craterfit::io::{MaskRecord, MaskSet, RleMask};
use nalgebra::Point2;
use std::path::Path;

pub fn polygon_disk(cx: f64, cy: f64, r: f64) -> Contour {
    Contour::new(
        (0..96)
            .map(|k| {
                let t = k as f64 / 96.0 * std::f64::consts::TAU;
                Point2::new(cx + r * t.cos(), cy + r * t.sin())
            })
            .collect(),
    )
}

pub fn rectangle(x0: f64, y0: f64, w: f64, h: f64) -> Contour {
    Contour::new(vec![
        Point2::new(x0, y0),
        Point2::new(x0 + w, y0),
        Point2::new(x0 + w, y0 + h),
        Point2::new(x0, y0 + h),
    ])
}

pub fn record(contours: Vec<Contour>, area: u32, stability: f32, predicted_iou: f32) -> MaskRecord {
    MaskRecord {
        area,
        stability_score: stability,
        predicted_iou,
        contours,
        segmentation: None,
    }
}

/// Mask carried only as an RLE disk, as a segmentation model would emit it.
pub fn rle_disk(width: u32, height: u32, cx: f64, cy: f64, r: f64) -> MaskRecord {
    let segmentation = RleMask::from_fn(width, height, |x, y| {
        (f64::from(x) - cx).hypot(f64::from(y) - cy) <= r
    });
    let area = segmentation.counts.iter().skip(1).step_by(2).sum();
    MaskRecord {
        area,
        stability_score: 0.95,
        predicted_iou: 0.9,
        contours: Vec::new(),
        segmentation: Some(segmentation),
    }
}

/// 640x480 scene: two kept craters, one duplicate and one mask per rejection reason.
pub fn crater_scene() -> MaskSet {
    MaskSet {
        width: 640,
        height: 480,
        masks: vec![
            record(vec![polygon_disk(100.0, 100.0, 50.0)], 7_800, 0.98, 0.95),
            record(vec![polygon_disk(105.0, 102.0, 48.0)], 7_200, 0.90, 0.90),
            record(vec![polygon_disk(300.0, 300.0, 60.0)], 11_000, 0.95, 0.90),
            record(vec![polygon_disk(450.0, 300.0, 50.0)], 500, 0.99, 0.99),
            record(vec![rectangle(400.0, 100.0, 200.0, 20.0)], 4_000, 0.99, 0.99),
            record(vec![polygon_disk(20.0, 240.0, 45.0)], 6_000, 0.99, 0.99),
            record(vec![polygon_disk(500.0, 200.0, 30.0)], 2_800, 0.99, 0.99),
            record(Vec::new(), 3_000, 0.99, 0.99),
        ],
    }
}

pub fn write_scene(path: &Path, set: &MaskSet) {
    let json = serde_json::to_string_pretty(set).expect("serialize scene");
    std::fs::write(path, json).expect("write scene");
}
