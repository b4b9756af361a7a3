//! Run outputs: CSV table, JSON report and the stdout summary.

use craterfit_core::ImageSize;
use craterfit_filter::{CircleCandidate, CraterDetection, FilterConfig, FilterStats};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub const CSV_HEADER: &str = "id,x_px,y_px,radius_px,score";

/// Write the final circles as CSV rows with 1-based ids.
pub fn write_csv<W: Write>(mut out: W, circles: &[CircleCandidate]) -> io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for (i, c) in circles.iter().enumerate() {
        writeln!(
            out,
            "{},{:.2},{:.2},{:.2},{:.4}",
            i + 1,
            c.x(),
            c.y(),
            c.r(),
            c.score
        )?;
    }
    out.flush()
}

pub fn write_csv_file(
    path: impl AsRef<Path>,
    circles: &[CircleCandidate],
) -> Result<(), ReportError> {
    let file = fs::File::create(path)?;
    write_csv(BufWriter::new(file), circles)?;
    Ok(())
}

/// One human-readable line per circle, as printed by the CLI.
pub fn summary_lines(circles: &[CircleCandidate]) -> Vec<String> {
    circles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}: center=({:.1},{:.1}) radius={:.1}px score={:.3}",
                i + 1,
                c.x(),
                c.y(),
                c.r(),
                c.score
            )
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportCircle {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub score: f64,
    pub circularity: f64,
    pub mask_index: usize,
}

/// Serializable summary of one run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionReport {
    pub masks_path: Option<String>,
    pub image_path: Option<String>,
    pub image: ImageSize,
    pub config: FilterConfig,
    pub stats: FilterStats,
    pub circles: Vec<ReportCircle>,
}

impl DetectionReport {
    pub fn new(
        detection: &CraterDetection,
        config: &FilterConfig,
        masks_path: Option<String>,
        image_path: Option<String>,
    ) -> Self {
        let circles = detection
            .circles
            .iter()
            .enumerate()
            .map(|(i, c)| ReportCircle {
                id: i + 1,
                x: c.x(),
                y: c.y(),
                radius: c.r(),
                score: c.score,
                circularity: c.circularity,
                mask_index: c.mask_index,
            })
            .collect();
        Self {
            masks_path,
            image_path,
            image: detection.image,
            config: config.clone(),
            stats: detection.stats.clone(),
            circles,
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craterfit_core::Circle;

    fn sample() -> Vec<CircleCandidate> {
        vec![
            CircleCandidate {
                circle: Circle::new(100.0, 100.0, 50.0),
                score: 1.75,
                circularity: 0.98,
                mask_index: 3,
            },
            CircleCandidate {
                circle: Circle::new(300.257, 299.994, 60.007),
                score: 0.123456,
                circularity: 0.7,
                mask_index: 0,
            },
        ]
    }

    #[test]
    fn csv_has_header_and_rounded_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample()).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "id,x_px,y_px,radius_px,score",
                "1,100.00,100.00,50.00,1.7500",
                "2,300.26,299.99,60.01,0.1235",
            ]
        );
    }

    #[test]
    fn csv_for_no_circles_is_header_only() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "id,x_px,y_px,radius_px,score\n");
    }

    #[test]
    fn summary_uses_one_decimal() {
        let lines = summary_lines(&sample());
        assert_eq!(lines[0], "1: center=(100.0,100.0) radius=50.0px score=1.750");
        assert_eq!(lines[1], "2: center=(300.3,300.0) radius=60.0px score=0.123");
    }

    #[test]
    fn report_numbers_circles_and_keeps_mask_indices() {
        let det = CraterDetection {
            image: ImageSize::new(640, 480),
            circles: sample(),
            stats: FilterStats::default(),
        };
        let report = DetectionReport::new(&det, &FilterConfig::default(), None, None);
        assert_eq!(report.circles[0].id, 1);
        assert_eq!(report.circles[0].mask_index, 3);
        assert_eq!(report.circles[1].id, 2);

        let json = serde_json::to_string(&report).expect("serialize");
        let back: DetectionReport = serde_json::from_str(&json).expect("parse");
        assert_eq!(back.image, report.image);
        let ids: Vec<(usize, usize)> = back.circles.iter().map(|c| (c.id, c.mask_index)).collect();
        assert_eq!(ids, vec![(1, 3), (2, 0)]);
    }
}
