//! High-level facade for the `craterfit-*` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry core and the filtering engine
//! - JSON input/config loading ([`io`]) and CSV / JSON reports ([`report`])
//! - end-to-end helpers ([`detect`]) that take a mask file produced by an
//!   external segmentation + contour stage and return the final circles
//! - (feature `image`) contour tracing of raster / RLE masks and overlay
//!   rendering of the detected circles
//!
//! ## Quickstart
//!
//! ```no_run
//! use craterfit::detect;
//! use craterfit::filter::FilterConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detection = detect::detect_from_files("masks.json", None, &FilterConfig::default())?;
//! for line in craterfit::report::summary_lines(&detection.circles) {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `craterfit::core`: circles, contours, circularity, circle IoU.
//! - `craterfit::filter`: candidate builder, deduplicator, `CraterFilter`.
//! - `craterfit::io`: mask set / run config JSON, RLE masks.
//! - `craterfit::raster` (feature `image`): open/close cleanup + border following.
//! - `craterfit::report`: CSV rows, JSON report, stdout summary.
//! - `craterfit::render` (feature `image`): circle overlay on the source image.

pub use craterfit_core as core;
pub use craterfit_filter as filter;

pub use craterfit_filter::{
    CircleCandidate, CraterDetection, CraterFilter, FilterConfig, FilterError, FilterStats,
};

pub mod detect;
pub mod io;
pub mod report;

pub use detect::RunError;
pub use io::{InputError, MaskContours, MaskPayload, MaskSet, RleMask, RunConfig};
pub use report::{DetectionReport, ReportError};

#[cfg(feature = "image")]
pub mod raster;
#[cfg(feature = "image")]
pub mod render;
