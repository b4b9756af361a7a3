//! Core geometry for circular feature detection.
//!
//! This crate is intentionally small and purely geometric. It knows nothing
//! about segmentation models, image files or filtering policy; it provides the
//! shapes (`Circle`, `Contour`), the image plane they live on (`ImageSize`)
//! and the two metrics the filtering engine is built on:
//!
//! - [`circularity`]: isoperimetric shape quality of a closed contour,
//! - [`circle_iou`]: exact intersection-over-union of two disks.

mod circle;
mod contour;
mod image;
mod logger;
mod shape;

pub use circle::{circle_iou, Circle};
pub use contour::{min_enclosing_circle, Contour};
pub use image::ImageSize;
pub use shape::circularity;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
