//! Contour extraction from binary raster masks.
//!
//! A mask is cleaned with a morphological open (drops specks) followed by a
//! close (bridges small gaps), then traced with Suzuki-Abe border following.
//! Only top-level outer borders are kept; holes and islands inside holes are
//! not crater rims.

use std::borrow::Cow;

use craterfit_core::Contour;
use craterfit_filter::ContourSource;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use nalgebra::Point2;

/// [`ContourSource`] for `GrayImage` masks; any non-zero pixel is foreground.
///
/// Radii are in the L-infinity norm, so radius `k` is a `(2k+1) x (2k+1)`
/// square structuring element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterContours {
    pub open_radius: u8,
    pub close_radius: u8,
}

impl Default for RasterContours {
    /// 3x3 open, 5x5 close.
    fn default() -> Self {
        Self {
            open_radius: 1,
            close_radius: 2,
        }
    }
}

impl RasterContours {
    /// Open then close the mask. A zero radius skips that step.
    pub fn clean(&self, mask: &GrayImage) -> GrayImage {
        let opened = if self.open_radius > 0 {
            morphology::open(mask, Norm::LInf, self.open_radius)
        } else {
            mask.clone()
        };
        if self.close_radius > 0 {
            morphology::close(&opened, Norm::LInf, self.close_radius)
        } else {
            opened
        }
    }

    /// Outer borders of the cleaned mask's connected components.
    pub fn trace(&self, mask: &GrayImage) -> Vec<Contour> {
        outer_borders(&self.clean(mask))
    }
}

impl ContourSource<GrayImage> for RasterContours {
    fn contours<'a>(&self, segmentation: &'a GrayImage) -> Cow<'a, [Contour]> {
        Cow::Owned(self.trace(segmentation))
    }
}

fn outer_borders(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<u32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            Contour::new(
                c.points
                    .into_iter()
                    .map(|p| Point2::new(f64::from(p.x), f64::from(p.y)))
                    .collect(),
            )
        })
        .collect()
}
