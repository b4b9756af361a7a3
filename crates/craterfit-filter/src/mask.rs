//! Region masks and the contour collaborators the candidate builder relies on.

use std::borrow::Cow;

use craterfit_core::{Circle, Contour};
use serde::{Deserialize, Serialize};

/// One mask from the segmentation producer.
///
/// `segmentation` is whatever the [`ContourSource`] understands: a raster mask,
/// an RLE blob, or contours that were already extracted upstream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegionMask<M> {
    pub segmentation: M,
    /// Producer-reported mask area in pixels.
    pub area: u32,
    pub stability_score: f32,
    pub predicted_iou: f32,
}

/// Turns a mask payload into the external contours of its cleaned-up region.
///
/// Implementations own any cleanup (morphological open/close) that should
/// happen before contour extraction. Returning no contours is valid and makes
/// the builder skip the mask.
pub trait ContourSource<M: ?Sized>: Sync {
    fn contours<'a>(&self, segmentation: &'a M) -> Cow<'a, [Contour]>;
}

impl<M: ?Sized, F> ContourSource<M> for F
where
    F: Fn(&M) -> Vec<Contour> + Sync,
{
    fn contours<'a>(&self, segmentation: &'a M) -> Cow<'a, [Contour]> {
        Cow::Owned(self(segmentation))
    }
}

/// Measurements of a single contour.
pub trait ContourGeometry: Sync {
    /// Enclosed area (`>= 0`).
    fn area(&self, contour: &Contour) -> f64;
    /// Closed perimeter (`>= 0`).
    fn perimeter(&self, contour: &Contour) -> f64;
    /// Minimum enclosing circle, `None` for an empty contour.
    fn min_enclosing_circle(&self, contour: &Contour) -> Option<Circle>;
}

/// Exact polygon measurements: shoelace area, polyline perimeter, Welzl enclosing circle.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolygonGeometry;

impl ContourGeometry for PolygonGeometry {
    fn area(&self, contour: &Contour) -> f64 {
        contour.area()
    }

    fn perimeter(&self, contour: &Contour) -> f64 {
        contour.perimeter()
    }

    fn min_enclosing_circle(&self, contour: &Contour) -> Option<Circle> {
        contour.min_enclosing_circle()
    }
}

/// Source for masks whose payload already is the list of external contours.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrecomputedContours;

impl ContourSource<Vec<Contour>> for PrecomputedContours {
    fn contours<'a>(&self, segmentation: &'a Vec<Contour>) -> Cow<'a, [Contour]> {
        Cow::Borrowed(segmentation.as_slice())
    }
}
