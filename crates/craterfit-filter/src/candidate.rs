use craterfit_core::{circularity, Circle, Contour, ImageSize};
use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::mask::{ContourGeometry, ContourSource, RegionMask};

/// A scored circle hypothesis derived from one region mask.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircleCandidate {
    pub circle: Circle,
    pub score: f64,
    /// Circularity of the contour the circle was fitted to.
    pub circularity: f64,
    /// Position of the source mask in the producer's list.
    pub mask_index: usize,
}

impl CircleCandidate {
    #[inline]
    pub fn x(&self) -> f64 {
        self.circle.center.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.circle.center.y
    }

    #[inline]
    pub fn r(&self) -> f64 {
        self.circle.radius
    }
}

/// Why a mask did not produce a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Producer-reported area below `min_area`.
    SmallArea,
    /// Cleanup left nothing to trace.
    NoContour,
    /// Largest contour encloses no area, or no circle could be fitted.
    DegenerateContour,
    LowCircularity,
    RadiusOutOfRange,
    /// Disk is closer than `border_margin` to an image border.
    NearBorder,
}

/// Run the per-mask admission pipeline.
///
/// Pure function of the mask and the (already validated) configuration; masks
/// are independent of each other.
pub fn evaluate_mask<M, S, G>(
    mask: &RegionMask<M>,
    mask_index: usize,
    source: &S,
    geometry: &G,
    image: ImageSize,
    config: &FilterConfig,
) -> Result<CircleCandidate, Rejection>
where
    S: ContourSource<M>,
    G: ContourGeometry,
{
    if mask.area < config.min_area {
        return Err(Rejection::SmallArea);
    }

    let contours = source.contours(&mask.segmentation);
    let (contour, area) =
        largest_contour(&contours, geometry).ok_or(Rejection::NoContour)?;
    if area.is_nan() || area <= 0.0 {
        return Err(Rejection::DegenerateContour);
    }

    let circ = circularity(area, geometry.perimeter(contour));
    if circ < config.min_circularity {
        debug!("mask {mask_index}: circularity {circ:.3} below {:.3}", config.min_circularity);
        return Err(Rejection::LowCircularity);
    }

    let circle = geometry
        .min_enclosing_circle(contour)
        .ok_or(Rejection::DegenerateContour)?;
    if !(config.min_radius..=config.max_radius).contains(&circle.radius) {
        debug!("mask {mask_index}: radius {:.1} out of range", circle.radius);
        return Err(Rejection::RadiusOutOfRange);
    }
    if !circle.fits_inside(image, config.border_margin) {
        return Err(Rejection::NearBorder);
    }

    let score = config.score_weights.score(
        mask.stability_score as f64,
        mask.predicted_iou as f64,
        circ,
    );
    Ok(CircleCandidate {
        circle,
        score,
        circularity: circ,
        mask_index,
    })
}

/// [`evaluate_mask`] without the rejection reason.
pub fn build_candidate<M, S, G>(
    mask: &RegionMask<M>,
    mask_index: usize,
    source: &S,
    geometry: &G,
    image: ImageSize,
    config: &FilterConfig,
) -> Option<CircleCandidate>
where
    S: ContourSource<M>,
    G: ContourGeometry,
{
    evaluate_mask(mask, mask_index, source, geometry, image, config).ok()
}

/// Build candidates for all masks, in mask order.
///
/// Fails only when the configuration or the image size is invalid.
pub fn build_candidates<M, S, G>(
    masks: &[RegionMask<M>],
    source: &S,
    geometry: &G,
    image: ImageSize,
    config: &FilterConfig,
) -> Result<Vec<CircleCandidate>, FilterError>
where
    M: Sync,
    S: ContourSource<M>,
    G: ContourGeometry,
{
    check_preconditions(image, config)?;
    Ok(evaluate_masks(masks, source, geometry, image, config)
        .into_iter()
        .filter_map(Result::ok)
        .collect())
}

pub(crate) fn check_preconditions(
    image: ImageSize,
    config: &FilterConfig,
) -> Result<(), FilterError> {
    config.validate()?;
    if !image.is_valid() {
        return Err(FilterError::InvalidImageSize {
            width: image.width,
            height: image.height,
        });
    }
    Ok(())
}

/// Evaluate every mask; with the `rayon` feature the masks are processed in
/// parallel. The output order always matches the input order.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(masks = masks.len()))
)]
pub(crate) fn evaluate_masks<M, S, G>(
    masks: &[RegionMask<M>],
    source: &S,
    geometry: &G,
    image: ImageSize,
    config: &FilterConfig,
) -> Vec<Result<CircleCandidate, Rejection>>
where
    M: Sync,
    S: ContourSource<M>,
    G: ContourGeometry,
{
    #[cfg(feature = "rayon")]
    let iter = masks.par_iter();
    #[cfg(not(feature = "rayon"))]
    let iter = masks.iter();

    iter.enumerate()
        .map(|(idx, mask)| evaluate_mask(mask, idx, source, geometry, image, config))
        .collect()
}

/// Contour with the largest enclosed area (first one wins ties), with that area.
fn largest_contour<'c, G: ContourGeometry>(
    contours: &'c [Contour],
    geometry: &G,
) -> Option<(&'c Contour, f64)> {
    let mut best: Option<(&Contour, f64)> = None;
    for contour in contours {
        let area = geometry.area(contour);
        if best.map(|(_, a)| area > a).unwrap_or(true) {
            best = Some((contour, area));
        }
    }
    best
}
