use craterfit_core::{Contour, ImageSize};
use log::info;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::candidate::{check_preconditions, evaluate_masks, CircleCandidate, Rejection};
use crate::config::FilterConfig;
use crate::dedup::deduplicate;
use crate::error::FilterError;
use crate::mask::{
    ContourGeometry, ContourSource, PolygonGeometry, PrecomputedContours, RegionMask,
};

/// Per-run counters: how many masks went where.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub masks: usize,
    pub candidates: usize,
    pub small_area: usize,
    pub no_contour: usize,
    pub degenerate_contour: usize,
    pub low_circularity: usize,
    pub radius_out_of_range: usize,
    pub near_border: usize,
    /// Candidates dropped by overlap suppression.
    pub duplicates: usize,
    pub kept: usize,
}

impl FilterStats {
    fn record(&mut self, rejection: Rejection) {
        let slot = match rejection {
            Rejection::SmallArea => &mut self.small_area,
            Rejection::NoContour => &mut self.no_contour,
            Rejection::DegenerateContour => &mut self.degenerate_contour,
            Rejection::LowCircularity => &mut self.low_circularity,
            Rejection::RadiusOutOfRange => &mut self.radius_out_of_range,
            Rejection::NearBorder => &mut self.near_border,
        };
        *slot += 1;
    }

    /// Masks rejected by the per-mask filters.
    pub fn rejected(&self) -> usize {
        self.masks - self.candidates
    }
}

/// Final circles of a run, in score-descending order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CraterDetection {
    pub image: ImageSize,
    pub circles: Vec<CircleCandidate>,
    pub stats: FilterStats,
}

/// Candidate builder + deduplicator bound to one validated configuration.
#[derive(Clone, Debug)]
pub struct CraterFilter {
    config: FilterConfig,
}

impl CraterFilter {
    pub fn new(config: FilterConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Full run: per-mask filtering, scoring, sorting and overlap suppression.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, masks, source, geometry),
            fields(width = image.width, height = image.height, masks = masks.len())
        )
    )]
    pub fn detect<M, S, G>(
        &self,
        image: ImageSize,
        masks: &[RegionMask<M>],
        source: &S,
        geometry: &G,
    ) -> Result<CraterDetection, FilterError>
    where
        M: Sync,
        S: ContourSource<M>,
        G: ContourGeometry,
    {
        check_preconditions(image, &self.config)?;

        let mut stats = FilterStats {
            masks: masks.len(),
            ..FilterStats::default()
        };
        let mut candidates = Vec::new();
        for outcome in evaluate_masks(masks, source, geometry, image, &self.config) {
            match outcome {
                Ok(cand) => candidates.push(cand),
                Err(rejection) => stats.record(rejection),
            }
        }
        stats.candidates = candidates.len();

        let circles = deduplicate(candidates, self.config.iou_dedup_threshold);
        stats.kept = circles.len();
        stats.duplicates = stats.candidates - stats.kept;

        info!(
            "{} masks -> {} candidates -> {} circles ({} duplicates)",
            stats.masks, stats.candidates, stats.kept, stats.duplicates
        );

        Ok(CraterDetection {
            image,
            circles,
            stats,
        })
    }

    /// [`detect`](Self::detect) for masks that already carry polygon contours.
    pub fn detect_polygons(
        &self,
        image: ImageSize,
        masks: &[RegionMask<Vec<Contour>>],
    ) -> Result<CraterDetection, FilterError> {
        self.detect(image, masks, &PrecomputedContours, &PolygonGeometry)
    }
}
