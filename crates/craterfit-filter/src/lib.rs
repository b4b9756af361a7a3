//! Circle candidate filtering and deduplication.
//!
//! Pipeline:
//! - Per region mask: pick the largest contour, score its circularity, fit the
//!   minimum enclosing circle and reject implausible shapes (area, radius,
//!   border margin, circularity).
//! - Score accepted circles from mask confidence and shape quality.
//! - Sort by score and greedily drop circles that overlap an already kept one
//!   by more than the IoU threshold.
//!
//! Contour extraction and the geometric measurements are collaborator traits
//! ([`ContourSource`], [`ContourGeometry`]); [`PrecomputedContours`] and
//! [`PolygonGeometry`] cover the common case of masks that already carry
//! polygon contours.

mod candidate;
mod config;
mod dedup;
mod error;
mod filter;
mod mask;

pub use candidate::{build_candidate, build_candidates, evaluate_mask, CircleCandidate, Rejection};
pub use config::{ConfigError, FilterConfig, ScoreWeights};
pub use dedup::{deduplicate, sort_by_score, suppress_overlaps};
pub use error::FilterError;
pub use filter::{CraterDetection, CraterFilter, FilterStats};
pub use mask::{ContourGeometry, ContourSource, PolygonGeometry, PrecomputedContours, RegionMask};

pub use craterfit_core::{circle_iou, circularity, Circle, Contour, ImageSize};
