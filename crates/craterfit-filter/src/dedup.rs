//! Greedy, score-ordered overlap suppression.
//!
//! This is plain non-maximum suppression over the "overlaps too much" conflict
//! graph: deterministic and `O(n²)` in the number of candidates, but not a
//! maximum-weight independent set.

use craterfit_core::circle_iou;
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::candidate::CircleCandidate;

/// Stable sort by descending score; equal scores keep their relative order.
pub fn sort_by_score(candidates: &mut [CircleCandidate]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Single greedy pass over candidates already in priority order.
///
/// A candidate is kept unless its IoU with some previously kept circle exceeds
/// `iou_threshold`. Discarded candidates are never reconsidered.
pub fn suppress_overlaps(sorted: &[CircleCandidate], iou_threshold: f64) -> Vec<CircleCandidate> {
    let mut kept: Vec<CircleCandidate> = Vec::new();
    for cand in sorted {
        let conflict = kept
            .iter()
            .position(|k| circle_iou(&cand.circle, &k.circle) > iou_threshold);
        match conflict {
            Some(k) => debug!(
                "mask {} suppressed by mask {} (score {:.4} <= {:.4})",
                cand.mask_index, kept[k].mask_index, cand.score, kept[k].score
            ),
            None => kept.push(*cand),
        }
    }
    kept
}

/// Sort by score and suppress overlapping duplicates.
///
/// The result is in score-descending order and no two circles in it overlap by
/// more than `iou_threshold`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(candidates), fields(candidates = candidates.len()))
)]
pub fn deduplicate(mut candidates: Vec<CircleCandidate>, iou_threshold: f64) -> Vec<CircleCandidate> {
    sort_by_score(&mut candidates);
    suppress_overlaps(&candidates, iou_threshold)
}
