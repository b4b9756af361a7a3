use serde::{Deserialize, Serialize};

/// Weights of the candidate score `stability·w_s + predicted_iou·w_p + circularity·w_c`.
///
/// The defaults (`1.0`, `0.5`, `0.5`) give an unnormalized score in roughly
/// `[0, 2]` that favors confident, well-formed masks over merely large or
/// merely round ones.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub stability: f64,
    pub predicted_iou: f64,
    pub circularity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            stability: 1.0,
            predicted_iou: 0.5,
            circularity: 0.5,
        }
    }
}

impl ScoreWeights {
    #[inline]
    pub fn score(&self, stability: f64, predicted_iou: f64, circularity: f64) -> f64 {
        self.stability * stability + self.predicted_iou * predicted_iou + self.circularity * circularity
    }
}

/// Thresholds for candidate admission and deduplication. Read-only for a whole run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Smallest accepted enclosing-circle radius, pixels.
    pub min_radius: f64,
    /// Largest accepted enclosing-circle radius, pixels.
    pub max_radius: f64,
    /// Minimal isoperimetric circularity in `[0, 1]`.
    pub min_circularity: f64,
    /// Masks with a producer-reported area below this are skipped before any geometry.
    pub min_area: u32,
    /// A candidate is dropped if its IoU with a kept circle exceeds this value.
    pub iou_dedup_threshold: f64,
    /// Required clearance between a disk and every image border, pixels.
    pub border_margin: f64,
    pub score_weights: ScoreWeights,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_radius: 40.0,
            max_radius: 250.0,
            min_circularity: 0.55,
            min_area: 1500,
            iou_dedup_threshold: 0.15,
            border_margin: 5.0,
            score_weights: ScoreWeights::default(),
        }
    }
}

/// Configuration values that make a run meaningless.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("radius bounds must be finite with min >= 0 and max > 0 (min={min}, max={max})")]
    InvalidRadius { min: f64, max: f64 },
    #[error("min_radius ({min}) exceeds max_radius ({max})")]
    EmptyRadiusRange { min: f64, max: f64 },
    #[error("min_circularity must lie in [0, 1] (got {0})")]
    CircularityOutOfRange(f64),
    #[error("iou_dedup_threshold must lie in [0, 1] (got {0})")]
    IouThresholdOutOfRange(f64),
    #[error("border_margin must be finite and non-negative (got {0})")]
    InvalidBorderMargin(f64),
    #[error("score weight `{name}` must be finite and non-negative (got {value})")]
    InvalidScoreWeight { name: &'static str, value: f64 },
}

impl FilterConfig {
    /// Check the configuration before any mask is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_radius, self.max_radius);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max <= 0.0 {
            return Err(ConfigError::InvalidRadius { min, max });
        }
        if min > max {
            return Err(ConfigError::EmptyRadiusRange { min, max });
        }
        if !(0.0..=1.0).contains(&self.min_circularity) {
            return Err(ConfigError::CircularityOutOfRange(self.min_circularity));
        }
        if !(0.0..=1.0).contains(&self.iou_dedup_threshold) {
            return Err(ConfigError::IouThresholdOutOfRange(
                self.iou_dedup_threshold,
            ));
        }
        if !self.border_margin.is_finite() || self.border_margin < 0.0 {
            return Err(ConfigError::InvalidBorderMargin(self.border_margin));
        }

        let w = &self.score_weights;
        for (name, value) in [
            ("stability", w.stability),
            ("predicted_iou", w.predicted_iou),
            ("circularity", w.circularity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidScoreWeight { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = FilterConfig::default();
        assert_eq!(cfg.min_radius, 40.0);
        assert_eq!(cfg.max_radius, 250.0);
        assert_eq!(cfg.min_circularity, 0.55);
        assert_eq!(cfg.min_area, 1500);
        assert_eq!(cfg.iou_dedup_threshold, 0.15);
        assert_eq!(cfg.border_margin, 5.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn inverted_radius_range_is_rejected() {
        let cfg = FilterConfig {
            min_radius: 300.0,
            ..FilterConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmptyRadiusRange {
                min: 300.0,
                max: 250.0
            })
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let bad = [
            FilterConfig {
                max_radius: 0.0,
                min_radius: 0.0,
                ..FilterConfig::default()
            },
            FilterConfig {
                min_radius: f64::NAN,
                ..FilterConfig::default()
            },
            FilterConfig {
                min_circularity: 1.5,
                ..FilterConfig::default()
            },
            FilterConfig {
                iou_dedup_threshold: -0.1,
                ..FilterConfig::default()
            },
            FilterConfig {
                border_margin: -1.0,
                ..FilterConfig::default()
            },
            FilterConfig {
                score_weights: ScoreWeights {
                    circularity: f64::INFINITY,
                    ..ScoreWeights::default()
                },
                ..FilterConfig::default()
            },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: FilterConfig =
            serde_json::from_str(r#"{ "min_radius": 10.0, "score_weights": { "circularity": 1.0 } }"#)
                .expect("parse");
        assert_eq!(cfg.min_radius, 10.0);
        assert_eq!(cfg.max_radius, 250.0);
        assert_eq!(cfg.score_weights.stability, 1.0);
        assert_eq!(cfg.score_weights.circularity, 1.0);
    }

    #[test]
    fn default_weights_match_reference_score() {
        let w = ScoreWeights::default();
        assert_eq!(w.score(0.9, 0.8, 0.6), 0.9 + 0.4 + 0.3);
    }
}
