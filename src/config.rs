//! Protocol and policy configuration.
//!
//! All thresholds and weights live here as named fields, never as inline
//! literals: the scoring formula is versioned policy and the historical
//! meaning of a persisted score depends on which bundle produced it.

use serde::{Deserialize, Serialize};

// ==================== Test protocol ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVariant {
    /// One continuous sequence with a no-go count range, adjacency and
    /// edge-position constraints.
    Continuous,
    /// K blocks, each a permutation of the full digit set with exactly one
    /// no-go per block, excluded from the block's first and last position.
    Block,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolConfig {
    pub variant: ProtocolVariant,
    pub total_trials: usize,
    pub stimulus_digits: Vec<u8>,
    pub go_digits: Vec<u8>,
    pub no_go_digit: u8,
    /// Inclusive no-go count range (continuous variant only).
    pub no_go_count_min: usize,
    pub no_go_count_max: usize,
    /// No-go trials are excluded from the first and last `edge_exclusion`
    /// positions (continuous variant).
    pub edge_exclusion: usize,
    /// Block structure (block variant only).
    pub blocks: usize,
    pub trials_per_block: usize,
    pub stimulus_duration_ms: u64,
    pub mask_duration_ms: u64,
}

impl Default for ProtocolConfig {
    /// The continuous 60-trial protocol: no-go digit 3 appearing 7-8 times,
    /// never adjacent, never in the first or last two trials.
    fn default() -> Self {
        Self {
            variant: ProtocolVariant::Continuous,
            total_trials: 60,
            stimulus_digits: vec![1, 2, 3, 4, 5, 6, 7, 8, 9],
            go_digits: vec![1, 2, 4, 5, 6, 7, 8, 9],
            no_go_digit: 3,
            no_go_count_min: 7,
            no_go_count_max: 8,
            edge_exclusion: 2,
            blocks: 0,
            trials_per_block: 0,
            stimulus_duration_ms: 500,
            mask_duration_ms: 900,
        }
    }
}

impl ProtocolConfig {
    /// The block-based 90-trial protocol: 10 blocks of all digits 1-9,
    /// one no-go per block, not at the block's first or last position.
    pub fn block() -> Self {
        Self {
            variant: ProtocolVariant::Block,
            total_trials: 90,
            no_go_count_min: 10,
            no_go_count_max: 10,
            edge_exclusion: 0,
            blocks: 10,
            trials_per_block: 9,
            ..Self::default()
        }
    }

    /// Number of expected no-go trials per session (upper bound for the
    /// continuous variant, exact for the block variant).
    pub fn max_no_go_count(&self) -> usize {
        match self.variant {
            ProtocolVariant::Continuous => self.no_go_count_max,
            ProtocolVariant::Block => self.blocks,
        }
    }
}

// ==================== Scoring policy ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormulaVersion {
    /// Initial formula: symmetric error weighting, pure weighted sum,
    /// no floor rules.
    V1,
    /// Revised formula: omission-heavy accuracy, min-subscore mixing,
    /// floor rules for catastrophe patterns.
    V1_1,
}

/// A hard score ceiling applied when a raw metric breaches its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorRule {
    pub threshold: f64,
    pub cap: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePolicy {
    pub version: FormulaVersion,

    // Accuracy: weighted error blend raised to an exponent.
    pub omission_weight: f64,
    pub commission_weight: f64,
    pub accuracy_exponent: f64,

    // Speed: piecewise-linear ramp over mean Go RT.
    pub rt_fast_ms: f64,
    pub rt_optimal_ms: f64,
    pub rt_slow_ms: f64,
    pub speed_fast_score: f64,
    pub speed_peak_score: f64,
    pub speed_slow_score: f64,
    // Spam override: fast mean RT plus high combined error rate halves speed.
    pub spam_rt_ms: f64,
    pub spam_error_rate: f64,
    pub spam_penalty_factor: f64,

    // Consistency: decreasing ramp over Go RT standard deviation.
    pub sd_excellent_ms: f64,
    pub sd_poor_ms: f64,
    pub consistency_peak_score: f64,
    pub consistency_floor_score: f64,

    // Discipline: step function over valid-trial ratio, descending bands of
    // (minimum ratio, score); ratios below every band get the floor score.
    pub discipline_bands: Vec<(f64, f64)>,
    pub discipline_floor_score: f64,

    // Composite combination.
    pub accuracy_comp_weight: f64,
    pub speed_comp_weight: f64,
    pub consistency_comp_weight: f64,
    pub discipline_comp_weight: f64,
    /// Share of the weighted mean in the final blend; the remainder goes to
    /// the minimum sub-score. 1.0 means a pure weighted sum.
    pub weighted_mean_share: f64,

    // Floor rules (None = rule absent in this formula revision).
    pub omission_floor: Option<FloorRule>,
    pub valid_ratio_floor: Option<FloorRule>,
    pub rt_sd_floor: Option<FloorRule>,

    // Validity assessment.
    pub min_valid_trial_ratio: f64,
    pub ultrafast_rt_ms: f64,
    pub ultrafast_error_rate: f64,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self::v1_1()
    }
}

impl ScorePolicy {
    pub fn for_version(version: FormulaVersion) -> Self {
        match version {
            FormulaVersion::V1 => Self::v1(),
            FormulaVersion::V1_1 => Self::v1_1(),
        }
    }

    pub fn v1_1() -> Self {
        Self {
            version: FormulaVersion::V1_1,
            omission_weight: 0.7,
            commission_weight: 0.3,
            accuracy_exponent: 1.3,
            rt_fast_ms: 300.0,
            rt_optimal_ms: 600.0,
            rt_slow_ms: 900.0,
            speed_fast_score: 60.0,
            speed_peak_score: 100.0,
            speed_slow_score: 40.0,
            spam_rt_ms: 400.0,
            spam_error_rate: 0.25,
            spam_penalty_factor: 0.5,
            sd_excellent_ms: 80.0,
            sd_poor_ms: 250.0,
            consistency_peak_score: 100.0,
            consistency_floor_score: 40.0,
            discipline_bands: vec![(0.95, 100.0), (0.90, 85.0), (0.75, 60.0)],
            discipline_floor_score: 30.0,
            accuracy_comp_weight: 0.30,
            speed_comp_weight: 0.35,
            consistency_comp_weight: 0.25,
            discipline_comp_weight: 0.10,
            weighted_mean_share: 0.6,
            omission_floor: Some(FloorRule {
                threshold: 0.5,
                cap: 20.0,
            }),
            valid_ratio_floor: Some(FloorRule {
                threshold: 0.6,
                cap: 30.0,
            }),
            rt_sd_floor: Some(FloorRule {
                threshold: 400.0,
                cap: 30.0,
            }),
            min_valid_trial_ratio: 0.8,
            ultrafast_rt_ms: 350.0,
            ultrafast_error_rate: 0.3,
        }
    }

    pub fn v1() -> Self {
        Self {
            version: FormulaVersion::V1,
            omission_weight: 0.5,
            commission_weight: 0.5,
            accuracy_exponent: 1.0,
            discipline_bands: vec![(0.90, 100.0), (0.80, 85.0), (0.60, 60.0)],
            weighted_mean_share: 1.0,
            omission_floor: None,
            valid_ratio_floor: None,
            rt_sd_floor: None,
            ..Self::v1_1()
        }
    }
}

// ==================== Baseline estimation ====================

/// Per-bin blend weights for recent mean, bin mean and circadian value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendWeights {
    pub recent: f64,
    pub bin: f64,
    pub circadian: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineParams {
    /// History window for baseline estimation, in days.
    pub lookback_days: i64,
    /// Below this total session count the user is in the onboarding phase
    /// and today's sessions are folded into the baseline as well.
    pub min_sessions_for_stable: usize,
    /// Width of a time-of-day bucket, in hours. Must divide 24.
    pub bin_hours: u32,
    /// How many most-recent sessions per bin form the "recent mean".
    pub recent_count: usize,
    /// Blend weights for a bin with exactly one observation.
    pub weights_single: BlendWeights,
    /// Blend weights for 2 to `few_max` observations.
    pub weights_few: BlendWeights,
    pub few_max: usize,
    /// Blend weights beyond `few_max` observations.
    pub weights_many: BlendWeights,
}

impl Default for BaselineParams {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            min_sessions_for_stable: 15,
            bin_hours: 2,
            recent_count: 2,
            weights_single: BlendWeights {
                recent: 0.6,
                bin: 0.0,
                circadian: 0.4,
            },
            weights_few: BlendWeights {
                recent: 0.6,
                bin: 0.2,
                circadian: 0.2,
            },
            few_max: 4,
            weights_many: BlendWeights {
                recent: 0.6,
                bin: 0.3,
                circadian: 0.1,
            },
        }
    }
}

// ==================== Forecast ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastParams {
    /// A local-window session at most this old dominates the forecast.
    pub fresh_threshold_minutes: f64,
    /// Weight on the direct measurement in the fresh-test path.
    pub fresh_local_weight: f64,
    /// Step decay of the local-window weight by hours since the last local
    /// session: ascending (max hours, weight) pairs.
    pub recency_steps: Vec<(f64, f64)>,
    /// Local-window weight once every recency step is exceeded.
    pub stale_local_weight: f64,

    /// Total-session gate below which confidence is always low.
    pub min_total_for_confidence: usize,
    /// Local-window count at which confidence becomes high.
    pub high_confidence_local: usize,

    // Label bands over the forecast value.
    pub focused_min: f64,
    pub stable_min: f64,
    pub fragile_min: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            fresh_threshold_minutes: 5.0,
            fresh_local_weight: 0.95,
            recency_steps: vec![(2.0, 0.7), (6.0, 0.5), (24.0, 0.3)],
            stale_local_weight: 0.2,
            min_total_for_confidence: 5,
            high_confidence_local: 3,
            focused_min: 75.0,
            stable_min: 60.0,
            fragile_min: 45.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_protocol_is_the_continuous_sixty_trial_variant() {
        let p = ProtocolConfig::default();
        assert_eq!(p.variant, ProtocolVariant::Continuous);
        assert_eq!(p.total_trials, 60);
        assert_eq!(p.no_go_digit, 3);
        assert!(!p.go_digits.contains(&p.no_go_digit));
        assert_eq!(p.max_no_go_count(), 8);
    }

    #[test]
    fn block_protocol_has_one_no_go_per_block() {
        let p = ProtocolConfig::block();
        assert_eq!(p.variant, ProtocolVariant::Block);
        assert_eq!(p.total_trials, p.blocks * p.trials_per_block);
        assert_eq!(p.max_no_go_count(), p.blocks);
    }

    #[test]
    fn v1_1_composite_weights_sum_to_one() {
        let policy = ScorePolicy::v1_1();
        let sum = policy.accuracy_comp_weight
            + policy.speed_comp_weight
            + policy.consistency_comp_weight
            + policy.discipline_comp_weight;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn v1_has_no_floor_rules_and_pure_weighted_sum() {
        let policy = ScorePolicy::v1();
        assert!(policy.omission_floor.is_none());
        assert!(policy.valid_ratio_floor.is_none());
        assert!(policy.rt_sd_floor.is_none());
        assert_eq!(policy.weighted_mean_share, 1.0);
    }

    #[test]
    fn baseline_bin_width_divides_the_day() {
        let params = BaselineParams::default();
        assert_eq!(24 % params.bin_hours, 0);
    }
}
