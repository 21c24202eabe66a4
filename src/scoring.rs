//! Composite score calculation.
//!
//! Maps [`RawMetrics`] to a [`ScoreResult`] deterministically under a
//! [`ScorePolicy`]. Four sub-scores feed a weighted mean blended with the
//! minimum sub-score, followed by hard floor rules for catastrophe patterns
//! and a final clamp to [0, 100].

use crate::config::ScorePolicy;
use crate::types::{RawMetrics, ScoreResult, SubScores};

/// Linear interpolation between (x1, y1) and (x2, y2).
fn lerp(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    y1 + (x - x1) * (y2 - y1) / (x2 - x1)
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Accuracy sub-score: weighted error blend, sharpened by an exponent > 1
/// so that moderate error rates remain visible, scaled to 0-100.
/// Omission errors weigh heavier than commission errors because a missed
/// response marks an attentional lapse rather than impulsivity.
pub fn accuracy_score(
    commission_error_rate: f64,
    omission_error_rate: f64,
    policy: &ScorePolicy,
) -> f64 {
    let total_error = policy.omission_weight * omission_error_rate
        + policy.commission_weight * commission_error_rate;
    let base = (1.0 - total_error).max(0.0);
    let scaled = base.powf(policy.accuracy_exponent);
    clamp_score((scaled * 100.0).round())
}

/// Speed sub-score: piecewise-linear over mean Go RT with a low plateau for
/// very fast responding (impulsive), a rise to the optimum, a decline, and a
/// low plateau for very slow responding. Fast RT combined with a high error
/// rate halves the result to catch reflexive spam responding.
pub fn speed_score(
    mean_go_rt: f64,
    commission_error_rate: f64,
    omission_error_rate: f64,
    policy: &ScorePolicy,
) -> f64 {
    let mut score = if mean_go_rt <= policy.rt_fast_ms {
        policy.speed_fast_score
    } else if mean_go_rt < policy.rt_optimal_ms {
        lerp(
            mean_go_rt,
            policy.rt_fast_ms,
            policy.speed_fast_score,
            policy.rt_optimal_ms,
            policy.speed_peak_score,
        )
    } else if mean_go_rt <= policy.rt_slow_ms {
        lerp(
            mean_go_rt,
            policy.rt_optimal_ms,
            policy.speed_peak_score,
            policy.rt_slow_ms,
            policy.speed_slow_score,
        )
    } else {
        policy.speed_slow_score
    };

    let combined_error_rate = (commission_error_rate + omission_error_rate) / 2.0;
    if mean_go_rt < policy.spam_rt_ms && combined_error_rate > policy.spam_error_rate {
        score *= policy.spam_penalty_factor;
    }
    score
}

/// Consistency sub-score: decreasing piecewise-linear over the Go RT
/// standard deviation. High RT variability is the canonical marker for
/// mind-wandering in the SART literature.
pub fn consistency_score(go_rt_sd: f64, policy: &ScorePolicy) -> f64 {
    if go_rt_sd <= policy.sd_excellent_ms {
        policy.consistency_peak_score
    } else if go_rt_sd < policy.sd_poor_ms {
        lerp(
            go_rt_sd,
            policy.sd_excellent_ms,
            policy.consistency_peak_score,
            policy.sd_poor_ms,
            policy.consistency_floor_score,
        )
    } else {
        policy.consistency_floor_score
    }
}

/// Discipline sub-score: step function over the valid-trial ratio.
pub fn discipline_score(valid_trial_ratio: f64, policy: &ScorePolicy) -> f64 {
    for &(min_ratio, score) in &policy.discipline_bands {
        if valid_trial_ratio >= min_ratio {
            return score;
        }
    }
    policy.discipline_floor_score
}

/// Full score computation: sub-scores, composite blend, floor rules, clamp
/// and rounding to one decimal.
///
/// The blend runs on the unrounded sub-score values; rounding happens only
/// once, on the reported result.
pub fn calculate_score(raw: &RawMetrics, policy: &ScorePolicy) -> ScoreResult {
    let accuracy = accuracy_score(raw.commission_error_rate, raw.omission_error_rate, policy);
    let speed = speed_score(
        raw.mean_go_rt,
        raw.commission_error_rate,
        raw.omission_error_rate,
        policy,
    );
    let consistency = consistency_score(raw.go_rt_sd, policy);
    let discipline = discipline_score(raw.valid_trial_ratio, policy);

    let weighted_mean = policy.accuracy_comp_weight * accuracy
        + policy.speed_comp_weight * speed
        + policy.consistency_comp_weight * consistency
        + policy.discipline_comp_weight * discipline;
    let min_sub_score = accuracy.min(speed).min(consistency).min(discipline);

    let mut brain_score = policy.weighted_mean_share * weighted_mean
        + (1.0 - policy.weighted_mean_share) * min_sub_score;
    brain_score = clamp_score(brain_score);

    // Floor rules: hard ceilings for catastrophe patterns, regardless of how
    // well the other sub-scores did.
    if let Some(rule) = &policy.omission_floor {
        if raw.omission_error_rate >= rule.threshold {
            brain_score = brain_score.min(rule.cap);
        }
    }
    if let Some(rule) = &policy.valid_ratio_floor {
        if raw.valid_trial_ratio < rule.threshold {
            brain_score = brain_score.min(rule.cap);
        }
    }
    if let Some(rule) = &policy.rt_sd_floor {
        if raw.go_rt_sd > rule.threshold {
            brain_score = brain_score.min(rule.cap);
        }
    }

    ScoreResult {
        brain_score: round1(clamp_score(brain_score)),
        sub_scores: SubScores {
            accuracy_score: round1(accuracy),
            speed_score: round1(speed),
            consistency_score: round1(consistency),
            discipline_score: round1(discipline),
        },
        raw_metrics: raw.clone(),
    }
}
