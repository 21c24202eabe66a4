//! Point forecast for the current moment.
//!
//! The forecast anchors on the user baseline at the current hour and pulls
//! toward recent measurements taken in the *same* time-of-day bin (the local
//! window). The weight on local evidence decays in steps with the time since
//! the last local session; a test finished within the last few minutes
//! dominates almost completely so the displayed value matches what the user
//! just measured.

use chrono::{DateTime, Timelike, Utc};

use crate::baseline::user_baseline;
use crate::config::{BaselineParams, ForecastParams};
use crate::types::{
    ConfidenceLevel, DaySegment, ForecastEvidence, ForecastLabel, ForecastResult, SessionRecord,
};

/// Observations from the current time-of-day bin.
#[derive(Debug, Clone, PartialEq)]
struct LocalWindowStats {
    n_local: usize,
    /// Mean of the most recent local sessions, when any exist.
    recent_local_mean: Option<f64>,
    last_local_at: Option<DateTime<Utc>>,
    /// All sessions in the lookback window, local or not.
    total: usize,
}

fn local_window_stats(
    sessions: &[SessionRecord],
    now: DateTime<Utc>,
    current_bin: u32,
    baseline_params: &BaselineParams,
) -> LocalWindowStats {
    let window_start = now - chrono::Duration::days(baseline_params.lookback_days);
    let mut in_window: Vec<&SessionRecord> = sessions
        .iter()
        .filter(|s| s.timestamp >= window_start && s.timestamp <= now)
        .collect();
    in_window.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total = in_window.len();
    let local: Vec<&&SessionRecord> = in_window
        .iter()
        .filter(|s| s.timestamp.hour() / baseline_params.bin_hours == current_bin)
        .collect();

    let n_local = local.len();
    if n_local == 0 {
        return LocalWindowStats {
            n_local: 0,
            recent_local_mean: None,
            last_local_at: None,
            total,
        };
    }

    let recent_count = baseline_params.recent_count.min(n_local);
    let recent_local_mean =
        local[..recent_count].iter().map(|s| s.score).sum::<f64>() / recent_count as f64;

    LocalWindowStats {
        n_local,
        recent_local_mean: Some(recent_local_mean),
        last_local_at: Some(local[0].timestamp),
        total,
    }
}

/// Confidence from the local-window evidence. Total history gates the whole
/// thing; beyond that only local observations raise confidence, since the
/// forecast leans on them.
fn confidence_for_window(
    n_local: usize,
    total: usize,
    params: &ForecastParams,
) -> ConfidenceLevel {
    if total < params.min_total_for_confidence {
        return ConfidenceLevel::Low;
    }
    if n_local == 0 {
        return ConfidenceLevel::Low;
    }
    if n_local < params.high_confidence_local {
        return ConfidenceLevel::Medium;
    }
    ConfidenceLevel::High
}

/// Qualitative label for a forecast value.
pub fn label_for_score(score: f64, params: &ForecastParams) -> ForecastLabel {
    if score >= params.focused_min {
        ForecastLabel::Focused
    } else if score >= params.stable_min {
        ForecastLabel::Stable
    } else if score >= params.fragile_min {
        ForecastLabel::Fragile
    } else {
        ForecastLabel::Scattered
    }
}

/// Local-window weight by hours since the last local session.
fn local_weight_for_recency(hours_ago: f64, params: &ForecastParams) -> f64 {
    for &(max_hours, weight) in &params.recency_steps {
        if hours_ago <= max_hours {
            return weight;
        }
    }
    params.stale_local_weight
}

/// Compute the forecast for `now` from a session-history snapshot.
///
/// Pure function of the snapshot and the clock value; always yields a value,
/// degrading to the circadian baseline when no user evidence exists.
pub fn forecast_now(
    sessions: &[SessionRecord],
    now: DateTime<Utc>,
    baseline_params: &BaselineParams,
    params: &ForecastParams,
) -> ForecastResult {
    let baseline = user_baseline(sessions, now, baseline_params);
    let current_hour = now.hour();
    let current_segment = DaySegment::for_hour(current_hour as i32);
    let baseline_value = baseline[current_hour as usize].expected();

    let current_bin = current_hour / baseline_params.bin_hours;
    let local = local_window_stats(sessions, now, current_bin, baseline_params);
    let confidence = confidence_for_window(local.n_local, local.total, params);

    let minutes_ago = local
        .last_local_at
        .map(|t| (now - t).num_seconds() as f64 / 60.0);

    let value = match (local.recent_local_mean, minutes_ago) {
        // Fresh test: the measurement just taken dominates.
        (Some(local_mean), Some(mins)) if mins <= params.fresh_threshold_minutes => {
            params.fresh_local_weight * local_mean
                + (1.0 - params.fresh_local_weight) * baseline_value
        }
        // Local evidence with step recency decay.
        (Some(local_mean), Some(mins)) => {
            let w_local = local_weight_for_recency(mins / 60.0, params);
            w_local * local_mean + (1.0 - w_local) * baseline_value
        }
        // No local evidence: baseline directly.
        _ => baseline_value,
    };
    let forecast = value.clamp(0.0, 100.0).round();

    ForecastResult {
        forecast_now: Some(forecast),
        label: Some(label_for_score(forecast, params)),
        confidence,
        current_segment,
        typical_at_this_time: Some(baseline_value),
        evidence: ForecastEvidence {
            level: confidence,
            test_count: local.total,
        },
    }
}
