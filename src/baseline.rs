//! User baseline estimation.
//!
//! Personalizes the circadian curve from session history: sessions are
//! grouped into time-of-day bins, each bin blends a recent mean, the bin
//! mean and the circadian reference with volume-adaptive weights, and the
//! bin value is broadcast to its hours. The baseline describes the user's
//! *typical* daily shape, so once enough history exists today's sessions are
//! excluded; they belong to the forecast, not the baseline.

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};

use crate::circadian::{circadian_for_hour, circadian_points};
use crate::config::{BaselineParams, BlendWeights};
use crate::types::{BaselinePoint, SessionRecord};

/// Compute the 24-hour user baseline from session history.
///
/// Always returns exactly 24 points. Empty history, or history that is
/// entirely filtered out, yields the pure circadian fallback.
pub fn user_baseline(
    sessions: &[SessionRecord],
    now: DateTime<Utc>,
    params: &BaselineParams,
) -> Vec<BaselinePoint> {
    let window_start = now - Duration::days(params.lookback_days);
    let mut in_window: Vec<&SessionRecord> = sessions
        .iter()
        .filter(|s| s.timestamp >= window_start && s.timestamp <= now)
        .collect();

    if in_window.is_empty() {
        return circadian_points();
    }

    // Newest first, so per-bin "recent" picks fall out of insertion order.
    in_window.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    // Temporal split: a stable baseline only sees sessions before today.
    // During onboarding every observation counts, today's included.
    let total = in_window.len();
    let onboarding = total < params.min_sessions_for_stable;
    let start_of_today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let baseline_sessions: Vec<&SessionRecord> = if onboarding {
        in_window
    } else {
        in_window
            .into_iter()
            .filter(|s| s.timestamp < start_of_today)
            .collect()
    };

    if baseline_sessions.is_empty() {
        return circadian_points();
    }

    let num_bins = (24 / params.bin_hours) as usize;
    let mut bins: Vec<Vec<f64>> = vec![Vec::new(); num_bins];
    for session in &baseline_sessions {
        let bin = (session.timestamp.hour() / params.bin_hours) as usize;
        bins[bin].push(session.score);
    }

    let bin_values: Vec<Option<f64>> = bins
        .iter()
        .enumerate()
        .map(|(bin, scores)| {
            if scores.is_empty() {
                None
            } else {
                Some(blend_bin(bin, scores, params))
            }
        })
        .collect();

    (0..24u32)
        .map(|hour| {
            let bin = (hour / params.bin_hours) as usize;
            let user_value = bin_values[bin];
            BaselinePoint {
                hour,
                circadian_value: circadian_for_hour(hour as i32),
                user_value,
                has_user_data: user_value.is_some(),
            }
        })
        .collect()
}

/// Blend one bin's observations into a user value. `scores` is ordered
/// newest first.
fn blend_bin(bin: usize, scores: &[f64], params: &BaselineParams) -> f64 {
    let n = scores.len();
    let bin_mean = scores.iter().sum::<f64>() / n as f64;

    let recent_count = params.recent_count.min(n);
    let recent_mean = scores[..recent_count].iter().sum::<f64>() / recent_count as f64;

    let circadian_mean = circadian_bin_value(bin, params.bin_hours);

    let w: &BlendWeights = if n == 1 {
        &params.weights_single
    } else if n <= params.few_max {
        &params.weights_few
    } else {
        &params.weights_many
    };

    let blended = w.recent * recent_mean + w.bin * bin_mean + w.circadian * circadian_mean;
    blended.clamp(0.0, 100.0).round()
}

/// Mean circadian value over the hours covered by a bin.
fn circadian_bin_value(bin: usize, bin_hours: u32) -> f64 {
    let start = bin as u32 * bin_hours;
    let sum: f64 = (start..start + bin_hours)
        .map(|h| circadian_for_hour(h as i32))
        .sum();
    sum / f64::from(bin_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circadian::CIRCADIAN_TABLE;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn session(score: f64, ts: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            score,
            timestamp: ts,
        }
    }

    #[test]
    fn empty_history_yields_the_exact_circadian_table() {
        let now = at(2026, 3, 10, 12, 0);
        let points = user_baseline(&[], now, &BaselineParams::default());
        assert_eq!(points.len(), 24);
        for (hour, point) in points.iter().enumerate() {
            assert_eq!(point.expected(), CIRCADIAN_TABLE[hour]);
            assert!(!point.has_user_data);
        }
    }

    #[test]
    fn sessions_outside_the_lookback_window_are_ignored() {
        let now = at(2026, 3, 10, 12, 0);
        let stale = vec![session(90.0, at(2026, 1, 1, 10, 0))];
        let points = user_baseline(&stale, now, &BaselineParams::default());
        assert!(points.iter().all(|p| !p.has_user_data));
    }

    #[test]
    fn single_observation_blends_toward_circadian() {
        let now = at(2026, 3, 10, 18, 0);
        // One test at 10:15 scoring 90 on a previous day (onboarding: all
        // data counts anyway).
        let history = vec![session(90.0, at(2026, 3, 9, 10, 15))];
        let points = user_baseline(&history, now, &BaselineParams::default());

        // Bin 5 covers hours 10 and 11, circadian mean (80+80)/2 = 80.
        // 0.6 * 90 + 0.0 * 90 + 0.4 * 80 = 86.
        let p10 = &points[10];
        assert!(p10.has_user_data);
        assert_eq!(p10.user_value, Some(86.0));
        assert_eq!(points[11].user_value, Some(86.0));
        // Neighboring bin stays circadian.
        assert!(!points[12].has_user_data);
    }

    #[test]
    fn recent_sessions_outweigh_older_ones_in_a_bin() {
        let now = at(2026, 3, 10, 18, 0);
        // Three sessions in the 14-15h bin across prior days, newest = 90.
        let history = vec![
            session(90.0, at(2026, 3, 9, 14, 0)),
            session(60.0, at(2026, 3, 8, 14, 30)),
            session(60.0, at(2026, 3, 7, 15, 0)),
        ];
        let points = user_baseline(&history, now, &BaselineParams::default());
        // recent mean = (90+60)/2 = 75, bin mean = 70, circadian = 77.5
        // 0.6*75 + 0.2*70 + 0.2*77.5 = 74.5 → 75 after rounding.
        assert_eq!(points[14].user_value, Some(75.0));
        assert_eq!(points[15].user_value, Some(75.0));
    }

    #[test]
    fn stable_phase_excludes_todays_sessions() {
        let now = at(2026, 3, 10, 18, 0);
        let mut history = Vec::new();
        // 15 prior-day sessions at 10:00 scoring 70: stable phase.
        for day in 1..=15 {
            history.push(session(70.0, at(2026, 2, 28, 10, 0) + Duration::days(day % 3)));
        }
        let baseline_without_today = user_baseline(&history, now, &BaselineParams::default());

        // A perfect score earlier today must not move the baseline.
        history.push(session(100.0, at(2026, 3, 10, 10, 0)));
        let baseline_with_today = user_baseline(&history, now, &BaselineParams::default());
        assert_eq!(
            baseline_without_today[10].user_value,
            baseline_with_today[10].user_value
        );
    }

    #[test]
    fn onboarding_phase_uses_todays_sessions() {
        let now = at(2026, 3, 10, 18, 0);
        // Fewer than 15 total sessions: today's test counts.
        let history = vec![session(90.0, at(2026, 3, 10, 10, 0))];
        let points = user_baseline(&history, now, &BaselineParams::default());
        assert!(points[10].has_user_data);
    }

    #[test]
    fn user_values_are_clamped_and_whole() {
        let now = at(2026, 3, 10, 18, 0);
        let history = vec![
            session(100.0, at(2026, 3, 9, 10, 0)),
            session(100.0, at(2026, 3, 9, 11, 0)),
        ];
        let points = user_baseline(&history, now, &BaselineParams::default());
        let v = points[10].user_value.unwrap();
        assert!((0.0..=100.0).contains(&v));
        assert_eq!(v, v.round());
    }
}
