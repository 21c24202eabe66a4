//! Daily aggregation and deviation statistics over session history.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

use crate::circadian::circadian_for_hour;
use crate::types::{
    BaselinePoint, DailyScore, SessionRecord, TestDeviation, TodayDeviations, WeeklyStats,
};

/// Group sessions by calendar day into daily scores (mean of the day's
/// sessions, rounded to a whole number), newest day first.
pub fn aggregate_daily_scores(sessions: &[SessionRecord]) -> Vec<DailyScore> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&SessionRecord>> = BTreeMap::new();
    for session in sessions {
        by_date
            .entry(session.timestamp.date_naive())
            .or_default()
            .push(session);
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, mut day_sessions)| {
            day_sessions.sort_by_key(|s| s.timestamp);
            let mean = day_sessions.iter().map(|s| s.score).sum::<f64>()
                / day_sessions.len() as f64;
            DailyScore {
                date,
                daily_score: mean.round(),
                test_count: day_sessions.len(),
                first_test_at: day_sessions[0].timestamp,
                last_test_at: day_sessions[day_sessions.len() - 1].timestamp,
            }
        })
        .collect()
}

/// Seven-day summary over daily scores, relative to `reference`.
pub fn weekly_stats(daily_scores: &[DailyScore], reference: DateTime<Utc>) -> WeeklyStats {
    let cutoff = reference.date_naive() - Duration::days(7);
    let recent: Vec<&DailyScore> = daily_scores.iter().filter(|d| d.date >= cutoff).collect();

    if recent.is_empty() {
        return WeeklyStats {
            seven_day_avg_daily_score: None,
            best_daily_score: None,
            worst_daily_score: None,
            active_days: 0,
        };
    }

    let scores: Vec<f64> = recent.iter().map(|d| d.daily_score).collect();
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let best = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let worst = scores.iter().cloned().fold(f64::INFINITY, f64::min);

    WeeklyStats {
        seven_day_avg_daily_score: Some(mean.round()),
        best_daily_score: Some(best),
        worst_daily_score: Some(worst),
        active_days: recent.len(),
    }
}

/// Compare today's sessions against the 24-hour baseline: one deviation per
/// test (score minus expected value at that hour), in chronological order,
/// plus the mean delta.
pub fn today_deviations(
    sessions: &[SessionRecord],
    baseline: &[BaselinePoint],
    now: DateTime<Utc>,
) -> TodayDeviations {
    let today = now.date_naive();
    let mut todays: Vec<&SessionRecord> = sessions
        .iter()
        .filter(|s| s.timestamp.date_naive() == today && s.timestamp <= now)
        .collect();
    todays.sort_by_key(|s| s.timestamp);

    let tests: Vec<TestDeviation> = todays
        .iter()
        .map(|session| {
            let hour = session.timestamp.hour();
            let baseline_at_hour = baseline
                .get(hour as usize)
                .map(BaselinePoint::expected)
                .unwrap_or_else(|| circadian_for_hour(hour as i32));
            let score = session.score.clamp(0.0, 100.0);
            TestDeviation {
                timestamp: session.timestamp,
                hour,
                score,
                baseline_at_hour,
                delta: score - baseline_at_hour,
            }
        })
        .collect();

    let average_delta = if tests.is_empty() {
        None
    } else {
        Some(tests.iter().map(|t| t.delta).sum::<f64>() / tests.len() as f64)
    };

    TodayDeviations {
        tests,
        average_delta,
    }
}
